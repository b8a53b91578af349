use cadence::data::SampleEvents;
use clap::Parser;
use rand::seq::IndexedRandom;
use rand::{Rng, rngs::ThreadRng};
use serde_json::{Map, Value, json};
use std::fs;

const FIRST_NAMES: &[&str] = &["Jane", "John", "Amira", "Kenji", "Lucia", "Noah", "Priya", "Sam"];
const LAST_NAMES: &[&str] = &["Doe", "Okafor", "Tanaka", "Rossi", "Berg", "Singh", "Lopez"];
const COMPANIES: &[&str] = &["Acme Inc", "Globex", "Initech", "Umbrella", "Hooli"];
const TAGS: &[&str] = &["lead", "customer", "vip", "newsletter", "webinar", "trial"];
const STATUSES: &[&str] = &["new", "contacted", "qualified", "customer", "churned"];
const STAGES: &[&str] = &["new", "qualified", "proposal", "negotiation", "won", "lost"];

/// A CLI tool to generate contact event payloads for the Cadence engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_payloads.json")]
    output: String,

    /// The number of payloads to generate
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Probability (0.0 to 1.0) that a payload carries an opportunity
    #[arg(long, default_value_t = 0.3)]
    opportunity_rate: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.opportunity_rate) {
        eprintln!(
            "Error: --opportunity-rate ({}) must be between 0.0 and 1.0",
            cli.opportunity_rate
        );
        std::process::exit(1);
    }

    println!("Generating {} contact event payload(s)...", cli.count);

    let payloads = (0..cli.count)
        .map(|index| generate_payload(&mut rng, index, cli.opportunity_rate))
        .collect();
    let events = SampleEvents { payloads };

    let json_output = serde_json::to_string_pretty(&events)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved payloads to '{}'",
        cli.output
    );

    Ok(())
}

fn generate_payload(rng: &mut ThreadRng, index: usize, opportunity_rate: f64) -> Value {
    let first_name = pick(rng, FIRST_NAMES);
    let last_name = pick(rng, LAST_NAMES);

    let mut payload = Map::new();
    payload.insert("contact_id".into(), json!(format!("contact-{:04}", index + 1)));
    payload.insert(
        "email".into(),
        json!(format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        )),
    );
    payload.insert("first_name".into(), json!(first_name));
    payload.insert("last_name".into(), json!(last_name));
    payload.insert("company".into(), json!(pick(rng, COMPANIES)));
    payload.insert(
        "phone".into(),
        json!(format!("+1555{:07}", rng.random_range(0..10_000_000))),
    );
    payload.insert("status".into(), json!(pick(rng, STATUSES)));
    payload.insert("tags".into(), json!(generate_tags(rng)));

    // Engagement fields read by condition nodes.
    payload.insert("email_opened".into(), json!(rng.random_bool(0.5)));
    payload.insert("link_clicked".into(), json!(rng.random_bool(0.25)));
    payload.insert(
        "days_since_last_contact".into(),
        json!(rng.random_range(0..30)),
    );

    if rng.random_bool(opportunity_rate) {
        payload.insert(
            "opportunity".into(),
            json!({
                "id": format!("opp-{:04}", index + 1),
                "stage": pick(rng, STAGES),
                "value": (rng.random_range(100.0..50_000.0_f64) * 100.0).round() / 100.0,
                "status": "active",
                "pipeline": "sales",
            }),
        );
    }

    Value::Object(payload)
}

fn generate_tags(rng: &mut ThreadRng) -> Vec<&'static str> {
    let count = rng.random_range(0..=3);
    TAGS.choose_multiple(rng, count).copied().collect()
}

fn pick(rng: &mut ThreadRng, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}
