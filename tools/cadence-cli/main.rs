use cadence::prelude::*;
use chrono::{DateTime, Utc};
use clap::Parser;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- JSON Deserialization Structs (Canvas Export Format) ---
// These match what the builder canvas exports and are only used here for conversion.

#[derive(Deserialize)]
struct RawWorkflow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    trigger: Trigger,
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    data: RawNodeData,
}

#[derive(Deserialize)]
struct RawNodeData {
    #[serde(alias = "nodeType")]
    node_type: String,
    #[serde(default)]
    config: NodeConfig,
}

#[derive(Deserialize)]
struct RawEdge {
    #[serde(default)]
    id: String,
    source: String,
    target: String,
    #[serde(default, alias = "sourceHandle")]
    source_handle: Option<String>,
}

// --- Converter Implementation ---

impl IntoWorkflow for RawWorkflow {
    fn into_workflow(self) -> Result<Workflow, DefinitionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw_node| {
                if raw_node.data.node_type.trim().is_empty() {
                    return Err(DefinitionError::ConversionError(format!(
                        "node '{}' has no node type",
                        raw_node.id
                    )));
                }
                Ok(Node::new(
                    raw_node.id,
                    raw_node.data.node_type.as_str(),
                    raw_node.data.config,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let edges = self
            .edges
            .into_iter()
            .map(|raw_edge| Edge {
                id: raw_edge.id,
                source: raw_edge.source,
                target: raw_edge.target,
                source_handle: raw_edge.source_handle,
            })
            .collect();

        Ok(Workflow {
            name: self.name,
            trigger: self.trigger,
            nodes,
            edges,
        })
    }
}

/// Reads either file format. A canvas export is recognized by the `data` object
/// on its nodes; canvas libraries also put a display `type` on each node, so the
/// presence of `type` says nothing about the format.
fn parse_workflow(json: &str) -> Result<Workflow, DefinitionError> {
    let value: Value = serde_json::from_str(json)?;
    if is_canvas_export(&value) {
        serde_json::from_value::<RawWorkflow>(value)?.into_workflow()
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn is_canvas_export(value: &Value) -> bool {
    value
        .get("nodes")
        .and_then(Value::as_array)
        .is_some_and(|nodes| nodes.iter().any(|node| node.get("data").is_some_and(Value::is_object)))
}

/// Validate and preview marketing automation workflows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON file (native or canvas export format)
    workflow_path: String,
    /// Optional path to a JSON payload (one object or an array of them)
    payload_path: Option<String>,

    /// Print results as JSON instead of a readable trace
    #[arg(long)]
    json: bool,

    /// Only validate the workflow; do not run it
    #[arg(long)]
    check: bool,

    /// Pin the engine clock to this RFC 3339 timestamp
    #[arg(long, value_name = "RFC3339")]
    now: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let workflow = load_workflow(&cli.workflow_path);

    if cli.check {
        run_check(&workflow, cli.json);
    } else {
        run_preview(&workflow, &cli);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_workflow(path: &str) -> Workflow {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read workflow file '{}': {}", path, e))
    });
    parse_workflow(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load workflow '{}': {}", path, e)))
}

/// Validates the workflow and its edges, printing every issue found.
fn run_check(workflow: &Workflow, as_json: bool) {
    let issues: Vec<Issue> = validate_workflow(&workflow.trigger, &workflow.nodes)
        .into_iter()
        .chain(validate_edges(&workflow.nodes, &workflow.edges))
        .collect();

    if as_json {
        let json = serde_json::to_string_pretty(&issues)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize issues: {}", e)));
        println!("{}", json);
    } else if issues.is_empty() {
        println!("Workflow is valid ({} node(s)).", workflow.nodes.len());
    } else {
        println!("Found {} issue(s):", issues.len());
        println!("{}", issues.iter().map(|issue| format!("  - {}", issue)).join("\n"));
    }

    if !issues.is_empty() {
        std::process::exit(1);
    }
}

fn run_preview(workflow: &Workflow, cli: &Cli) {
    let events = match &cli.payload_path {
        Some(path) => SampleEvents::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load payloads from '{}': {}", path, e))
        }),
        None => {
            if !cli.json {
                println!("No payload file provided. Using the demo contact.");
            }
            SampleEvents::demo()
        }
    };

    let mut builder = WorkflowEngine::builder();
    if let Some(now) = &cli.now {
        builder = builder.with_clock(Arc::new(FixedClock(parse_timestamp(now))));
    }
    let engine = builder.build();

    let start = Instant::now();
    let results = engine.run_batch(workflow, events.payloads());
    let duration = start.elapsed();

    if cli.json {
        let json = serde_json::to_string_pretty(&results)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize results: {}", e)));
        println!("{}", json);
    } else {
        for result in &results {
            println!("\n{}", TraceFormatter::format_result(result));
        }
        let failed = results.iter().filter(|result| !result.success).count();
        println!("\n--- Summary ---");
        println!("Runs:      {}", results.len());
        println!("Succeeded: {}", results.len() - failed);
        println!("Failed:    {}", failed);
        println!("Elapsed:   {:?}", duration);
    }

    if results.iter().any(|result| !result.success) {
        std::process::exit(2);
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid --now timestamp '{}': {}", value, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
