use crate::executor::{Step, StepStatus, WorkflowResult};
use itertools::Itertools;

/// Formats run results into human-readable text for previews and logs.
pub struct TraceFormatter;

impl TraceFormatter {
    /// Formats a whole run: a headline, one line per step, then the error (if any).
    pub fn format_result(result: &WorkflowResult) -> String {
        let outcome = if result.success { "SUCCEEDED" } else { "FAILED" };
        let trigger = if result.trigger_type.is_empty() {
            "<unset>"
        } else {
            result.trigger_type.as_str()
        };

        let mut lines = vec![format!(
            "Workflow run (trigger: {}) {} after {} step(s)",
            trigger,
            outcome,
            result.steps.len()
        )];
        lines.extend(result.steps.iter().map(|step| format!("  {}", Self::format_step(step))));

        if let Some(error) = &result.error {
            match &error.failing_node_id {
                Some(node_id) => lines.push(format!("Failed at node '{}': {}", node_id, error.message)),
                None => lines.push(format!("Failed: {}", error.message)),
            }
            if let Some(issues) = error.issues.as_ref().filter(|issues| issues.len() > 1) {
                lines.push("All issues:".to_string());
                lines.extend(issues.iter().map(|issue| format!("  - {}", issue)));
            }
        }

        lines.into_iter().join("\n")
    }

    /// Formats one step, e.g. `3. [ok] condition (check-tag): ... -> YES`.
    pub fn format_step(step: &Step) -> String {
        let marker = match step.status {
            StepStatus::Pending => "..",
            StepStatus::Success => "ok",
            StepStatus::Error => "!!",
        };
        let detail = match (&step.error, &step.output) {
            (Some(error), _) => error.clone(),
            (None, Some(output)) => output
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or_default()
                .to_string(),
            (None, None) => String::new(),
        };

        let mut line = format!(
            "{}. [{}] {} ({}): {}",
            step.index, marker, step.node_type, step.node_id, detail
        );
        if let Some(branch) = step.branch_taken {
            line.push_str(&format!(" -> {}", branch));
        }
        line
    }
}
