//! Console output formatter for agent responses

use colored::Colorize;
use thinktank_domain::{AgentResponse, ConfigIssue, Severity};

/// Formats responses for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the response with everything that explains it
    pub fn format(input: &str, response: &AgentResponse) -> String {
        let meta = &response.metadata;
        let mut output = String::new();

        output.push_str(&Self::header("thinktank"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Request:".cyan().bold(), input));

        if meta.degraded {
            output.push_str(&format!(
                "{} {}\n\n",
                "Degraded:".red().bold(),
                meta.degraded_reason.as_deref().unwrap_or("unknown reason")
            ));
        }

        output.push_str(&Self::section_header("Answer"));
        output.push_str(&format!("\n{}\n\n", response.content));
        output.push_str(&format!(
            "{} {}\n",
            "Confidence:".cyan().bold(),
            Self::confidence_bar(response.confidence)
        ));

        output.push_str(&Self::section_header("Agents"));
        output.push_str(&format!(
            "\n{} {}\n",
            "Contributing:".green().bold(),
            Self::join_or_none(meta.contributing_agents.iter().map(|a| a.to_string()))
        ));
        if !meta.failed_agents.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Failed:".red().bold(),
                Self::join_or_none(meta.failed_agents.iter().map(|a| a.to_string()))
            ));
        }

        if let Some(id) = &meta.collaboration_id {
            output.push_str(&Self::section_header("Collaboration"));
            let consensus = match meta.consensus_reached {
                Some(true) => "reached".green().to_string(),
                Some(false) => "not reached".yellow().to_string(),
                None => "n/a".dimmed().to_string(),
            };
            output.push_str(&format!("\n{} {}\n", "Session:".bold(), id));
            output.push_str(&format!("{} {}\n", "Consensus:".bold(), consensus));
        }

        output.push_str(&Self::section_header("Optimization"));
        output.push_str(&format!(
            "\n{} {}{}\n",
            "Iterations:".bold(),
            meta.optimization_iterations,
            if meta.optimization_stalled {
                format!(" {}", "(stalled)".yellow())
            } else {
                String::new()
            }
        ));

        if !response.alternatives.is_empty() {
            output.push_str(&format!("\n{}\n", "Alternatives considered:".yellow().bold()));
            for alternative in &response.alternatives {
                output.push_str(&format!("  * {}\n", alternative));
            }
        }

        if let Some(warnings) = meta.extra.get("warnings").and_then(|w| w.as_array())
            && !warnings.is_empty()
        {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in warnings {
                output.push_str(&format!("  * {}\n", warning.as_str().unwrap_or_default()));
            }
        }
        if meta.persistence_failures > 0 {
            output.push_str(&format!(
                "{} {} artifact(s) could not be saved\n",
                "Note:".dimmed(),
                meta.persistence_failures
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(response: &AgentResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the answer only (concise output)
    pub fn format_response_only(response: &AgentResponse) -> String {
        let mut output = String::new();
        output.push_str(&response.content);
        output.push_str(&format!(
            "\n\n{} {:.0}%{}\n",
            "confidence".dimmed(),
            response.confidence * 100.0,
            if response.metadata.degraded {
                format!(" {}", "(degraded)".red())
            } else {
                String::new()
            }
        ));
        output
    }

    /// Format configuration issues, one per line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn confidence_bar(confidence: f64) -> String {
        let filled = (confidence.clamp(0.0, 1.0) * 20.0).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(20 - filled));
        let colored_bar = if confidence >= 0.8 {
            bar.green()
        } else if confidence >= 0.5 {
            bar.yellow()
        } else {
            bar.red()
        };
        format!("[{}] {:.0}%", colored_bar, confidence * 100.0)
    }

    fn join_or_none(items: impl Iterator<Item = String>) -> String {
        let items: Vec<_> = items.collect();
        if items.is_empty() {
            "none".dimmed().to_string()
        } else {
            items.join(", ")
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
