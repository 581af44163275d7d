use crate::cli::OutputFormat;
use colored::Colorize;
use serde::Serialize;
use tracker_core::RepoRef;
use transfer_engine::{BatchResult, TransferPlan};

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

/// Progress note for text output; JSON output stays a single document
pub fn output_note(message: &str, format: OutputFormat) {
    if format == OutputFormat::Text {
        println!("{}", message.dimmed());
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

pub trait Displayable {
    fn display(&self) -> String;
}

/// Outcome of a `transfer` run as shown to the user
#[derive(Serialize)]
pub struct TransferReport {
    pub source: RepoRef,
    pub target: RepoRef,
    pub include_closed: bool,
    #[serde(flatten)]
    pub result: BatchResult,
}

fn issue_list(numbers: &[u64]) -> String {
    if numbers.is_empty() {
        return "none".dimmed().to_string();
    }
    numbers
        .iter()
        .map(|n| format!("#{}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Displayable for TransferReport {
    fn display(&self) -> String {
        let result = &self.result;
        let headline = format!(
            "Transferred {} of {} issues from {} to {}",
            result.successful.len(),
            result.total(),
            self.source.to_string().cyan(),
            self.target.to_string().cyan()
        );
        let mut output = if result.is_success() {
            headline.green().bold().to_string()
        } else {
            headline.yellow().bold().to_string()
        };

        output.push_str(&format!(
            "\n  {}: {}",
            "Successful".dimmed(),
            issue_list(&result.successful)
        ));
        let unsuccessful = issue_list(&result.unsuccessful);
        output.push_str(&format!(
            "\n  {}: {}",
            "Unsuccessful".dimmed(),
            if result.unsuccessful.is_empty() {
                unsuccessful
            } else {
                unsuccessful.red().to_string()
            }
        ));

        if !result.unlabeled.is_empty() {
            output.push_str(&format!(
                "\n  {}: {}",
                "Labels not applied (new number unknown)".dimmed(),
                issue_list(&result.unlabeled).yellow()
            ));
        }

        if !result.failures.is_empty() {
            output.push_str(&format!("\n  {}:", "Failures".dimmed()));
            for failure in &result.failures {
                output.push_str(&format!(
                    "\n    #{}: {}",
                    failure.number.to_string().red(),
                    failure.reason
                ));
            }
        }

        if !result.label_failures.is_empty() {
            output.push_str(&format!("\n  {}:", "Labels not created".dimmed()));
            for failure in &result.label_failures {
                output.push_str(&format!(
                    "\n    {}: {}",
                    failure.name.magenta(),
                    failure.reason
                ));
            }
        }

        output
    }
}

impl Displayable for TransferPlan {
    fn display(&self) -> String {
        let mut output = format!(
            "{} {} -> {}",
            "Plan:".bold(),
            self.source.to_string().cyan(),
            self.target.to_string().cyan()
        );

        let labels = if self.labels_to_create.is_empty() {
            "none".dimmed().to_string()
        } else {
            self.labels_to_create
                .iter()
                .map(|l| l.magenta().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        output.push_str(&format!("\n  {}: {}", "Labels to create".dimmed(), labels));
        output.push_str(&format!("\n  {}: {}", "Order".dimmed(), issue_list(&self.order)));

        if !self.references.is_empty() {
            output.push_str(&format!("\n  {}:", "References".dimmed()));
            for (number, referenced) in &self.references {
                output.push_str(&format!("\n    #{} -> {}", number, issue_list(referenced)));
            }
        }

        output
    }
}
