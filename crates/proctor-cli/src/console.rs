//! CLI console utilities

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use proctor_core::{EvaluationReport, Verdict};
use std::time::Duration;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Spinner shown while a remote submission is pending
    pub fn spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Print a report with the summary line colored by verdict
    pub fn print_report(&self, report: &EvaluationReport) {
        let mut lines = report.lines.iter();
        if let Some(summary) = lines.next() {
            let summary = match report.verdict {
                Verdict::AllPassed => summary.green().bold(),
                Verdict::PartialPass { .. } => summary.yellow().bold(),
                Verdict::Cancelled => summary.dimmed(),
                _ => summary.red().bold(),
            };
            println!("{}", summary);
        }

        for line in lines {
            if line.starts_with("test ") {
                if line.ends_with('✓') {
                    println!("{}", line.green());
                } else {
                    println!("{}", line.red());
                }
            } else {
                println!("{}", line);
            }
        }

        self.info(&format!(
            "evaluation {} took {}ms",
            report.id,
            report.duration_ms()
        ));
    }
}
