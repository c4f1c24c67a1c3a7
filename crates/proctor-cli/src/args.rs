//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use proctor_core::ReportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "proctor")]
#[command(about = "Proctor - sandboxed execution and grading for coding-interview submissions")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (defaults to ~/.proctor/config.toml)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Directory of problem definitions (YAML/JSON)
    #[arg(long, global = true, env = "PROCTOR_PROBLEMS_DIR")]
    pub problems_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a submission against a problem
    Run {
        /// Source file of the submission
        file: PathBuf,

        /// Submission language (inferred from the file extension if omitted)
        #[arg(long, short)]
        language: Option<String>,

        /// Problem to grade against
        #[arg(long, short, default_value = "two-sum")]
        problem: String,

        /// Judge endpoint for remote-only languages
        #[arg(long, env = "PROCTOR_JUDGE_ENDPOINT")]
        judge: Option<String>,

        /// Report format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: ReportFormat,
    },

    /// Browse problem definitions
    Problems {
        #[command(subcommand)]
        action: ProblemsAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProblemsAction {
    /// List available problems
    List,

    /// Show a problem statement and its test table
    Show {
        /// Problem id
        id: String,
    },

    /// Print the starter code for a problem
    Template {
        /// Problem id
        id: String,

        /// Starter language
        #[arg(long, short, default_value = "rhai")]
        language: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,

    /// Write a configuration file with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_format(value: &str) -> Result<ReportFormat, String> {
    ReportFormat::parse(value).ok_or_else(|| format!("unknown format '{}' (expected text or json)", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["proctor", "run", "solution.rhai", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Run {
                file,
                language,
                problem,
                format,
                ..
            } => {
                assert_eq!(file, PathBuf::from("solution.rhai"));
                assert!(language.is_none());
                assert_eq!(problem, "two-sum");
                assert_eq!(format, ReportFormat::Json);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_format_defaults_to_text_and_rejects_unknown() {
        let cli = Cli::try_parse_from(["proctor", "run", "solution.rhai"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                format: ReportFormat::Text,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["proctor", "run", "solution.rhai", "--format", "TXT"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                format: ReportFormat::Text,
                ..
            }
        ));

        assert!(Cli::try_parse_from(["proctor", "run", "solution.rhai", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_parse_template() {
        let cli =
            Cli::try_parse_from(["proctor", "problems", "template", "two-sum", "-l", "python"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Problems {
                action: ProblemsAction::Template { .. }
            }
        ));
    }
}
