//! `proctor run`: evaluate a submission file

use anyhow::{Context as _, anyhow};
use proctor_core::{Harness, Language, ReportFormat, Verdict, render_report};
use std::path::{Path, PathBuf};

use super::Context;
use crate::console::CliConsole;

pub struct RunArgs {
    pub file: PathBuf,
    pub language: Option<String>,
    pub problem: String,
    pub judge: Option<String>,
    pub format: ReportFormat,
}

/// Run the submission and print its report; returns the verdict
pub async fn execute(console: &CliConsole, context: &Context, args: RunArgs) -> anyhow::Result<Verdict> {
    let language = resolve_language(&args.file, args.language.as_deref())?;
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading submission {}", args.file.display()))?;

    let mut config = context.config.clone();
    if let Some(endpoint) = args.judge {
        config.judge.endpoint = endpoint;
    }

    let problem = context.problem(&args.problem)?;
    console.info(&format!(
        "grading {} ({}) against '{}'",
        args.file.display(),
        language.display_name(),
        problem.id
    ));
    let harness = Harness::new(config, problem)?;

    let report = if language.is_local() {
        harness.run_local(&source)?
    } else {
        let pending = harness.run_remote(language, source)?;
        let spinner = console.spinner(&format!(
            "Waiting for judge at {} (Ctrl-C to cancel)",
            harness.config().judge.endpoint
        ));

        let token = pending.cancellation_token();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });

        let report = pending.wait().await;
        interrupt.abort();
        spinner.finish_and_clear();
        report
    };

    match args.format {
        ReportFormat::Text => console.print_report(&report),
        ReportFormat::Json => println!("{}", render_report(&report, ReportFormat::Json)?),
    }

    Ok(report.verdict)
}

/// Explicit language name, or the one implied by the file extension
fn resolve_language(file: &Path, explicit: Option<&str>) -> anyhow::Result<Language> {
    if let Some(name) = explicit {
        return Ok(name.parse()?);
    }
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("cannot infer language of {}; pass --language", file.display()))?;
    extension
        .parse()
        .map_err(|_| anyhow!("unrecognised extension '.{}'; pass --language", extension))
}
