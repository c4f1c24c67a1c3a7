//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use crate::console::CliConsole;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let console = CliConsole::new(cli.verbose);
    let context = commands::Context::load(cli.config_file.as_deref(), cli.problems_dir.clone())?;

    match cli.command {
        Commands::Run {
            file,
            language,
            problem,
            judge,
            format,
        } => {
            let outcome = commands::run::execute(
                &console,
                &context,
                commands::run::RunArgs {
                    file,
                    language,
                    problem,
                    judge,
                    format,
                },
            )
            .await?;
            if !outcome.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Problems { action } => commands::problems::execute(&console, &context, action),
        Commands::Config { action } => commands::config::execute(&console, &context, action),
    }
}
