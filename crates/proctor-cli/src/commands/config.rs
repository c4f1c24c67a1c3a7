//! `proctor config`: inspect and initialise the configuration file

use anyhow::{Context as _, anyhow, bail};
use proctor_core::HarnessConfig;

use super::Context;
use crate::args::ConfigAction;
use crate::console::CliConsole;

pub fn execute(console: &CliConsole, context: &Context, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => show(console, context),
        ConfigAction::Init { force } => init(console, context, force),
    }
}

fn show(console: &CliConsole, context: &Context) -> anyhow::Result<()> {
    match &context.config_path {
        Some(path) if path.exists() => console.info(&format!("loaded from {}", path.display())),
        _ => console.info("no configuration file, showing defaults"),
    }
    println!("{}", toml::to_string_pretty(&context.config)?);
    Ok(())
}

fn init(console: &CliConsole, context: &Context, force: bool) -> anyhow::Result<()> {
    let path = context
        .config_path
        .clone()
        .ok_or_else(|| anyhow!("no home directory; pass --config-file"))?;

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&HarnessConfig::default())?;
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    console.success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}
