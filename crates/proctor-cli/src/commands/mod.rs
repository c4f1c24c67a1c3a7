//! CLI command implementations

pub mod config;
pub mod problems;
pub mod run;

use anyhow::{Context as _, anyhow};
use proctor_core::{HarnessConfig, Problem, ProblemLoader};
use std::path::{Path, PathBuf};

/// Configuration and problem source shared by every command
pub struct Context {
    pub config: HarnessConfig,
    pub config_path: Option<PathBuf>,
    pub loader: ProblemLoader,
}

impl Context {
    /// Load the config file (or defaults) and apply environment overrides
    pub fn load(config_file: Option<&Path>, problems_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_path = config_file
            .map(Path::to_path_buf)
            .or_else(HarnessConfig::default_path);

        let mut config = match &config_path {
            Some(path) => HarnessConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => HarnessConfig::default(),
        };
        config.apply_env_overrides();

        let loader = match problems_dir {
            Some(dir) => ProblemLoader::new(dir),
            None => ProblemLoader::builtin(),
        };

        Ok(Self {
            config,
            config_path,
            loader,
        })
    }

    /// Look a problem up by id, failing with the known ids
    pub fn problem(&self, id: &str) -> anyhow::Result<Problem> {
        match self.loader.load_by_id(id)? {
            Some(problem) => Ok(problem),
            None => {
                let known = self.loader.list_ids()?;
                Err(anyhow!(
                    "unknown problem '{}' (available: {})",
                    id,
                    known.join(", ")
                ))
            }
        }
    }
}
