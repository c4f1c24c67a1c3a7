//! Harness configuration
//!
//! Loaded from TOML, YAML or JSON by file extension. Every section has
//! defaults, so a missing file or a partial one is fine.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capture::CaptureOptions;
use crate::error::{ProctorError, ProctorResult};
use crate::remote::{JUDGE_ENDPOINT_ENV, JudgeConfig};
use crate::sandbox::SandboxLimits;

/// Top-level configuration of a [`Harness`](crate::harness::Harness)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Resource limits for locally evaluated submissions
    #[serde(default)]
    pub sandbox: SandboxLimits,

    /// Output capture settings
    #[serde(default)]
    pub capture: CaptureOptions,

    /// Remote judge settings
    #[serde(default)]
    pub judge: JudgeConfig,
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sandbox(mut self, sandbox: SandboxLimits) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_capture(mut self, capture: CaptureOptions) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_judge(mut self, judge: JudgeConfig) -> Self {
        self.judge = judge;
        self
    }

    pub fn with_judge_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.judge.endpoint = endpoint.into();
        self
    }

    pub fn with_judge_timeout(mut self, timeout: Duration) -> Self {
        self.judge.timeout = timeout;
        self
    }

    /// `~/.proctor/config.toml`, when a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".proctor").join("config.toml"))
    }

    /// Load configuration from a file
    ///
    /// Returns the defaults if the file does not exist.
    pub fn load(path: &Path) -> ProctorResult<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ProctorError::config_with_context(
                format!("Failed to read config file: {}", e),
                format!("Reading configuration from '{}'", path.display()),
            )
        })?;

        let format = ConfigFormat::for_path(path);
        format.decode(&content).map_err(|message| {
            ProctorError::config_with_context(
                format!("Failed to parse {} config: {}", format, message),
                format!("Deserializing {} configuration from '{}'", format, path.display()),
            )
        })
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(JUDGE_ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(endpoint = %endpoint, "judge endpoint overridden from environment");
            self.judge.endpoint = endpoint;
        }
    }
}

/// On-disk configuration syntax, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Anything that is not TOML or YAML is read as JSON
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = HarnessConfig::load(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.judge.timeout, Duration::from_secs(30));
        assert_eq!(config.capture.max_lines, 1000);
    }

    #[test]
    fn test_load_partial_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[sandbox]
max_operations = 1000
time_limit = "250ms"

[judge]
endpoint = "http://judge.internal/api/submit_code"
timeout = "5s"
"#,
        )
        .unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.sandbox.max_operations, 1000);
        assert_eq!(config.sandbox.time_limit, Duration::from_millis(250));
        assert_eq!(config.judge.endpoint, "http://judge.internal/api/submit_code");
        assert_eq!(config.judge.timeout, Duration::from_secs(5));
        assert_eq!(config.capture, CaptureOptions::default());
    }

    #[test]
    fn test_load_yaml_and_json() {
        let temp_dir = TempDir::new().unwrap();

        let yaml = temp_dir.path().join("config.yaml");
        fs::write(&yaml, "capture:\n  pass_through: true\n  max_lines: 10\n").unwrap();
        let config = HarnessConfig::load(&yaml).unwrap();
        assert!(config.capture.pass_through);
        assert_eq!(config.capture.max_lines, 10);

        let json = temp_dir.path().join("config.json");
        fs::write(&json, r#"{"judge": {"timeout": "1m"}}"#).unwrap();
        let config = HarnessConfig::load(&json).unwrap();
        assert_eq!(config.judge.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[sandbox\n").unwrap();

        let err = HarnessConfig::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "PROCTOR_CONFIG");
        assert!(err.context().unwrap().contains("TOML"));
    }

    #[test]
    fn test_format_follows_extension() {
        let temp_dir = TempDir::new().unwrap();

        let path = temp_dir.path().join("config.yml");
        fs::write(&path, "sandbox: oops\n").unwrap();
        let err = HarnessConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse YAML config"));
        assert!(err.context().unwrap().contains("config.yml"));

        let path = temp_dir.path().join("config.conf");
        fs::write(&path, r#"{"capture": {"max_lines": 3}}"#).unwrap();
        assert_eq!(HarnessConfig::load(&path).unwrap().capture.max_lines, 3);
        assert_eq!(ConfigFormat::for_path(&path), ConfigFormat::Json);
    }

    #[test]
    fn test_env_override() {
        let mut config = HarnessConfig::default();
        config.apply_overrides_from(|key| {
            (key == JUDGE_ENDPOINT_ENV).then(|| "http://10.0.0.5:9000/submit".to_string())
        });
        assert_eq!(config.judge.endpoint, "http://10.0.0.5:9000/submit");

        let mut config = HarnessConfig::default();
        config.apply_overrides_from(|_| Some("  ".to_string()));
        assert_eq!(config.judge, JudgeConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::new()
            .with_sandbox(SandboxLimits::strict())
            .with_judge_endpoint("http://localhost:1234")
            .with_judge_timeout(Duration::from_secs(2));
        assert_eq!(config.sandbox, SandboxLimits::strict());
        assert_eq!(config.judge.endpoint, "http://localhost:1234");
        assert_eq!(config.judge.timeout, Duration::from_secs(2));
    }
}
