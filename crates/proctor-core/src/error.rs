//! Error types for the proctor harness
//!
//! These errors describe failures of the harness itself (bad configuration,
//! unreadable problem files, a run requested while another is in flight).
//! Faults raised by submitted code are never represented here; they become
//! [`Verdict`](crate::report::Verdict) values inside an evaluation report.

use thiserror::Error;

/// Result type alias for harness operations
pub type ProctorResult<T> = Result<T, ProctorError>;

/// Main error type for the harness
#[derive(Error, Debug, Clone)]
pub enum ProctorError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON / YAML / TOML decoding errors
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        context: Option<String>,
    },

    /// Problem definition is unusable
    #[error("Invalid problem '{problem_id}': {message}")]
    InvalidProblem { problem_id: String, message: String },

    /// A run was requested while another evaluation is in flight
    #[error("An evaluation is already running")]
    Busy,

    /// Language is not handled by the requested execution path
    #[error("Unsupported language for {path} execution: {language}")]
    UnsupportedLanguage { language: String, path: &'static str },

    /// Remote dispatch needs a Tokio runtime to drive the judge round trip
    #[error("Remote submission requires a Tokio runtime")]
    NoRuntime,
}

impl ProctorError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error for a specific path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            context: None,
        }
    }

    /// Create a parse error with context
    pub fn parse_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an invalid problem error
    pub fn invalid_problem(problem_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProblem {
            problem_id: problem_id.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported language error
    pub fn unsupported_language(language: impl Into<String>, path: &'static str) -> Self {
        Self::UnsupportedLanguage {
            language: language.into(),
            path,
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "PROCTOR_CONFIG",
            Self::Io { .. } => "PROCTOR_IO",
            Self::Parse { .. } => "PROCTOR_PARSE",
            Self::InvalidProblem { .. } => "PROCTOR_INVALID_PROBLEM",
            Self::Busy => "PROCTOR_BUSY",
            Self::UnsupportedLanguage { .. } => "PROCTOR_UNSUPPORTED_LANGUAGE",
            Self::NoRuntime => "PROCTOR_NO_RUNTIME",
        }
    }

    /// Optional context attached to the error
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } | Self::Parse { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProctorError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for ProctorError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse_with_context(error.to_string(), "JSON")
    }
}

impl From<serde_yaml::Error> for ProctorError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::parse_with_context(error.to_string(), "YAML")
    }
}

impl From<toml::de::Error> for ProctorError {
    fn from(error: toml::de::Error) -> Self {
        Self::parse_with_context(error.to_string(), "TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProctorError::Busy.to_string(),
            "An evaluation is already running"
        );
        assert_eq!(
            ProctorError::unsupported_language("python", "local").to_string(),
            "Unsupported language for local execution: python"
        );
    }

    #[test]
    fn test_error_codes_and_context() {
        let err = ProctorError::config_with_context("bad value", "reading config.toml");
        assert_eq!(err.error_code(), "PROCTOR_CONFIG");
        assert_eq!(err.context(), Some("reading config.toml"));

        let err = ProctorError::io_with_path("not found", "/tmp/missing.yaml");
        assert_eq!(err.context(), Some("/tmp/missing.yaml"));
        assert_eq!(ProctorError::NoRuntime.error_code(), "PROCTOR_NO_RUNTIME");
    }

    #[test]
    fn test_from_json_error() {
        let err: ProctorError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ProctorError::Parse { .. }));
        assert_eq!(err.context(), Some("JSON"));
    }
}
