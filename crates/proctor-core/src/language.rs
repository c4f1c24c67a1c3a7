//! Submission languages and submissions

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ProctorError;

/// Language a submission is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Rhai, evaluated in-process by the embedded interpreter
    Rhai,
    /// JavaScript, graded by the remote judge
    Javascript,
    /// TypeScript, graded by the remote judge
    Typescript,
    /// Python, graded by the remote judge
    Python,
}

impl Language {
    /// Wire / config name of the language
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rhai => "rhai",
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Python => "python",
        }
    }

    /// Get display name for this language
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Rhai => "Rhai (Runnable)",
            Language::Javascript => "JavaScript",
            Language::Typescript => "TypeScript",
            Language::Python => "Python",
        }
    }

    /// Whether the local executor can run this language in-process
    pub fn is_local(&self) -> bool {
        matches!(self, Language::Rhai)
    }

    /// Get all languages
    pub fn all() -> &'static [Language] {
        &[
            Language::Rhai,
            Language::Javascript,
            Language::Typescript,
            Language::Python,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = ProctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rhai" => Ok(Language::Rhai),
            "javascript" | "js" => Ok(Language::Javascript),
            "typescript" | "ts" => Ok(Language::Typescript),
            "python" | "py" => Ok(Language::Python),
            other => Err(ProctorError::config(format!("Unknown language: {}", other))),
        }
    }
}

/// Source text submitted by a candidate
///
/// Immutable once created and consumed by exactly one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    language: Language,
    source: String,
}

impl Submission {
    pub fn new(language: Language, source: impl Into<String>) -> Self {
        Self {
            language,
            source: source.into(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_aliases() {
        assert_eq!("js".parse::<Language>().unwrap(), Language::Javascript);
        assert_eq!(" Python ".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("RHAI".parse::<Language>().unwrap(), Language::Rhai);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_only_rhai_is_local() {
        let local: Vec<_> = Language::all().iter().filter(|l| l.is_local()).collect();
        assert_eq!(local, vec![&Language::Rhai]);
    }

    #[test]
    fn test_language_serde_name() {
        let json = serde_json::to_string(&Language::Typescript).unwrap();
        assert_eq!(json, "\"typescript\"");
    }
}
