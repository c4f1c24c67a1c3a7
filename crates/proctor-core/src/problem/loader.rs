//! Problem loading from YAML/JSON files

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::Problem;
use crate::error::{ProctorError, ProctorResult};

/// Loader for problem definitions
pub struct ProblemLoader {
    problems_dir: PathBuf,
}

impl ProblemLoader {
    pub fn new(problems_dir: impl AsRef<Path>) -> Self {
        Self {
            problems_dir: problems_dir.as_ref().to_path_buf(),
        }
    }

    /// Loader over the problems shipped with this crate
    pub fn builtin() -> Self {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        Self::new(Path::new(manifest_dir).join("problems"))
    }

    pub fn problems_dir(&self) -> &Path {
        &self.problems_dir
    }

    /// Load every problem under the directory, sorted by id
    ///
    /// Unreadable or invalid files are skipped with a warning.
    pub fn load_all(&self) -> ProctorResult<Vec<Problem>> {
        let mut problems = Vec::new();

        if !self.problems_dir.exists() {
            return Ok(problems);
        }

        for entry in WalkDir::new(&self.problems_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !Self::is_problem_file(path) {
                continue;
            }
            match Self::load_file(path) {
                Ok(problem) => problems.push(problem),
                Err(e) => tracing::warn!("Failed to load problem from {:?}: {}", path, e),
            }
        }

        problems.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(problems)
    }

    /// Load a single problem by id
    ///
    /// `two-sum` is always available, even when the directory lacks it.
    pub fn load_by_id(&self, id: &str) -> ProctorResult<Option<Problem>> {
        let found = self.load_all()?.into_iter().find(|p| p.id == id);
        match found {
            Some(problem) => Ok(Some(problem)),
            None if id == "two-sum" => Problem::two_sum().map(Some),
            None => Ok(None),
        }
    }

    /// List available problem ids
    pub fn list_ids(&self) -> ProctorResult<Vec<String>> {
        Ok(self.load_all()?.into_iter().map(|p| p.id).collect())
    }

    /// Load and validate one problem file
    pub fn load_file(path: &Path) -> ProctorResult<Problem> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProctorError::io_with_path(e.to_string(), path.display().to_string())
        })?;

        if path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
        {
            Problem::from_yaml(&content)
        } else {
            Problem::from_json(&content)
        }
    }

    fn is_problem_file(path: &Path) -> bool {
        path.is_file()
            && matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml") | Some("json")
            )
    }
}
