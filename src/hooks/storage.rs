use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::StorageError;

// ============================================================================
// Collaborator traits
// ============================================================================

/// Where form definitions live. A persistence identifier names one stored
/// definition.
pub trait FormPersistence {
    fn load(&self, persistence_identifier: &str) -> Result<Value, StorageError>;

    fn save(&self, persistence_identifier: &str, definition: &Value) -> Result<(), StorageError>;

    fn exists(&self, persistence_identifier: &str) -> bool;

    /// Copy the stored definition to `file_name` next to the original.
    /// Returns the copy's persistence identifier, or `None` when the store
    /// has no physical file for this definition.
    fn archive_copy(
        &self,
        persistence_identifier: &str,
        file_name: &str,
    ) -> Result<Option<String>, StorageError>;
}

/// Stored submissions, looked up by the definition they were made against.
pub trait SubmissionRepository {
    fn find_by_form_persistence_identifier(
        &self,
        persistence_identifier: &str,
    ) -> Result<Vec<FormSubmission>, StorageError>;

    fn update(&self, submission: &FormSubmission) -> Result<(), StorageError>;
}

/// One stored form result. `fields` is keyed by field state identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub uid: u64,
    pub form_identifier: String,
    pub form_persistence_identifier: String,

    /// Unix seconds
    #[serde(default)]
    pub submitted_at: u64,

    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

// ============================================================================
// Filesystem form storage
// ============================================================================

/// Definitions stored as YAML files below one directory. The persistence
/// identifier is the file path relative to that directory.
#[derive(Debug, Clone)]
pub struct FileFormStorage {
    root: PathBuf,
}

impl FileFormStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, persistence_identifier: &str) -> PathBuf {
        self.root.join(persistence_identifier)
    }
}

impl FormPersistence for FileFormStorage {
    fn load(&self, persistence_identifier: &str) -> Result<Value, StorageError> {
        let path = self.path_of(persistence_identifier);
        if !path.is_file() {
            return Err(StorageError::NotFound(persistence_identifier.to_string()));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| StorageError::Yaml {
            context: format!("loading {}", persistence_identifier),
            source,
        })
    }

    fn save(&self, persistence_identifier: &str, definition: &Value) -> Result<(), StorageError> {
        let path = self.path_of(persistence_identifier);
        let yaml = serde_yaml::to_string(definition).map_err(|source| StorageError::Yaml {
            context: format!("saving {}", persistence_identifier),
            source,
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(&path, yaml).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn exists(&self, persistence_identifier: &str) -> bool {
        self.path_of(persistence_identifier).is_file()
    }

    fn archive_copy(
        &self,
        persistence_identifier: &str,
        file_name: &str,
    ) -> Result<Option<String>, StorageError> {
        let source_path = self.path_of(persistence_identifier);
        if !source_path.is_file() {
            return Ok(None);
        }

        let relative_parent = Path::new(persistence_identifier)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let relative_target = relative_parent.join(file_name);
        let target_path = self.root.join(&relative_target);

        std::fs::copy(&source_path, &target_path).map_err(|source| StorageError::Io {
            path: target_path.display().to_string(),
            source,
        })?;

        Ok(Some(relative_target.to_string_lossy().replace('\\', "/")))
    }
}

// ============================================================================
// JSON submission store
// ============================================================================

/// All submissions in one JSON array file. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonSubmissionStore {
    path: PathBuf,
}

impl JsonSubmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn all(&self) -> Result<Vec<FormSubmission>, StorageError> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StorageError::Json {
            context: format!("reading {}", self.path.display()),
            source,
        })
    }

    /// Add a submission, assigning the next free uid. Returns the uid.
    pub fn insert(&self, mut submission: FormSubmission) -> Result<u64, StorageError> {
        let mut all = self.all()?;
        submission.uid = all.iter().map(|s| s.uid).max().unwrap_or(0) + 1;
        let uid = submission.uid;
        all.push(submission);
        self.write_all(&all)?;
        Ok(uid)
    }

    fn write_all(&self, submissions: &[FormSubmission]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(submissions).map_err(|source| StorageError::Json {
            context: format!("writing {}", self.path.display()),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl SubmissionRepository for JsonSubmissionStore {
    fn find_by_form_persistence_identifier(
        &self,
        persistence_identifier: &str,
    ) -> Result<Vec<FormSubmission>, StorageError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|s| s.form_persistence_identifier == persistence_identifier)
            .collect())
    }

    fn update(&self, submission: &FormSubmission) -> Result<(), StorageError> {
        let mut all = self.all()?;
        match all.iter_mut().find(|s| s.uid == submission.uid) {
            Some(existing) => *existing = submission.clone(),
            None => all.push(submission.clone()),
        }
        self.write_all(&all)
    }
}
