use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldStateError {
    /// A field node lacks a required key (`identifier` or `type`)
    MissingAttribute { path: String, attribute: &'static str },

    /// A required key is present but not a string
    InvalidAttribute { path: String, attribute: &'static str, expected: &'static str },

    /// Two nodes of the definition share one identifier
    DuplicateIdentifier(String),

    /// An entry of `renderingOptions.fieldState` could not be read
    MalformedState { identifier: String, reason: String },

    /// A node that must be a mapping is something else
    NotAMapping(String),

    /// No numeric suffix is left for this identifier prefix
    IdentifierSpaceExhausted(String),
}

impl fmt::Display for FieldStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldStateError::MissingAttribute { path, attribute } => {
                write!(f, "Field at {} has no '{}'", path, attribute)
            }
            FieldStateError::InvalidAttribute { path, attribute, expected } => {
                write!(f, "Field at {}: '{}' must be a {}", path, attribute, expected)
            }
            FieldStateError::DuplicateIdentifier(id) => {
                write!(f, "Identifier '{}' is used more than once in the form definition", id)
            }
            FieldStateError::MalformedState { identifier, reason } => {
                write!(f, "Malformed field state entry '{}': {}", identifier, reason)
            }
            FieldStateError::NotAMapping(path) => {
                write!(f, "Expected a mapping at {}", path)
            }
            FieldStateError::IdentifierSpaceExhausted(prefix) => {
                write!(f, "No free identifier left for '{}-<n>'", prefix)
            }
        }
    }
}

impl std::error::Error for FieldStateError {}

#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing a file failed
    Io { path: String, source: std::io::Error },

    /// YAML (de)serialization of a form definition failed
    Yaml { context: String, source: serde_yaml::Error },

    /// JSON (de)serialization of the submission store failed
    Json { context: String, source: serde_json::Error },

    /// No stored form definition with this persistence identifier
    NotFound(String),

    /// The field state tracker rejected the definition
    FieldState(FieldStateError),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, source } => write!(f, "I/O error on {}: {}", path, source),
            StorageError::Yaml { context, source } => {
                write!(f, "YAML error ({}): {}", context, source)
            }
            StorageError::Json { context, source } => {
                write!(f, "JSON error ({}): {}", context, source)
            }
            StorageError::NotFound(id) => write!(f, "Form definition '{}' not found", id),
            StorageError::FieldState(e) => write!(f, "Field state error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            StorageError::Yaml { source, .. } => Some(source),
            StorageError::Json { source, .. } => Some(source),
            StorageError::FieldState(e) => Some(e),
            StorageError::NotFound(_) => None,
        }
    }
}

impl From<FieldStateError> for StorageError {
    fn from(e: FieldStateError) -> Self {
        StorageError::FieldState(e)
    }
}
