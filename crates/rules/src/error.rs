/// Errors that can occur during rule loading and management.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Rule failed validation (shape mismatch, empty id, inverted range...).
    #[error("Invalid rule configuration: {0}")]
    InvalidRule(String),

    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("Duplicate rule id: {0}")]
    Duplicate(String),

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
