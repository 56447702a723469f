use thiserror::Error;

/// Failure of a generation pass.
///
/// Blocks emitted before the failure are not rolled back.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation cancelled")]
    Cancelled,

    #[error(transparent)]
    Sink(anyhow::Error),
}

impl GenerateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerateError::Cancelled)
    }

    /// The error the sink returned, untouched.
    pub fn sink_error(&self) -> Option<&anyhow::Error> {
        match self {
            GenerateError::Sink(e) => Some(e),
            GenerateError::Cancelled => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode profile: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("invalid profile: {0}")]
    Invalid(String),
}
