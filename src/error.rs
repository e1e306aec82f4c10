use thiserror::Error;

/// The reason a check is considered unhealthy.
///
/// Every variant is a health signal. None of them is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The check has not produced a result yet.
    #[error("not yet checked")]
    NotYetChecked,
    /// The check ran and reported a failure.
    #[error("{0}")]
    Failed(String),
    /// The check panicked while being evaluated.
    #[error("check panicked: {0}")]
    Panicked(String),
}

impl CheckError {
    pub fn failed(message: impl Into<String>) -> Self {
        CheckError::Failed(message.into())
    }
}

impl From<String> for CheckError {
    fn from(message: String) -> Self {
        CheckError::Failed(message)
    }
}

impl From<&str> for CheckError {
    fn from(message: &str) -> Self {
        CheckError::Failed(message.to_string())
    }
}
