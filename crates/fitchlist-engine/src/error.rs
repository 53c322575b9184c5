use std::fmt;

/// Result type for fitchlist-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by action handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum Error {
    /// Persisting view state failed
    Storage(fitchlist_core::Error),

    /// Action needs an explicit confirmation before it runs
    ConfirmationRequired(String),

    /// Action handler reported a failure
    Action { key: String, source: BoxError },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage(err) => write!(f, "Storage error: {}", err),
            Error::ConfirmationRequired(key) => {
                write!(f, "Action '{}' requires confirmation", key)
            }
            Error::Action { key, source } => write!(f, "Action '{}' failed: {}", key, source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Storage(err) => Some(err),
            Error::Action { source, .. } => Some(source.as_ref()),
            Error::ConfirmationRequired(_) => None,
        }
    }
}

impl From<fitchlist_core::Error> for Error {
    fn from(err: fitchlist_core::Error) -> Self {
        Error::Storage(err)
    }
}
