use std::fmt;

/// Result type for fitchlist-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Persistence or path layer error
    Core(fitchlist_core::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// No resource with this name is configured
    UnknownResource(String),

    /// An endpoint placeholder was left without a value
    MissingParam { resource: String, param: String },

    /// Building the HTTP client or a request URL failed
    Http(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Core(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::UnknownResource(name) => write!(f, "Unknown resource '{}'", name),
            Error::MissingParam { resource, param } => write!(
                f,
                "Resource '{}' needs --param {}=<value>",
                resource, param
            ),
            Error::Http(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Core(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_)
            | Error::UnknownResource(_)
            | Error::MissingParam { .. }
            | Error::Http(_) => None,
        }
    }
}

impl From<fitchlist_core::Error> for Error {
    fn from(err: fitchlist_core::Error) -> Self {
        Error::Core(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Http(err.to_string())
    }
}
