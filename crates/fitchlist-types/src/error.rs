use std::fmt;

/// Result type for fitchlist-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// Record has no value under the configured key field
    MissingKey(String),

    /// Key field holds a value that cannot identify a row (object, array, float, bool)
    InvalidKey(String),

    /// Record payload is not a JSON object
    NotAnObject,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingKey(field) => write!(f, "Record has no key field '{}'", field),
            Error::InvalidKey(field) => {
                write!(f, "Key field '{}' must be a string or an integer", field)
            }
            Error::NotAnObject => write!(f, "Record payload is not a JSON object"),
        }
    }
}

impl std::error::Error for Error {}
