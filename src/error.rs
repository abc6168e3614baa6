//! Unified error type for all store, codec and path operations.

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (read, write, rename, mkdir).
    Io(String),
    /// Failed to serialize the mapping to bytes.
    Serialize(String),
    /// A codec could not read the bytes as a document of its format.
    Parse(String),
    /// A value had the wrong shape for the operation, e.g. a path lookup on
    /// an array root.
    TypeMismatch {
        /// Type the operation needs.
        expected: &'static str,
        /// Type it actually got.
        actual: &'static str,
    },
    /// Empty path, or a path with an empty segment.
    Path(String),
    /// Store keys must be non-empty.
    InvalidKey(String),
    /// Bad configuration (unusable directory, name, extension).
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Parse(msg) => write!(f, "parse error: {msg}"),
            Error::TypeMismatch { expected, actual } => {
                write!(f, "type mismatch: expected {expected}, received {actual}")
            }
            Error::Path(msg) => write!(f, "invalid path: {msg}"),
            Error::InvalidKey(msg) => write!(f, "invalid key: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Parse(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(err: rmp_serde::decode::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
