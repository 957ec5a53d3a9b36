//! Error types for asset loading.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while loading an asset.
#[derive(Debug)]
pub enum AssetError {
    /// The requested asset was not found.
    NotFound {
        /// The path or identifier of the asset.
        path: String,
    },

    /// Failed to read asset data from the source.
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The bytes were read but could not be decoded.
    Decode {
        path: String,
        /// Description of the error.
        message: String,
    },

    /// The loading task ended without producing a result.
    Cancelled,
}

impl AssetError {
    pub fn decode(path: impl Into<String>, message: impl fmt::Display) -> Self {
        AssetError::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { path } => {
                write!(f, "Asset not found: {}", path)
            }
            AssetError::IoError { path, source } => {
                write!(f, "IO error loading '{}': {}", path.display(), source)
            }
            AssetError::Decode { path, message } => {
                write!(f, "Failed to decode '{}': {}", path, message)
            }
            AssetError::Cancelled => write!(f, "Asset task was cancelled"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

/// Result type alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_the_path() {
        let err = AssetError::decode("fonts/roboto.json", "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "Failed to decode 'fonts/roboto.json': expected value at line 1"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error;

        let err = AssetError::from(std::io::Error::other("disk on fire"));
        assert!(err.source().is_some());
    }
}
