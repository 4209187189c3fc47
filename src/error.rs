//! Errors for the file-backed parts of the game (high score and settings).
//!
//! The simulation itself never fails; everything here is recovered by the
//! caller with a logged warning and a default value.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PersistenceError {
    /// Reading or writing the file failed
    Io(std::io::Error),
    /// The file exists but does not hold a valid value
    Corrupt {
        path: PathBuf,
        /// Number of bytes actually read
        len: usize,
    },
    /// Settings JSON could not be parsed or produced
    Json(serde_json::Error),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "i/o error: {}", e),
            PersistenceError::Corrupt { path, len } => write!(
                f,
                "corrupt file '{}': {} bytes, expected 4",
                path.display(),
                len
            ),
            PersistenceError::Json(e) => write!(f, "invalid json: {}", e),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
            PersistenceError::Corrupt { .. } => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

impl PersistenceError {
    /// The file simply isn't there yet (first run)
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Convenience alias: a `Result` using `PersistenceError` as the error type.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err: PersistenceError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(err.is_not_found());
        let err = PersistenceError::Corrupt {
            path: PathBuf::from("x.dat"),
            len: 2,
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "corrupt file 'x.dat': 2 bytes, expected 4");
    }
}
