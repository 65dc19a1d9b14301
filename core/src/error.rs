//! Error types for the retrieval engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a run, plus the undefined-metric condition
/// reported per query by the evaluator.
#[derive(Debug, Error)]
pub enum Error {
    /// An input file does not exist
    #[error("file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// An input file exists but could not be read or decoded
    #[error("failed to read {}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A trace or report file could not be written
    #[error("failed to write {}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Bad configuration value (encoding label, language, thresholds)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Precision or recall asked for with an empty denominator set
    #[error("{metric} is undefined: {reason}")]
    UndefinedMetric {
        metric: &'static str,
        reason: &'static str,
    },
}

impl Error {
    /// Classify an I/O error raised while opening or reading `path`.
    pub(crate) fn reading(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound { path, source },
            _ => Error::ReadFailure { path, source },
        }
    }

    pub(crate) fn writing(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::WriteFailure { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_classified_as_not_found() {
        let err = Error::reading("docs.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(err.to_string(), "file not found: docs.txt");
    }

    #[test]
    fn other_io_errors_are_read_failures() {
        let err = Error::reading("docs.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, Error::ReadFailure { .. }));
    }
}
