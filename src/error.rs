//! Error types for the portable filesystem layer.

use std::io;
use std::path::{Path, PathBuf};

/// Filesystem error type with contextual variants.
///
/// Every variant that concerns a location carries the path and the operation
/// that failed. [`FsError::Unsupported`] names the rejected option so callers
/// can detect capability gaps programmatically.
///
/// # Examples
///
/// ```rust
/// use portable_fs::FsError;
/// use std::path::PathBuf;
///
/// let err = FsError::NotFound { path: PathBuf::from("/missing"), operation: "delete" };
/// assert_eq!(err.to_string(), "delete: not found: /missing");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Path does not exist.
    #[error("{operation}: not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    /// Path already exists when it shouldn't.
    #[error("{operation}: already exists: {}", path.display())]
    AlreadyExists {
        /// The path that already exists.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    /// Expected a directory but found something else.
    #[error("{operation}: not a directory: {}", path.display())]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    /// The requested option or feature is not implemented by this layer.
    #[error("{operation}: unsupported: {option}")]
    Unsupported {
        /// The operation that was attempted.
        operation: &'static str,
        /// The option, feature or scheme that is not supported.
        option: String,
    },

    /// File handle is invalid or already closed.
    #[error("invalid handle: {}", handle.0)]
    InvalidHandle {
        /// The invalid handle.
        handle: crate::Handle,
    },

    /// A URI could not be turned into a path.
    #[error("invalid uri {uri}: {reason}")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A directory was reached again through one of its own descendants.
    #[error("file system loop: {}", path.display())]
    FileSystemLoop {
        /// The directory that closes the cycle.
        path: PathBuf,
    },

    /// Configuration could not be parsed.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Native-layer failure not otherwise classified.
    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Classify a native I/O error, attaching the path and operation.
    pub fn from_io(operation: &'static str, path: &Path, error: io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path, operation },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path, operation },
            io::ErrorKind::NotADirectory => FsError::NotADirectory { path, operation },
            _ => FsError::Io {
                operation,
                path,
                source: error,
            },
        }
    }

    /// Shorthand for [`FsError::Unsupported`].
    pub fn unsupported(operation: &'static str, option: impl Into<String>) -> Self {
        FsError::Unsupported {
            operation,
            option: option.into(),
        }
    }

    /// Returns `true` for [`FsError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FsError::NotFound { path, .. }
            | FsError::AlreadyExists { path, .. }
            | FsError::NotADirectory { path, .. }
            | FsError::FileSystemLoop { path }
            | FsError::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<io::Error> for FsError {
    fn from(error: io::Error) -> Self {
        FsError::from_io("io", Path::new(""), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_operation() {
        let err = FsError::NotFound {
            path: PathBuf::from("/missing"),
            operation: "read_attributes",
        };
        assert_eq!(err.to_string(), "read_attributes: not found: /missing");
    }

    #[test]
    fn already_exists_display() {
        let err = FsError::AlreadyExists {
            path: PathBuf::from("/exists"),
            operation: "create_file",
        };
        assert_eq!(err.to_string(), "create_file: already exists: /exists");
    }

    #[test]
    fn unsupported_names_option() {
        let err = FsError::unsupported("copy", "REPLACE_EXISTING");
        assert_eq!(err.to_string(), "copy: unsupported: REPLACE_EXISTING");
        assert!(matches!(
            err,
            FsError::Unsupported { ref option, .. } if option == "REPLACE_EXISTING"
        ));
    }

    #[test]
    fn from_io_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err = FsError::from_io("stat", Path::new("/x"), io_err);
        assert!(err.is_not_found());
        assert_eq!(err.path(), Some(Path::new("/x")));
    }

    #[test]
    fn from_io_already_exists() {
        let io_err = io::Error::new(io::ErrorKind::AlreadyExists, "test");
        let err = FsError::from_io("create_new", Path::new("/x"), io_err);
        assert!(matches!(
            err,
            FsError::AlreadyExists {
                operation: "create_new",
                ..
            }
        ));
    }

    #[test]
    fn from_io_other_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err = FsError::from_io("open", Path::new("/secret"), io_err);
        assert!(matches!(err, FsError::Io { .. }));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/secret"));
    }

    #[test]
    fn plain_io_conversion_has_empty_context() {
        let err = FsError::from(io::Error::other("boom"));
        assert!(matches!(err, FsError::Io { operation: "io", .. }));
    }
}
