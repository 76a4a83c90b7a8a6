//! Directory primitives of the native layer.

use std::ffi::OsString;
use std::path::Path;

use crate::FsError;

/// Directory listing and creation.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
pub trait FsDir: Send + Sync {
    /// List the names of the immediate children of a directory.
    ///
    /// Names only, no paths, in whatever order the host yields them.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotADirectory`] if the path is not a directory
    fn list_entries(&self, path: &Path) -> Result<Vec<OsString>, FsError>;

    /// Create a single directory. The parent must exist.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the parent directory does not exist
    /// - [`FsError::AlreadyExists`] if the path already exists
    fn create_dir(&self, path: &Path) -> Result<(), FsError>;
}
