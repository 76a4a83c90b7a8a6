//! Mutating primitives of the native layer.

use std::path::Path;

use crate::FsError;

/// Create, rename and delete primitives.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsWrite`.
pub trait FsWrite: Send + Sync {
    /// Atomically create an empty file that must not exist yet.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if something is already at `path`
    /// - [`FsError::NotFound`] if the parent directory does not exist
    fn create_new(&self, path: &Path) -> Result<(), FsError>;

    /// Rename a file or directory.
    ///
    /// Trusted to be atomic where the host supports it. Never falls back to
    /// copy-and-delete.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if `from` does not exist
    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    /// Remove a file or an empty directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn remove(&self, path: &Path) -> Result<(), FsError>;
}
