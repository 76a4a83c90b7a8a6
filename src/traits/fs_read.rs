//! Query primitives of the native layer.

use std::path::{Path, PathBuf};

use crate::{Access, Attributes, FsError};

/// Read-only queries against the native filesystem.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self`; backends
/// keep any mutable state behind interior mutability.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsRead`.
pub trait FsRead: Send + Sync {
    /// Stat a path, following symbolic links.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn stat(&self, path: &Path) -> Result<Attributes, FsError>;

    /// Check whether a path exists.
    ///
    /// Returns `Ok(false)` for a missing path. Only unexpected failures are errors.
    fn exists(&self, path: &Path) -> Result<bool, FsError>;

    /// Resolve symbolic links and make the path absolute.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the resolved location does not exist
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FsError>;

    /// Whether the caller may read and modify a path, following symbolic links.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn access(&self, path: &Path) -> Result<Access, FsError>;
}
