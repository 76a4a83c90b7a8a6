//! # Attribute Reader
//!
//! Convenience queries over [`FsRead::stat`], blanket-implemented for every
//! backend.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`read_attributes`](AttributeReader::read_attributes) | Full snapshot |
//! | [`size`](AttributeReader::size) | Byte size |
//! | [`last_modified_time`](AttributeReader::last_modified_time) | Modification time |
//! | [`is_directory`](AttributeReader::is_directory) | Directory test, `false` when missing |
//! | [`is_regular_file`](AttributeReader::is_regular_file) | Non-directory test, `false` when missing |
//! | [`not_exists`](AttributeReader::not_exists) | Negated existence |
//! | [`is_readable`](AttributeReader::is_readable) | Read permission, `true` for a parentless path |
//! | [`is_writable`](AttributeReader::is_writable) | Write permission, `false` for a root |
//!
//! Nothing is cached. Every call goes to the backend.

use std::path::Path;

use crate::{Attributes, FileTime, FsError, FsPath, FsRead};

/// Attribute queries available on any [`FsRead`] backend.
///
/// # Example
///
/// ```rust
/// use portable_fs::{AttributeReader, FsError, HostFs};
///
/// fn describe(fs: &HostFs, path: &std::path::Path) -> Result<String, FsError> {
///     if fs.is_directory(path)? {
///         return Ok("directory".to_string());
///     }
///     Ok(format!("{} bytes", fs.size(path)?))
/// }
/// ```
pub trait AttributeReader: FsRead {
    /// Read the attributes of `path`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn read_attributes(&self, path: &Path) -> Result<Attributes, FsError> {
        self.stat(path)
    }

    /// Size in bytes.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn size(&self, path: &Path) -> Result<u64, FsError> {
        Ok(self.stat(path)?.size)
    }

    /// Last modification time.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn last_modified_time(&self, path: &Path) -> Result<FileTime, FsError> {
        Ok(self.stat(path)?.last_modified)
    }

    /// Whether `path` is a directory.
    ///
    /// A root path always is. Returns `Ok(false)` if the path doesn't exist.
    fn is_directory(&self, path: &Path) -> Result<bool, FsError> {
        if FsPath::new(path).is_root() {
            return Ok(true);
        }
        match self.stat(path) {
            Ok(attrs) => Ok(attrs.is_dir()),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether `path` exists and is not a directory.
    ///
    /// Returns `Ok(false)` if the path doesn't exist.
    fn is_regular_file(&self, path: &Path) -> Result<bool, FsError> {
        match self.stat(path) {
            Ok(attrs) => Ok(attrs.is_file()),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Negation of [`FsRead::exists`].
    fn not_exists(&self, path: &Path) -> Result<bool, FsError> {
        Ok(!self.exists(path)?)
    }

    /// Whether `path` can be read.
    ///
    /// A root, or a path with no directory component, always can.
    /// Returns `Ok(false)` if the path doesn't exist.
    fn is_readable(&self, path: &Path) -> Result<bool, FsError> {
        let fs_path = FsPath::new(path);
        if fs_path.is_root() || fs_path.parent().is_none() {
            return Ok(true);
        }
        match self.access(path) {
            Ok(access) => Ok(access.read),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether `path` can be modified.
    ///
    /// A root never can. Returns `Ok(false)` if the path doesn't exist.
    fn is_writable(&self, path: &Path) -> Result<bool, FsError> {
        if FsPath::new(path).is_root() {
            return Ok(false);
        }
        match self.access(path) {
            Ok(access) => Ok(access.write),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<B: FsRead + ?Sized> AttributeReader for B {}
