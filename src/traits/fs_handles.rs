//! Handle-based byte transfer.
//!
//! The workflow is:
//!
//! 1. `open()` - open a file and get a handle
//! 2. `read_at()` / `write_at()` - positioned transfers, each may be partial
//! 3. `close()` - release the handle
//!
//! # Example
//!
//! ```rust
//! use portable_fs::{FsHandles, OpenFlags, FsError};
//! use std::path::Path;
//!
//! fn read_header<B: FsHandles>(backend: &B, path: &Path) -> Result<Vec<u8>, FsError> {
//!     let handle = backend.open(path, OpenFlags::READ)?;
//!     let mut header = [0u8; 16];
//!     let n = backend.read_at(handle, &mut header, 0);
//!     backend.close(handle)?;
//!     Ok(header[..n?].to_vec())
//! }
//! ```

use std::path::Path;

use crate::{FsError, Handle, OpenFlags};

/// Handle-based file I/O.
///
/// Reads and writes may transfer fewer bytes than requested; callers loop.
pub trait FsHandles: Send + Sync {
    /// Open a file and return a handle.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file doesn't exist and neither `create` nor `create_new` is set
    /// - [`FsError::AlreadyExists`] if `create_new` is set and the file exists
    fn open(&self, path: &Path, flags: OpenFlags) -> Result<Handle, FsError>;

    /// Read into `buf` starting at `offset`. Returns 0 at end of file.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidHandle`] if the handle is invalid or closed
    fn read_at(&self, handle: Handle, buf: &mut [u8], offset: u64) -> Result<usize, FsError>;

    /// Write `data` starting at `offset`. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidHandle`] if the handle is invalid or closed
    fn write_at(&self, handle: Handle, data: &[u8], offset: u64) -> Result<usize, FsError>;

    /// Release a handle.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidHandle`] if the handle is already closed or invalid
    fn close(&self, handle: Handle) -> Result<(), FsError>;
}
