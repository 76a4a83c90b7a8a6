//! # Native Layer Traits
//!
//! The primitives the portable layer consumes from the host.
//!
//! ## Components
//!
//! | Trait | Primitives |
//! |-------|-----------|
//! | [`FsRead`] | `stat`, `exists`, `canonicalize`, `access` |
//! | [`FsWrite`] | `create_new`, `rename`, `remove` |
//! | [`FsDir`] | `list_entries`, `create_dir` |
//! | [`FsHandles`] | `open`, `read_at`, `write_at`, `close` |
//!
//! [`Fs`] is the composite with a blanket implementation: implement the four
//! components and a backend can drive a [`FileSystem`](crate::FileSystem).
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and take `&self`.
//!
//! ## Object Safety
//!
//! All traits are object-safe:
//!
//! ```rust
//! use portable_fs::Fs;
//!
//! fn has_etc(fs: &dyn Fs) -> bool {
//!     fs.exists(std::path::Path::new("/etc")).unwrap_or(false)
//! }
//! ```

mod fs_dir;
mod fs_handles;
mod fs_read;
mod fs_write;

pub use fs_dir::FsDir;
pub use fs_handles::FsHandles;
pub use fs_read::FsRead;
pub use fs_write::FsWrite;

/// Everything the portable layer needs from a native backend.
///
/// Automatically implemented for any type that implements all four component
/// traits. You never implement `Fs` directly.
pub trait Fs: FsRead + FsWrite + FsDir + FsHandles {}

impl<T: FsRead + FsWrite + FsDir + FsHandles> Fs for T {}
