//! # portable-fs
//!
//! A portable filesystem layer: value-typed paths, attribute queries, glob
//! filtered directory listings, visitor-driven tree walks and the usual file
//! operations, all on top of a small set of native primitives.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use portable_fs::{FileSystem, FsError, FsPath};
//!
//! fn archive(fs: &FileSystem, src: &FsPath, into: &FsPath) -> Result<(), FsError> {
//!     fs.create_directories(into)?;
//!     for entry in fs.new_directory_stream(src, "*.log")? {
//!         if let Some(name) = entry.file_name() {
//!             fs.copy(&entry, &into.resolve(&name), &[])?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FsPath`] | Immutable location with lexical and canonical operations |
//! | [`FileSystem`] | File operations over a backend and an [`FsConfig`] |
//! | [`AttributeReader`] | Size, time and kind queries on any backend |
//! | [`DirectoryStream`] | Snapshot listing filtered by a [`Glob`] |
//! | [`FileVisitor`] | Callbacks for [`walk_file_tree`] |
//! | [`FsError`] | Error type with path and operation context |
//! | [`HostFs`] | Backend over `std::fs` |
//!
//! ---
//!
//! ## Native Layer
//!
//! ```text
//! FsRead + FsWrite + FsDir + FsHandles = Fs
//! ```
//!
//! [`Fs`] has a blanket implementation. Implement the four components and a
//! backend can drive a [`FileSystem`]; [`AttributeReader`] comes for free with
//! [`FsRead`].
//!
//! ---
//!
//! ## Error Handling
//!
//! All operations return `Result<T, FsError>`:
//!
//! ```rust
//! use portable_fs::FsError;
//! use std::path::PathBuf;
//!
//! let err = FsError::AlreadyExists {
//!     path: PathBuf::from("/out.txt"),
//!     operation: "create_file",
//! };
//! assert_eq!(err.to_string(), "create_file: already exists: /out.txt");
//! ```
//!
//! ---
//!
//! ## Logging
//!
//! Mutating operations emit `tracing` events at `debug`, per-node walk and
//! native calls at `trace`. No subscriber is installed.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`Attributes`], [`FileTime`], [`FsConfig`] and the option enums; [`FsConfig::from_json_str`] |

// Private modules
mod attributes;
mod config;
mod dir_stream;
mod error;
mod files;
mod glob;
mod host;
mod path;
mod traits;
mod types;
mod walk;

// Public re-exports - error types
pub use error::FsError;

// Public re-exports - core types
pub use types::{
    Access, Attributes, CopyOption, FileTime, Handle, OpenFlags, OpenOption, VisitResult,
};

// Public re-exports - native layer
pub use host::HostFs;
pub use traits::{Fs, FsDir, FsHandles, FsRead, FsWrite};

// Public re-exports - portable layer
pub use attributes::AttributeReader;
pub use config::{DEFAULT_COPY_BUFFER_SIZE, DEFAULT_TEMP_NAME_ATTEMPTS, FsConfig};
pub use dir_stream::DirectoryStream;
pub use files::{FileReader, FileSystem, FileWriter};
pub use glob::Glob;
pub use path::{FsPath, Segments};
pub use walk::{FileVisitor, FnVisitor, Visit, WalkOptions, visitor_fn, walk_file_tree};
