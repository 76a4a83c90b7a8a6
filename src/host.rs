//! Native backend over `std::fs`.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    Access, Attributes, FileTime, FsDir, FsError, FsHandles, FsRead, FsWrite, Handle, OpenFlags,
};

struct OpenFile {
    file: File,
    path: PathBuf,
}

/// The host filesystem.
///
/// Paths are handed to the operating system unchanged, so relative paths are
/// relative to the process working directory. Open handles live in a table
/// behind a mutex; positioned reads and writes seek the shared descriptor
/// while holding it.
pub struct HostFs {
    handles: Mutex<HashMap<u64, OpenFile>>,
    next_handle: AtomicU64,
}

impl HostFs {
    /// Create a backend with an empty handle table.
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.handles.lock().len()
    }

    fn with_file<T>(
        &self,
        handle: Handle,
        f: impl FnOnce(&mut File) -> io::Result<T>,
        operation: &'static str,
    ) -> Result<T, FsError> {
        let mut handles = self.handles.lock();
        let open = handles
            .get_mut(&handle.0)
            .ok_or(FsError::InvalidHandle { handle })?;
        f(&mut open.file).map_err(|e| FsError::from_io(operation, &open.path, e))
    }
}

impl Default for HostFs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HostFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFs")
            .field("open_handles", &self.open_handles())
            .finish()
    }
}

impl FsRead for HostFs {
    fn stat(&self, path: &Path) -> Result<Attributes, FsError> {
        trace!(path = %path.display(), "stat");
        let meta = fs::metadata(path).map_err(|e| FsError::from_io("stat", path, e))?;
        Ok(Attributes {
            size: meta.len(),
            last_modified: meta.modified().map(FileTime::from).unwrap_or_default(),
            is_directory: meta.is_dir(),
        })
    }

    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
            {
                Ok(false)
            }
            Err(e) => Err(FsError::from_io("exists", path, e)),
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FsError> {
        dunce::canonicalize(path).map_err(|e| FsError::from_io("canonicalize", path, e))
    }

    /// Derived from permission bits, not from the caller's effective identity.
    fn access(&self, path: &Path) -> Result<Access, FsError> {
        let permissions = fs::metadata(path)
            .map_err(|e| FsError::from_io("access", path, e))?
            .permissions();
        #[cfg(unix)]
        let read = {
            use std::os::unix::fs::PermissionsExt;
            permissions.mode() & 0o444 != 0
        };
        #[cfg(not(unix))]
        let read = true;
        Ok(Access {
            read,
            write: !permissions.readonly(),
        })
    }
}

impl FsWrite for HostFs {
    fn create_new(&self, path: &Path) -> Result<(), FsError> {
        debug!(path = %path.display(), "create_new");
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(drop)
            .map_err(|e| FsError::from_io("create_new", path, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        debug!(from = %from.display(), to = %to.display(), "rename");
        fs::rename(from, to).map_err(|e| FsError::from_io("rename", from, e))
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        debug!(path = %path.display(), "remove");
        let meta = fs::symlink_metadata(path).map_err(|e| FsError::from_io("remove", path, e))?;
        let removed = if meta.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };
        removed.map_err(|e| FsError::from_io("remove", path, e))
    }
}

impl FsDir for HostFs {
    fn list_entries(&self, path: &Path) -> Result<Vec<OsString>, FsError> {
        trace!(path = %path.display(), "list_entries");
        let read_dir = fs::read_dir(path).map_err(|e| FsError::from_io("list_entries", path, e))?;
        read_dir
            .map(|entry| {
                entry
                    .map(|e| e.file_name())
                    .map_err(|e| FsError::from_io("list_entries", path, e))
            })
            .collect()
    }

    fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        debug!(path = %path.display(), "create_dir");
        fs::create_dir(path).map_err(|e| FsError::from_io("create_dir", path, e))
    }
}

impl FsHandles for HostFs {
    fn open(&self, path: &Path, flags: OpenFlags) -> Result<Handle, FsError> {
        let file = OpenOptions::new()
            .read(flags.read)
            .write(flags.write)
            .create(flags.create)
            .create_new(flags.create_new)
            .truncate(flags.truncate)
            .open(path)
            .map_err(|e| FsError::from_io("open", path, e))?;
        let handle = Handle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        debug!(path = %path.display(), handle = handle.0, "open");
        self.handles.lock().insert(
            handle.0,
            OpenFile {
                file,
                path: path.to_path_buf(),
            },
        );
        Ok(handle)
    }

    fn read_at(&self, handle: Handle, buf: &mut [u8], offset: u64) -> Result<usize, FsError> {
        self.with_file(
            handle,
            |file| {
                file.seek(SeekFrom::Start(offset))?;
                file.read(buf)
            },
            "read_at",
        )
    }

    fn write_at(&self, handle: Handle, data: &[u8], offset: u64) -> Result<usize, FsError> {
        self.with_file(
            handle,
            |file| {
                file.seek(SeekFrom::Start(offset))?;
                file.write(data)
            },
            "write_at",
        )
    }

    fn close(&self, handle: Handle) -> Result<(), FsError> {
        let open = self
            .handles
            .lock()
            .remove(&handle.0)
            .ok_or(FsError::InvalidHandle { handle })?;
        debug!(path = %open.path.display(), handle = handle.0, "close");
        Ok(())
    }
}
