//! # File Operations
//!
//! [`FileSystem`] ties a backend to an [`FsConfig`] and layers the portable
//! semantics on top of the native primitives.
//!
//! | Group | Methods |
//! |-------|---------|
//! | Copy and move | [`copy_from_reader`](FileSystem::copy_from_reader), [`copy`](FileSystem::copy), [`move_path`](FileSystem::move_path) |
//! | Create | [`create_file`](FileSystem::create_file), [`create_directory`](FileSystem::create_directory), [`create_directories`](FileSystem::create_directories), [`create_temp_file`](FileSystem::create_temp_file), [`create_temp_directory`](FileSystem::create_temp_directory) |
//! | Delete | [`delete`](FileSystem::delete), [`delete_if_exists`](FileSystem::delete_if_exists) |
//! | Query | [`exists`](FileSystem::exists), [`is_directory`](FileSystem::is_directory), [`size`](FileSystem::size), [`read_attributes`](FileSystem::read_attributes), ... |
//! | Content | [`new_input_stream`](FileSystem::new_input_stream), [`new_output_stream`](FileSystem::new_output_stream), [`read_all_bytes`](FileSystem::read_all_bytes), [`write`](FileSystem::write) |
//! | Traversal | [`new_directory_stream`](FileSystem::new_directory_stream), [`walk_file_tree`](FileSystem::walk_file_tree) |
//!
//! There is no process-wide default instance. Build one with
//! [`FileSystem::host`] or [`FileSystem::new`] and pass it around.

use std::convert::Infallible;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::walk;
use crate::{
    AttributeReader, Attributes, CopyOption, DirectoryStream, FileTime, FileVisitor, Fs, FsConfig,
    FsDir, FsError, FsHandles, FsPath, FsRead, FsWrite, Handle, HostFs, OpenFlags, OpenOption,
    WalkOptions,
};

/// Portable file operations over a backend `B`.
///
/// # Example
///
/// ```rust
/// use portable_fs::{FileSystem, FsError, FsPath};
///
/// fn stash(fs: &FileSystem, data: &[u8]) -> Result<FsPath, FsError> {
///     let file = fs.create_temp_file(None, "stash", None)?;
///     fs.write(&file, data)?;
///     Ok(file)
/// }
/// ```
#[derive(Debug)]
pub struct FileSystem<B: Fs = HostFs> {
    backend: B,
    config: FsConfig,
}

impl FileSystem<HostFs> {
    /// The host filesystem with default configuration.
    pub fn host() -> Self {
        Self::new(HostFs::new(), FsConfig::default())
    }
}

impl Default for FileSystem<HostFs> {
    fn default() -> Self {
        Self::host()
    }
}

impl<B: Fs> FileSystem<B> {
    /// Wrap a backend.
    pub fn new(backend: B, config: FsConfig) -> Self {
        Self { backend, config }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The active configuration.
    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    // ========================================================================
    // Copy and move
    // ========================================================================

    /// Stream `source` into a new file at `target`. Returns the byte count.
    ///
    /// # Errors
    ///
    /// - [`FsError::Unsupported`] if any option is given
    /// - [`FsError::AlreadyExists`] if `target` exists
    pub fn copy_from_reader<R: Read>(
        &self,
        mut source: R,
        target: &FsPath,
        options: &[CopyOption],
    ) -> Result<u64, FsError> {
        const OP: &str = "copy_from_reader";
        reject_options(OP, options)?;
        if self.backend.exists(target.as_path())? {
            return Err(FsError::AlreadyExists {
                path: target.as_path().to_path_buf(),
                operation: OP,
            });
        }

        let out = OpenHandle::open(&self.backend, target.as_path(), OpenFlags::CREATE_NEW)?;
        let mut buf = vec![0u8; self.config.copy_buffer_size.max(1)];
        let mut total = 0u64;
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FsError::from_io(OP, target.as_path(), e)),
            };
            out.write_fully(&buf[..n], total, OP)?;
            total += n as u64;
        }
        out.close()?;
        debug!(target = %target, bytes = total, "copied from reader");
        Ok(total)
    }

    /// Copy a regular file. The target is created or truncated. Returns the byte count.
    ///
    /// # Errors
    ///
    /// - [`FsError::Unsupported`] if `source` is a directory or any option is given
    /// - [`FsError::NotFound`] if `source` does not exist
    pub fn copy(
        &self,
        source: &FsPath,
        target: &FsPath,
        options: &[CopyOption],
    ) -> Result<u64, FsError> {
        const OP: &str = "copy";
        if self.backend.is_directory(source.as_path())? {
            return Err(FsError::unsupported(OP, "directory source"));
        }
        reject_options(OP, options)?;

        let size = self.backend.stat(source.as_path())?.size;
        let input = OpenHandle::open(&self.backend, source.as_path(), OpenFlags::READ)?;
        let output = OpenHandle::open(&self.backend, target.as_path(), OpenFlags::WRITE)?;

        let mut buf = vec![0u8; self.config.copy_buffer_size.max(1)];
        let mut done = 0u64;
        while done < size {
            let want = usize::try_from(size - done).map_or(buf.len(), |r| buf.len().min(r));
            let n = input.read_at(&mut buf[..want], done)?;
            if n == 0 {
                break;
            }
            output.write_fully(&buf[..n], done, OP)?;
            done += n as u64;
        }
        input.close()?;
        output.close()?;
        debug!(source = %source, target = %target, bytes = done, "copied");
        Ok(done)
    }

    /// Rename `source` to `target`.
    ///
    /// With [`CopyOption::ReplaceExisting`] an existing target is deleted
    /// first. [`CopyOption::AtomicMove`] is accepted since the native rename
    /// is atomic.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if `target` exists and replacement was not requested
    /// - [`FsError::Unsupported`] for [`CopyOption::CopyAttributes`]
    pub fn move_path(
        &self,
        source: &FsPath,
        target: &FsPath,
        options: &[CopyOption],
    ) -> Result<FsPath, FsError> {
        const OP: &str = "move_path";
        if let Some(bad) = options
            .iter()
            .find(|o| !matches!(o, CopyOption::ReplaceExisting | CopyOption::AtomicMove))
        {
            return Err(FsError::unsupported(OP, bad.name()));
        }

        if self.backend.exists(target.as_path())? {
            if !options.contains(&CopyOption::ReplaceExisting) {
                return Err(FsError::AlreadyExists {
                    path: target.as_path().to_path_buf(),
                    operation: OP,
                });
            }
            self.delete(target)?;
        }
        self.backend.rename(source.as_path(), target.as_path())?;
        Ok(target.clone())
    }

    // ========================================================================
    // Create
    // ========================================================================

    /// Create a single directory. The parent must exist.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if `path` exists
    /// - [`FsError::NotFound`] if the parent is missing
    pub fn create_directory(&self, path: &FsPath) -> Result<FsPath, FsError> {
        self.backend.create_dir(path.as_path())?;
        Ok(path.clone())
    }

    /// Create a directory and any missing ancestors.
    ///
    /// Succeeds without change if `path` is already a directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if `path` or an ancestor is not a directory
    pub fn create_directories(&self, path: &FsPath) -> Result<FsPath, FsError> {
        const OP: &str = "create_directories";
        if self.backend.exists(path.as_path())? {
            if self.backend.is_directory(path.as_path())? {
                return Ok(path.clone());
            }
            return Err(FsError::AlreadyExists {
                path: path.as_path().to_path_buf(),
                operation: OP,
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.is_empty()) {
            self.create_directories(&parent)?;
        }
        match self.backend.create_dir(path.as_path()) {
            Ok(()) => Ok(path.clone()),
            // Lost a race with another creator.
            Err(FsError::AlreadyExists { .. })
                if matches!(self.backend.is_directory(path.as_path()), Ok(true)) =>
            {
                Ok(path.clone())
            }
            Err(e) => Err(e),
        }
    }

    /// Create an empty regular file.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if `path` exists, including when it
    ///   appears between the check and the native create
    pub fn create_file(&self, path: &FsPath) -> Result<FsPath, FsError> {
        const OP: &str = "create_file";
        let already = || FsError::AlreadyExists {
            path: path.as_path().to_path_buf(),
            operation: OP,
        };
        if self.backend.exists(path.as_path())? {
            return Err(already());
        }
        match self.backend.create_new(path.as_path()) {
            Ok(()) => Ok(path.clone()),
            Err(e) => {
                if self.backend.exists(path.as_path())? {
                    return Err(already());
                }
                Err(e)
            }
        }
    }

    /// Create a new empty file named `prefix` + random + `suffix` inside `dir`.
    ///
    /// `dir` defaults to [`FsConfig::temp_root`], `suffix` to `".tmp"`.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if every attempted name was taken
    pub fn create_temp_file(
        &self,
        dir: Option<&FsPath>,
        prefix: &str,
        suffix: Option<&str>,
    ) -> Result<FsPath, FsError> {
        let suffix = suffix.unwrap_or(".tmp");
        self.create_temp("create_temp_file", dir, prefix, suffix, |p| {
            self.backend.create_new(p)
        })
    }

    /// Create a new empty directory named `prefix` + random inside `dir`.
    ///
    /// `dir` defaults to [`FsConfig::temp_root`].
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if every attempted name was taken
    pub fn create_temp_directory(
        &self,
        dir: Option<&FsPath>,
        prefix: &str,
    ) -> Result<FsPath, FsError> {
        self.create_temp("create_temp_directory", dir, prefix, "", |p| {
            self.backend.create_dir(p)
        })
    }

    fn create_temp(
        &self,
        operation: &'static str,
        dir: Option<&FsPath>,
        prefix: &str,
        suffix: &str,
        create: impl Fn(&Path) -> Result<(), FsError>,
    ) -> Result<FsPath, FsError> {
        let parent = match dir {
            Some(dir) => dir.clone(),
            None => FsPath::new(self.config.temp_root()),
        };
        let mut last = parent.as_path().to_path_buf();
        for _ in 0..self.config.temp_name_attempts.max(1) {
            let candidate = parent.resolve(format!("{prefix}{}{suffix}", rand::random::<u64>()));
            match create(candidate.as_path()) {
                Ok(()) => {
                    debug!(path = %candidate, operation, "created temp entry");
                    return Ok(candidate);
                }
                Err(FsError::AlreadyExists { .. }) => last = candidate.into_path_buf(),
                Err(e) => return Err(e),
            }
        }
        Err(FsError::AlreadyExists {
            path: last,
            operation,
        })
    }

    /// Interface placeholder; symbolic links are not created by this layer.
    ///
    /// # Errors
    ///
    /// Always [`FsError::Unsupported`].
    pub fn create_symbolic_link(&self, _link: &FsPath, _target: &FsPath) -> Result<FsPath, FsError> {
        Err(FsError::unsupported("create_symbolic_link", "symbolic links"))
    }

    /// Interface placeholder; change notification is not provided.
    ///
    /// # Errors
    ///
    /// Always [`FsError::Unsupported`].
    pub fn new_watch_service(&self) -> Result<Infallible, FsError> {
        Err(FsError::unsupported("new_watch_service", "watch service"))
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Remove a file or an empty directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if `path` does not exist
    pub fn delete(&self, path: &FsPath) -> Result<(), FsError> {
        if self.backend.not_exists(path.as_path())? {
            return Err(FsError::NotFound {
                path: path.as_path().to_path_buf(),
                operation: "delete",
            });
        }
        self.backend.remove(path.as_path())
    }

    /// Remove `path` if present. Returns whether anything was removed.
    pub fn delete_if_exists(&self, path: &FsPath) -> Result<bool, FsError> {
        if !self.backend.exists(path.as_path())? {
            return Ok(false);
        }
        match self.backend.remove(path.as_path()) {
            Ok(()) => Ok(true),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Whether `path` exists.
    pub fn exists(&self, path: &FsPath) -> Result<bool, FsError> {
        self.backend.exists(path.as_path())
    }

    /// Whether `path` does not exist.
    pub fn not_exists(&self, path: &FsPath) -> Result<bool, FsError> {
        self.backend.not_exists(path.as_path())
    }

    /// See [`AttributeReader::is_directory`].
    pub fn is_directory(&self, path: &FsPath) -> Result<bool, FsError> {
        self.backend.is_directory(path.as_path())
    }

    /// See [`AttributeReader::is_regular_file`].
    pub fn is_regular_file(&self, path: &FsPath) -> Result<bool, FsError> {
        self.backend.is_regular_file(path.as_path())
    }

    /// See [`AttributeReader::is_readable`].
    pub fn is_readable(&self, path: &FsPath) -> Result<bool, FsError> {
        self.backend.is_readable(path.as_path())
    }

    /// See [`AttributeReader::is_writable`].
    pub fn is_writable(&self, path: &FsPath) -> Result<bool, FsError> {
        self.backend.is_writable(path.as_path())
    }

    /// Size of `path` in bytes.
    pub fn size(&self, path: &FsPath) -> Result<u64, FsError> {
        self.backend.size(path.as_path())
    }

    /// Modification time of `path`.
    pub fn last_modified_time(&self, path: &FsPath) -> Result<FileTime, FsError> {
        self.backend.last_modified_time(path.as_path())
    }

    /// Attribute snapshot of `path`.
    pub fn read_attributes(&self, path: &FsPath) -> Result<Attributes, FsError> {
        self.backend.read_attributes(path.as_path())
    }

    /// Absolute form of `path`, with links resolved when `follow_links` is set.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the location does not exist
    pub fn to_real_path(&self, path: &FsPath, follow_links: bool) -> Result<FsPath, FsError> {
        let absolute = path.to_absolute_path()?;
        if follow_links {
            return self.backend.canonicalize(absolute.as_path()).map(FsPath::new);
        }
        if self.backend.exists(absolute.as_path())? {
            Ok(absolute)
        } else {
            Err(FsError::NotFound {
                path: absolute.into_path_buf(),
                operation: "to_real_path",
            })
        }
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Open `path` for sequential reading.
    pub fn new_input_stream(&self, path: &FsPath) -> Result<FileReader<'_, B>, FsError> {
        let handle = OpenHandle::open(&self.backend, path.as_path(), OpenFlags::READ)?;
        Ok(FileReader { handle, offset: 0 })
    }

    /// Open `path` for sequential writing, creating or truncating it.
    ///
    /// # Errors
    ///
    /// - [`FsError::Unsupported`] if any option is given
    pub fn new_output_stream(
        &self,
        path: &FsPath,
        options: &[OpenOption],
    ) -> Result<FileWriter<'_, B>, FsError> {
        if let Some(option) = options.first() {
            return Err(FsError::unsupported("new_output_stream", option.name()));
        }
        let handle = OpenHandle::open(&self.backend, path.as_path(), OpenFlags::WRITE)?;
        Ok(FileWriter { handle, offset: 0 })
    }

    /// Read the whole file.
    pub fn read_all_bytes(&self, path: &FsPath) -> Result<Vec<u8>, FsError> {
        let mut reader = self.new_input_stream(path)?;
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| FsError::from_io("read_all_bytes", path.as_path(), e))?;
        reader.close()?;
        Ok(data)
    }

    /// Read the whole file as UTF-8.
    pub fn read_to_string(&self, path: &FsPath) -> Result<String, FsError> {
        let bytes = self.read_all_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| {
            FsError::from_io(
                "read_to_string",
                path.as_path(),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Replace the contents of `path` with `data`, creating it if needed.
    pub fn write(&self, path: &FsPath, data: &[u8]) -> Result<(), FsError> {
        let writer = self.new_output_stream(path, &[])?;
        writer.handle.write_fully(data, 0, "write")?;
        writer.close()
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// List `dir`, keeping entries whose leaf name matches `pattern`.
    ///
    /// See [`DirectoryStream::open`].
    pub fn new_directory_stream(&self, dir: &FsPath, pattern: &str) -> Result<DirectoryStream, FsError> {
        DirectoryStream::open(&self.backend, dir, pattern)
    }

    /// List `dir` and hand the stream to `f`. The stream is released when `f` returns.
    pub fn with_directory_stream<T>(
        &self,
        dir: &FsPath,
        pattern: &str,
        f: impl FnOnce(&DirectoryStream) -> Result<T, FsError>,
    ) -> Result<T, FsError> {
        let stream = self.new_directory_stream(dir, pattern)?;
        f(&stream)
    }

    /// Walk the tree at `start` without a depth limit. See [`walk_file_tree`](crate::walk_file_tree).
    pub fn walk_file_tree<V>(&self, start: &FsPath, visitor: &mut V) -> Result<FsPath, FsError>
    where
        V: FileVisitor + ?Sized,
    {
        walk::walk_file_tree(&self.backend, start, WalkOptions::default(), visitor)
    }

    /// Walk the tree at `start` with explicit options.
    pub fn walk_file_tree_with<V>(
        &self,
        start: &FsPath,
        options: WalkOptions,
        visitor: &mut V,
    ) -> Result<FsPath, FsError>
    where
        V: FileVisitor + ?Sized,
    {
        walk::walk_file_tree(&self.backend, start, options, visitor)
    }
}

fn reject_options(operation: &'static str, options: &[CopyOption]) -> Result<(), FsError> {
    match options.first() {
        Some(option) => Err(FsError::unsupported(operation, option.name())),
        None => Ok(()),
    }
}

/// A backend handle that is closed when dropped.
struct OpenHandle<'a, B: FsHandles + ?Sized> {
    backend: &'a B,
    handle: Handle,
    path: PathBuf,
    closed: bool,
}

impl<'a, B: FsHandles + ?Sized> OpenHandle<'a, B> {
    fn open(backend: &'a B, path: &Path, flags: OpenFlags) -> Result<Self, FsError> {
        let handle = backend.open(path, flags)?;
        Ok(Self {
            backend,
            handle,
            path: path.to_path_buf(),
            closed: false,
        })
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, FsError> {
        self.backend.read_at(self.handle, buf, offset)
    }

    /// Write all of `data`, retrying short writes.
    fn write_fully(&self, data: &[u8], offset: u64, operation: &'static str) -> Result<(), FsError> {
        let mut written = 0;
        while written < data.len() {
            let n = self
                .backend
                .write_at(self.handle, &data[written..], offset + written as u64)?;
            if n == 0 {
                return Err(FsError::from_io(
                    operation,
                    &self.path,
                    io::Error::from(io::ErrorKind::WriteZero),
                ));
            }
            written += n;
        }
        Ok(())
    }

    fn close(mut self) -> Result<(), FsError> {
        self.closed = true;
        self.backend.close(self.handle)
    }
}

impl<B: FsHandles + ?Sized> Drop for OpenHandle<'_, B> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.backend.close(self.handle) {
            debug!(path = %self.path.display(), error = %e, "close on drop failed");
        }
    }
}

fn to_io(error: FsError) -> io::Error {
    match error {
        FsError::Io { source, .. } => source,
        FsError::NotFound { .. } => io::Error::new(io::ErrorKind::NotFound, error),
        FsError::AlreadyExists { .. } => io::Error::new(io::ErrorKind::AlreadyExists, error),
        other => io::Error::other(other),
    }
}

/// Sequential reader over a backend handle. Closes the handle on drop.
pub struct FileReader<'a, B: FsHandles + ?Sized> {
    handle: OpenHandle<'a, B>,
    offset: u64,
}

impl<B: FsHandles + ?Sized> FileReader<'_, B> {
    /// Close now and observe the result instead of closing on drop.
    pub fn close(self) -> Result<(), FsError> {
        self.handle.close()
    }
}

impl<B: FsHandles + ?Sized> Read for FileReader<'_, B> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.handle.read_at(buf, self.offset).map_err(to_io)?;
        self.offset += n as u64;
        Ok(n)
    }
}

/// Sequential writer over a backend handle. Closes the handle on drop.
pub struct FileWriter<'a, B: FsHandles + ?Sized> {
    handle: OpenHandle<'a, B>,
    offset: u64,
}

impl<B: FsHandles + ?Sized> FileWriter<'_, B> {
    /// Close now and observe the result instead of closing on drop.
    pub fn close(self) -> Result<(), FsError> {
        self.handle.close()
    }
}

impl<B: FsHandles + ?Sized> Write for FileWriter<'_, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self
            .handle
            .backend
            .write_at(self.handle.handle, buf, self.offset)
            .map_err(to_io)?;
        self.offset += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
