//! Eagerly materialized, pattern-filtered directory listings.

use tracing::trace;

use crate::{AttributeReader, FsDir, FsError, FsPath, FsRead, Glob};

/// A snapshot of the children of one directory.
///
/// Listing happens entirely when the stream is created, so iterating never
/// fails and [`close`](Self::close) has nothing to release. The snapshot can be
/// iterated any number of times through [`iter`](Self::iter).
///
/// # Example
///
/// ```rust
/// use portable_fs::{FileSystem, FsError, FsPath};
///
/// fn rust_sources(fs: &FileSystem, dir: &FsPath) -> Result<Vec<FsPath>, FsError> {
///     let stream = fs.new_directory_stream(dir, "*.rs")?;
///     Ok(stream.into_iter().collect())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryStream {
    dir: FsPath,
    entries: Vec<FsPath>,
}

impl DirectoryStream {
    /// List `dir` through `fs`, keeping children whose leaf name matches `pattern`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if `dir` does not exist
    /// - [`FsError::NotADirectory`] if `dir` is not a directory
    pub fn open<B>(fs: &B, dir: &FsPath, pattern: &str) -> Result<Self, FsError>
    where
        B: FsRead + FsDir + ?Sized,
    {
        const OP: &str = "new_directory_stream";
        if fs.not_exists(dir.as_path())? {
            return Err(FsError::NotFound {
                path: dir.as_path().to_path_buf(),
                operation: OP,
            });
        }
        if !fs.is_directory(dir.as_path())? {
            return Err(FsError::NotADirectory {
                path: dir.as_path().to_path_buf(),
                operation: OP,
            });
        }

        let glob = Glob::new(pattern)?;
        let entries: Vec<FsPath> = fs
            .list_entries(dir.as_path())?
            .into_iter()
            .filter(|name| glob.is_match(&name.to_string_lossy()))
            .map(|name| dir.resolve(&name))
            .collect();
        trace!(dir = %dir, pattern, count = entries.len(), "listed directory");
        Ok(Self {
            dir: dir.clone(),
            entries,
        })
    }

    /// The listed directory.
    pub fn dir(&self) -> &FsPath {
        &self.dir
    }

    /// Iterate over the captured entries.
    pub fn iter(&self) -> std::slice::Iter<'_, FsPath> {
        self.entries.iter()
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release the stream. The listing is already complete, so this only drops it.
    pub fn close(self) {}
}

impl IntoIterator for DirectoryStream {
    type Item = FsPath;
    type IntoIter = std::vec::IntoIter<FsPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a DirectoryStream {
    type Item = &'a FsPath;
    type IntoIter = std::slice::Iter<'a, FsPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
