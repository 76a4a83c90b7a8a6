//! # Path Model
//!
//! [`FsPath`] is an immutable hierarchical path value over the host's path
//! syntax.
//!
//! ## Responsibility
//! - Resolution (`resolve`, `resolve_sibling`) without implicit normalization
//! - Lexical normalization of `.` and `..` as a separate, explicit step
//! - Absolute and canonical (symlink-resolved) forms
//! - Segment iteration, parent and leaf derivation
//! - `file:` URI conversion
//! - Equality by canonical identity with a raw-string fallback
//!
//! ## Equality
//!
//! Two paths are equal when their canonical forms are equal. When either side
//! cannot be canonicalized (typically because it does not exist), the raw
//! stored forms are compared instead. Hashing always uses the raw form, so two
//! differently spelled paths to the same existing file compare equal but may
//! hash differently. Normalize before using paths as map keys if that matters.
//!
//! ```rust
//! use portable_fs::FsPath;
//!
//! let base = FsPath::new("/no/such/base");
//! assert_eq!(base.resolve(""), base);
//! assert_eq!(base.resolve("/abs"), FsPath::new("/abs"));
//! assert_eq!(base.resolve("x/../y").normalize(), FsPath::new("/no/such/base/y"));
//! ```

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use tracing::trace;
use url::Url;

use crate::FsError;

/// An immutable hierarchical path.
///
/// Every transformation returns a new value.
#[derive(Clone, Default)]
pub struct FsPath {
    inner: PathBuf,
}

impl FsPath {
    /// Wrap a host path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { inner: path.into() }
    }

    /// Build a path from a first element and further segments, each resolved
    /// in turn against the accumulated path.
    ///
    /// ```rust
    /// use portable_fs::FsPath;
    /// use std::path::Path;
    ///
    /// let p = FsPath::get("foo", ["bar", "baz"]);
    /// assert_eq!(p.as_path(), Path::new("foo").join("bar").join("baz"));
    /// ```
    pub fn get<I, S>(first: impl Into<PathBuf>, more: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        more.into_iter()
            .fold(Self::new(first), |acc, segment| acc.resolve(segment))
    }

    /// Parse a `file:` URI.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidUri`] if the URI is malformed or names no local path
    /// - [`FsError::Unsupported`] for any scheme other than `file`
    pub fn from_uri(uri: &str) -> Result<Self, FsError> {
        let parsed = Url::parse(uri).map_err(|e| FsError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "file" {
            return Err(FsError::unsupported(
                "from_uri",
                format!("scheme {}", parsed.scheme()),
            ));
        }
        parsed
            .to_file_path()
            .map(Self::new)
            .map_err(|()| FsError::InvalidUri {
                uri: uri.to_string(),
                reason: "not a local file path".to_string(),
            })
    }

    /// Absolute `file:` URI for this path. Existing directories get a trailing slash.
    pub fn to_uri(&self) -> Result<Url, FsError> {
        let absolute = self.to_absolute_path()?;
        let converted = if absolute.inner.is_dir() {
            Url::from_directory_path(&absolute.inner)
        } else {
            Url::from_file_path(&absolute.inner)
        };
        converted.map_err(|()| FsError::InvalidUri {
            uri: absolute.to_string(),
            reason: "cannot be expressed as a file uri".to_string(),
        })
    }

    /// Borrow the underlying host path.
    #[inline]
    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    /// Unwrap into the underlying host path.
    #[inline]
    pub fn into_path_buf(self) -> PathBuf {
        self.inner
    }

    /// Returns `true` if the path is rooted.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.inner.is_absolute()
    }

    /// Returns `true` for the empty path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.as_os_str().is_empty()
    }

    /// Returns `true` if the path consists of nothing but a root (and prefix).
    pub fn is_root(&self) -> bool {
        self.inner.has_root()
            && self
                .inner
                .components()
                .all(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
    }

    /// Resolve `other` against this path.
    ///
    /// An empty `other` yields `self` unchanged; an absolute `other` is
    /// returned as is; otherwise the segments are appended. `.` and `..` are
    /// kept verbatim, see [`normalize`](Self::normalize).
    pub fn resolve(&self, other: impl AsRef<Path>) -> FsPath {
        let other = other.as_ref();
        if other.as_os_str().is_empty() {
            return self.clone();
        }
        if other.is_absolute() || other.has_root() {
            return FsPath::new(other);
        }
        FsPath::new(self.inner.join(other))
    }

    /// Resolve `other` against this path's parent, or return `other` when
    /// there is no parent.
    pub fn resolve_sibling(&self, other: impl AsRef<Path>) -> FsPath {
        match self.parent() {
            Some(parent) => parent.resolve(other),
            None => FsPath::new(other.as_ref()),
        }
    }

    /// Lexically drop `.` segments and collapse `name/..` pairs.
    ///
    /// Leading `..` segments of a relative path are kept. `..` directly below
    /// the root is dropped. The filesystem is not consulted.
    pub fn normalize(&self) -> FsPath {
        let mut kept: Vec<Component<'_>> = Vec::new();
        for component in self.inner.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    let last = kept.last().copied();
                    match last {
                        Some(Component::Normal(_)) => {
                            kept.pop();
                        }
                        Some(Component::RootDir) => {}
                        _ => kept.push(component),
                    }
                }
                Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                    kept.push(component)
                }
            }
        }
        FsPath::new(kept.iter().collect::<PathBuf>())
    }

    /// Make the path absolute against the current working directory.
    ///
    /// No normalization and no symlink resolution is performed.
    pub fn to_absolute_path(&self) -> Result<FsPath, FsError> {
        if self.is_absolute() {
            return Ok(self.clone());
        }
        let cwd = std::env::current_dir()
            .map_err(|e| FsError::from_io("to_absolute_path", &self.inner, e))?;
        Ok(FsPath::new(cwd).resolve(&self.inner))
    }

    /// The host's real path for this location.
    ///
    /// With `follow_links` all symbolic links are resolved; without it the
    /// path is only made absolute. Either way the location must exist, and a
    /// link whose target is missing does not count.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the resulting location does not exist
    pub fn to_real_path(&self, follow_links: bool) -> Result<FsPath, FsError> {
        const OP: &str = "to_real_path";
        if follow_links {
            return dunce::canonicalize(&self.inner)
                .map(FsPath::new)
                .map_err(|e| FsError::from_io(OP, &self.inner, e));
        }
        let absolute = self.to_absolute_path()?;
        match std::fs::metadata(&absolute.inner) {
            Ok(_) => Ok(absolute),
            Err(e) => Err(FsError::from_io(OP, &absolute.inner, e)),
        }
    }

    /// The parent path.
    ///
    /// A root-only path (`/`, `C:\`) is its own parent. A path without a
    /// directory component (`foo`, the empty path) has none.
    pub fn parent(&self) -> Option<FsPath> {
        if self.is_root() {
            return Some(self.clone());
        }
        match self.inner.parent() {
            Some(p) if !p.as_os_str().is_empty() => Some(FsPath::new(p)),
            _ => None,
        }
    }

    /// The last segment as a relative path, if there is one.
    pub fn file_name(&self) -> Option<FsPath> {
        self.iter().next_back()
    }

    /// Single-segment relative paths from root-adjacent to leaf.
    ///
    /// The root and any drive prefix are excluded. The sequence is collected
    /// eagerly and can be restarted by calling `iter` again.
    pub fn iter(&self) -> Segments {
        let segments: Vec<FsPath> = self
            .inner
            .components()
            .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
            .map(|c| FsPath::new(c.as_os_str()))
            .collect();
        Segments(segments.into_iter())
    }

    /// Number of segments produced by [`iter`](Self::iter).
    pub fn name_count(&self) -> usize {
        self.iter().len()
    }

    /// Segment-wise prefix test, without touching the filesystem.
    pub fn starts_with(&self, other: &FsPath) -> bool {
        self.inner.starts_with(&other.inner)
    }

    /// Segment-wise suffix test, without touching the filesystem.
    pub fn ends_with(&self, other: &FsPath) -> bool {
        self.inner.ends_with(&other.inner)
    }

    /// Order by raw string form.
    ///
    /// Not an `Ord` implementation because it would disagree with the
    /// canonical equality.
    pub fn compare_lexical(&self, other: &FsPath) -> Ordering {
        self.inner.as_os_str().cmp(other.inner.as_os_str())
    }
}

impl PartialEq for FsPath {
    fn eq(&self, other: &Self) -> bool {
        match (
            dunce::canonicalize(&self.inner),
            dunce::canonicalize(&other.inner),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => {
                trace!(
                    left = %self.inner.display(),
                    right = %other.inner.display(),
                    "canonicalization failed, comparing raw paths"
                );
                self.inner.as_os_str() == other.inner.as_os_str()
            }
        }
    }
}

impl Eq for FsPath {}

impl Hash for FsPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.as_os_str().hash(state);
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.display())
    }
}

impl fmt::Debug for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FsPath").field(&self.inner).finish()
    }
}

impl AsRef<Path> for FsPath {
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

impl AsRef<OsStr> for FsPath {
    fn as_ref(&self) -> &OsStr {
        self.inner.as_os_str()
    }
}

impl From<&str> for FsPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FsPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for FsPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<PathBuf> for FsPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<FsPath> for PathBuf {
    fn from(p: FsPath) -> Self {
        p.inner
    }
}

/// Iterator over the segments of an [`FsPath`].
#[derive(Debug, Clone)]
pub struct Segments(std::vec::IntoIter<FsPath>);

impl Iterator for Segments {
    type Item = FsPath;

    fn next(&mut self) -> Option<FsPath> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for Segments {
    fn next_back(&mut self) -> Option<FsPath> {
        self.0.next_back()
    }
}

impl ExactSizeIterator for Segments {}

impl IntoIterator for &FsPath {
    type Item = FsPath;
    type IntoIter = Segments;

    fn into_iter(self) -> Segments {
        self.iter()
    }
}
