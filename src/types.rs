//! Core value types shared by the path model, the walker and the file operations.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A point in time with millisecond precision, counted from the Unix epoch.
///
/// Totally ordered; negative values are instants before the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FileTime(i64);

impl FileTime {
    /// Create from milliseconds since the epoch.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the epoch.
    #[inline]
    pub const fn to_millis(&self) -> i64 {
        self.0
    }

    /// Convert back to a [`SystemTime`].
    pub fn to_system_time(&self) -> SystemTime {
        let magnitude = Duration::from_millis(self.0.unsigned_abs());
        if self.0 >= 0 {
            UNIX_EPOCH + magnitude
        } else {
            UNIX_EPOCH - magnitude
        }
    }
}

impl From<SystemTime> for FileTime {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self(i64::try_from(after.as_millis()).unwrap_or(i64::MAX)),
            Err(before) => Self(-i64::try_from(before.duration().as_millis()).unwrap_or(i64::MAX)),
        }
    }
}

impl fmt::Display for FileTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Basic attributes of a filesystem entry.
///
/// A fresh snapshot on every query; stale as soon as it is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: FileTime,
    /// Whether the entry is a directory.
    pub is_directory: bool,
}

impl Attributes {
    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_directory
    }

    /// Returns `true` if this is not a directory.
    #[inline]
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }
}

/// Returned by every [`FileVisitor`](crate::FileVisitor) callback to steer the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisitResult {
    /// Keep going.
    Continue,
    /// Stop the whole walk.
    Terminate,
    /// Do not descend into the directory just pre-visited.
    SkipSubtree,
    /// Skip the remaining entries of the current directory.
    SkipSiblings,
}

/// Options accepted by the copy and move operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CopyOption {
    /// Replace an existing target.
    ReplaceExisting,
    /// Require the move to be a single atomic rename.
    AtomicMove,
    /// Copy attributes along with the content.
    CopyAttributes,
}

impl CopyOption {
    /// Stable name used in error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            CopyOption::ReplaceExisting => "REPLACE_EXISTING",
            CopyOption::AtomicMove => "ATOMIC_MOVE",
            CopyOption::CopyAttributes => "COPY_ATTRIBUTES",
        }
    }
}

impl fmt::Display for CopyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options for opening an output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpenOption {
    /// Write at the end of the file.
    Append,
    /// Create the file if missing.
    Create,
    /// Create the file, failing if it exists.
    CreateNew,
    /// Truncate an existing file.
    TruncateExisting,
}

impl OpenOption {
    /// Stable name used in error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            OpenOption::Append => "APPEND",
            OpenOption::Create => "CREATE",
            OpenOption::CreateNew => "CREATE_NEW",
            OpenOption::TruncateExisting => "TRUNCATE_EXISTING",
        }
    }
}

impl fmt::Display for OpenOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque file handle issued by [`FsHandles::open`](crate::FsHandles::open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u64);

/// Flags for opening a handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing.
    pub write: bool,
    /// Create the file if it doesn't exist.
    pub create: bool,
    /// Fail if the file already exists.
    pub create_new: bool,
    /// Truncate the file to zero length.
    pub truncate: bool,
}

impl OpenFlags {
    /// Read-only access.
    pub const READ: Self = Self {
        read: true,
        write: false,
        create: false,
        create_new: false,
        truncate: false,
    };

    /// Write access with create and truncate.
    pub const WRITE: Self = Self {
        read: false,
        write: true,
        create: true,
        create_new: false,
        truncate: true,
    };

    /// Write access to a file that must not exist yet.
    pub const CREATE_NEW: Self = Self {
        read: false,
        write: true,
        create: false,
        create_new: true,
        truncate: false,
    };
}

/// Permission bits reported by [`FsRead::access`](crate::FsRead::access).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Access {
    /// Contents can be read.
    pub read: bool,
    /// Contents can be modified.
    pub write: bool,
}

impl Access {
    /// Readable and writable.
    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
    };

    /// Readable only.
    pub const READ_ONLY: Self = Self {
        read: true,
        write: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_time_orders_by_millis() {
        assert!(FileTime::from_millis(1) < FileTime::from_millis(2));
        assert_eq!(FileTime::from_millis(5).to_string(), "5");
    }

    #[test]
    fn file_time_from_system_time() {
        let t = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(FileTime::from(t).to_millis(), 1_500);
        assert_eq!(FileTime::from(t).to_system_time(), t);
    }

    #[test]
    fn file_time_before_epoch_is_negative() {
        let t = UNIX_EPOCH - Duration::from_millis(250);
        let ft = FileTime::from(t);
        assert_eq!(ft.to_millis(), -250);
        assert_eq!(ft.to_system_time(), t);
    }

    #[test]
    fn attributes_classification() {
        let dir = Attributes {
            is_directory: true,
            ..Default::default()
        };
        assert!(dir.is_dir());
        assert!(!dir.is_file());
        assert!(Attributes::default().is_file());
    }

    #[test]
    fn option_names() {
        assert_eq!(CopyOption::ReplaceExisting.to_string(), "REPLACE_EXISTING");
        assert_eq!(OpenOption::Append.to_string(), "APPEND");
    }

    #[test]
    fn open_flags_constants() {
        assert!(OpenFlags::READ.read && !OpenFlags::READ.write);
        assert!(OpenFlags::WRITE.create && OpenFlags::WRITE.truncate);
        assert!(OpenFlags::CREATE_NEW.create_new && !OpenFlags::CREATE_NEW.create);
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FileTime>();
        assert_send_sync::<Attributes>();
        assert_send_sync::<VisitResult>();
        assert_send_sync::<Handle>();
        assert_send_sync::<OpenFlags>();
    }
}
