//! Tunables for [`FileSystem`](crate::FileSystem).

use std::path::PathBuf;

/// Default size of the buffer used when streaming a reader into a file.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 16 * 1024;

/// Default number of names tried before temp creation gives up.
pub const DEFAULT_TEMP_NAME_ATTEMPTS: u32 = 16;

/// Filesystem configuration.
///
/// ```rust
/// use portable_fs::FsConfig;
///
/// let config = FsConfig {
///     copy_buffer_size: 4096,
///     ..FsConfig::default()
/// };
/// assert!(config.temp_dir.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FsConfig {
    /// Parent directory for temp files and directories when the caller gives none.
    /// Falls back to [`std::env::temp_dir`].
    pub temp_dir: Option<PathBuf>,
    /// Buffer size for `copy_from_reader`.
    pub copy_buffer_size: usize,
    /// How many random names temp creation tries before failing.
    pub temp_name_attempts: u32,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
            temp_name_attempts: DEFAULT_TEMP_NAME_ATTEMPTS,
        }
    }
}

impl FsConfig {
    /// The directory temp entries go into when no parent is given.
    pub fn temp_root(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(feature = "serde")]
impl FsConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`FsError::Deserialization`](crate::FsError::Deserialization) on malformed input
    pub fn from_json_str(json: &str) -> Result<Self, crate::FsError> {
        serde_json::from_str(json).map_err(|e| crate::FsError::Deserialization(e.to_string()))
    }
}
