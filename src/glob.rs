//! Restricted glob patterns for directory listings.
//!
//! `*` matches any run of characters (including none), `?` exactly one
//! character, everything else itself. There are no character classes and no
//! braces. Matching is anchored and applies to a single leaf name.

use regex::Regex;

use crate::FsError;

/// A compiled leaf-name pattern.
///
/// ```rust
/// use portable_fs::Glob;
///
/// let glob = Glob::new("*.t?t").unwrap();
/// assert!(glob.is_match("notes.txt"));
/// assert!(!glob.is_match("notes.tt"));
/// ```
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// - [`FsError::Unsupported`] if the translated expression is rejected
    pub fn new(pattern: &str) -> Result<Self, FsError> {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push_str("(?s)^");
        let mut buf = [0u8; 4];
        for ch in pattern.chars() {
            match ch {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                literal => expr.push_str(&regex::escape(literal.encode_utf8(&mut buf))),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr)
            .map_err(|e| FsError::unsupported("glob", format!("pattern {pattern:?}: {e}")))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Test a leaf name against the pattern.
    pub fn is_match(&self, name: &str) -> bool {
        self.pattern == "*" || self.regex.is_match(name)
    }
}
