//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated Git branch name
//! - [`CommitId`] - Opaque commit identifier
//! - [`BranchColor`] - `#rrggbb` display color
//! - [`UtcTimestamp`] - Commit instant, RFC3339 on the wire
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use gitquest::core::types::{BranchColor, BranchName, CommitId};
//!
//! let branch = BranchName::new("feature/login").unwrap();
//! let id = CommitId::new("c0ffee42").unwrap();
//! let color = BranchColor::new("#2196F3").unwrap();
//!
//! assert_eq!(color.as_str(), "#2196f3");
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(CommitId::new("has space").is_err());
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// A validated Git branch name.
///
/// Branch names follow Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
///
/// Learners get the same feedback a real `git branch` would give them.
///
/// # Example
///
/// ```
/// use gitquest::core::types::BranchName;
///
/// let name = BranchName::new("feature/my-branch").unwrap();
/// assert_eq!(name.as_str(), "feature/my-branch");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// The branch every session starts on.
    pub fn main() -> Self {
        Self("main".to_string())
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let reject = |reason: &str| Err(TypeError::InvalidBranchName(reason.to_string()));

        if name.is_empty() {
            return reject("branch name cannot be empty");
        }
        if name == "@" {
            return reject("branch name cannot be '@' (reserved)");
        }
        if name.starts_with('.') {
            return reject("branch name cannot start with '.'");
        }
        if name.starts_with('-') {
            return reject("branch name cannot start with '-'");
        }
        if name.ends_with(".lock") {
            return reject("branch name cannot end with '.lock'");
        }
        if name.ends_with('/') {
            return reject("branch name cannot end with '/'");
        }

        for forbidden in ["..", "@{", "//"] {
            if name.contains(forbidden) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{forbidden}'"
                )));
            }
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
        }

        if name.chars().any(|c| c.is_ascii_control()) {
            return reject("branch name cannot contain control characters");
        }

        for component in name.split('/').filter(|c| !c.is_empty()) {
            if component.starts_with('.') {
                return reject("path component cannot start with '.'");
            }
            if component.ends_with(".lock") {
                return reject("path component cannot end with '.lock'");
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque commit identifier.
///
/// Fresh ids are UUIDs, but any non-empty token without whitespace is
/// accepted so that saved sessions and hand-written fixtures load.
///
/// # Example
///
/// ```
/// use gitquest::core::types::CommitId;
///
/// let id = CommitId::new("3f2a9c1e-aaaa-bbbb-cccc-000000000000").unwrap();
/// assert_eq!(id.short(7), "3f2a9c1");
/// assert!(CommitId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    /// Create a new validated commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitId` if the id is empty or contains
    /// whitespace or control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidCommitId("commit id cannot be empty".into()));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidCommitId(format!(
                "commit id cannot contain whitespace: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Generate a fresh random id (UUID v4).
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the whole id if it is shorter.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A branch display color in `#rrggbb` form.
///
/// Colors are normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchColor(String);

impl BranchColor {
    /// Create a new validated color.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidColor` unless the value is `#` followed by
    /// exactly six hex digits.
    pub fn new(color: impl Into<String>) -> Result<Self, TypeError> {
        let color = color.into().to_ascii_lowercase();
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(TypeError::InvalidColor(format!(
                "expected '#rrggbb', got {color:?}"
            )));
        }
        Ok(Self(color))
    }

    /// Build a color from a packed 24-bit RGB value.
    pub fn from_rgb(rgb: u32) -> Self {
        Self(format!("#{:06x}", rgb & 0x00ff_ffff))
    }

    /// Get the color as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchColor {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchColor> for String {
    fn from(color: BranchColor) -> Self {
        color.0
    }
}

impl std::fmt::Display for BranchColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC instant.
///
/// Serialized as an RFC3339 string. Deserialization re-parses the text into
/// a typed instant and also accepts integer epoch milliseconds, the form
/// older browser exports used.
///
/// # Example
///
/// ```
/// use gitquest::core::types::UtcTimestamp;
///
/// let ts: UtcTimestamp = serde_json::from_str("\"2024-03-01T12:00:00.250Z\"").unwrap();
/// let millis: UtcTimestamp = serde_json::from_str("1709294400250").unwrap();
/// assert_eq!(ts, millis);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimestamp", into = "String")]
pub struct UtcTimestamp(DateTime<Utc>);

/// Wire forms accepted for a timestamp.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
}

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse an RFC3339 string.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTimestamp` if the text is not RFC3339.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| TypeError::InvalidTimestamp(format!("{text:?}: {e}")))
    }

    /// Build a timestamp from milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTimestamp` if the value is out of range.
    pub fn from_millis(millis: i64) -> Result<Self, TypeError> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(Self)
            .ok_or_else(|| TypeError::InvalidTimestamp(format!("{millis} ms out of range")))
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl TryFrom<RawTimestamp> for UtcTimestamp {
    type Error = TypeError;

    fn try_from(raw: RawTimestamp) -> Result<Self, Self::Error> {
        match raw {
            RawTimestamp::Text(text) => Self::parse(&text),
            RawTimestamp::Millis(millis) => Self::from_millis(millis),
        }
    }
}

impl From<UtcTimestamp> for String {
    fn from(ts: UtcTimestamp) -> Self {
        ts.0.to_rfc3339()
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
