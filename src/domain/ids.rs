//! Domain identifier types with validation
//!
//! Newtype wrappers for the names and handles exchanged with the search
//! backend. Each type validates its input on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index name newtype wrapper
///
/// Follows the backend's naming rules closely enough to reject values that
/// would change the request path (slashes, whitespace, leading `_`).
///
/// # Examples
///
/// ```
/// use elastictl::domain::ids::IndexName;
/// use std::str::FromStr;
///
/// let index = IndexName::from_str("products-2024").unwrap();
/// assert_eq!(index.as_str(), "products-2024");
/// assert!(IndexName::from_str("_all").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexName(String);

impl IndexName {
    /// Creates a new IndexName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(IndexName)` if the name is valid, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Index name cannot be empty".to_string());
        }

        if name.starts_with(['_', '-', '+']) {
            return Err(format!(
                "Index name cannot start with '_', '-' or '+', got: {name}"
            ));
        }

        if name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#' | '"' | ',' | ':'))
        {
            return Err(format!("Index name contains an invalid character: {name}"));
        }

        Ok(Self(name))
    }

    /// Returns the index name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IndexName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Point-in-time identifier issued by the backend
///
/// Opaque to elastictl. Only ever echoed back in search and release requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitId(String);

impl PitId {
    /// Creates a new PitId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("Point-in-time id cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot keep-alive duration in the backend's time-unit syntax
///
/// # Examples
///
/// ```
/// use elastictl::domain::ids::KeepAlive;
///
/// let keep_alive = KeepAlive::parse("1m").unwrap();
/// assert_eq!(keep_alive.as_str(), "1m");
/// assert!(KeepAlive::parse("1 minute").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeepAlive(String);

impl KeepAlive {
    const UNITS: [&'static str; 7] = ["d", "h", "m", "s", "ms", "micros", "nanos"];

    /// Parses a duration such as `30s`, `1m` or `2h`
    pub fn parse(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let split = value
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value.len());
        let (amount, unit) = value.split_at(split);

        if amount.is_empty() || !Self::UNITS.contains(&unit) {
            return Err(format!(
                "Invalid keep-alive '{}'. Expected <number><unit> with unit one of: {}",
                value,
                Self::UNITS.join(", ")
            ));
        }

        if amount.parse::<u64>().map_or(true, |n| n == 0) {
            return Err(format!("Keep-alive must be greater than zero, got '{value}'"));
        }

        Ok(Self(value))
    }

    /// Returns the keep-alive as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KeepAlive {
    fn default() -> Self {
        Self("1m".to_string())
    }
}

impl fmt::Display for KeepAlive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for KeepAlive {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<KeepAlive> for String {
    fn from(value: KeepAlive) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_valid() {
        let index = IndexName::new("logs-2024.01.01").unwrap();
        assert_eq!(index.as_str(), "logs-2024.01.01");
        assert_eq!(index.to_string(), "logs-2024.01.01");
    }

    #[test]
    fn test_index_name_rejects_empty() {
        assert!(IndexName::new("").is_err());
        assert!(IndexName::new("   ").is_err());
    }

    #[test]
    fn test_index_name_rejects_path_characters() {
        assert!(IndexName::new("a/b").is_err());
        assert!(IndexName::new("a b").is_err());
        assert!(IndexName::new("a,b").is_err());
        assert!(IndexName::new("remote:logs").is_err());
        assert!(IndexName::new("_search").is_err());
        assert!(IndexName::new("-x").is_err());
    }

    #[test]
    fn test_pit_id_rejects_empty() {
        assert!(PitId::new("").is_err());
        assert_eq!(PitId::new("46ToAwMDaWR5").unwrap().as_str(), "46ToAwMDaWR5");
    }

    #[test]
    fn test_keep_alive_units() {
        for value in ["1d", "2h", "1m", "30s", "500ms", "10micros", "99nanos"] {
            assert!(KeepAlive::parse(value).is_ok(), "{value} should parse");
        }
    }

    #[test]
    fn test_keep_alive_invalid() {
        assert!(KeepAlive::parse("").is_err());
        assert!(KeepAlive::parse("m").is_err());
        assert!(KeepAlive::parse("10").is_err());
        assert!(KeepAlive::parse("10y").is_err());
        assert!(KeepAlive::parse("0m").is_err());
        assert!(KeepAlive::parse("-1m").is_err());
    }

    #[test]
    fn test_keep_alive_default() {
        assert_eq!(KeepAlive::default().as_str(), "1m");
    }

    #[test]
    fn test_keep_alive_deserialize_validates() {
        let ok: KeepAlive = serde_json::from_str("\"5m\"").unwrap();
        assert_eq!(ok.as_str(), "5m");
        assert!(serde_json::from_str::<KeepAlive>("\"five\"").is_err());
    }
}
