//! Storage keys for contacts.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix shared by every contact key in the store.
pub const CONTACT_KEY_PREFIX: &str = "contact_";

/// Errors that can occur when parsing or minting a [`ContactKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactKeyError {
    /// The key does not start with `contact_`.
    #[error("contact key must start with `{CONTACT_KEY_PREFIX}`: {0}")]
    MissingPrefix(String),
    /// No free timestamp is left after the requested one.
    #[error("no free contact key after timestamp {0}")]
    Exhausted(u64),
}

/// Identity of a stored contact: `contact_<suffix>`.
///
/// Keys minted by the application carry the creation time in milliseconds
/// since the Unix epoch as the suffix. Any other suffix is still a contact
/// key, it just has no timestamp. Keys order by timestamp, with untimed keys
/// first, then by their text.
///
/// ## Examples
///
/// ```
/// use pocketbook_core::ContactKey;
///
/// let key = ContactKey::parse("contact_1700000000000").unwrap();
/// assert_eq!(key.timestamp(), Some(1_700_000_000_000));
/// assert_eq!(key.as_str(), "contact_1700000000000");
///
/// let imported = ContactKey::parse("contact_abc").unwrap();
/// assert_eq!(imported.timestamp(), None);
///
/// assert!(ContactKey::parse("user").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactKey {
    timestamp: Option<u64>,
    raw: String,
}

impl ContactKey {
    /// Build the key for a millisecond timestamp.
    #[must_use]
    pub fn from_timestamp(timestamp: u64) -> Self {
        Self {
            timestamp: Some(timestamp),
            raw: format!("{CONTACT_KEY_PREFIX}{timestamp}"),
        }
    }

    /// Build the key for a point in time.
    ///
    /// Times before the Unix epoch map to timestamp zero.
    #[must_use]
    pub fn at(time: DateTime<Utc>) -> Self {
        Self::from_timestamp(u64::try_from(time.timestamp_millis()).unwrap_or(0))
    }

    /// Mint a fresh key for `now` that `is_taken` does not report as used.
    ///
    /// Bumps the timestamp one millisecond at a time until a free key is found,
    /// so two contacts created in the same millisecond get distinct keys.
    ///
    /// # Errors
    ///
    /// Returns the first error from `is_taken`, or
    /// [`ContactKeyError::Exhausted`] when the timestamp cannot advance.
    pub fn mint<E>(
        now: DateTime<Utc>,
        is_taken: impl FnMut(&Self) -> Result<bool, E>,
    ) -> Result<Self, E>
    where
        E: From<ContactKeyError>,
    {
        Self::mint_from(u64::try_from(now.timestamp_millis()).unwrap_or(0), is_taken)
    }

    fn mint_from<E>(
        mut stamp: u64,
        mut is_taken: impl FnMut(&Self) -> Result<bool, E>,
    ) -> Result<Self, E>
    where
        E: From<ContactKeyError>,
    {
        let mut key = Self::from_timestamp(stamp);
        while is_taken(&key)? {
            stamp = stamp
                .checked_add(1)
                .ok_or(ContactKeyError::Exhausted(stamp))?;
            key = Self::from_timestamp(stamp);
        }
        Ok(key)
    }

    /// Parse a key from its string form.
    ///
    /// Only the `contact_` prefix is required. A suffix of ASCII digits is
    /// read as the creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing.
    pub fn parse(s: &str) -> Result<Self, ContactKeyError> {
        let suffix = s
            .strip_prefix(CONTACT_KEY_PREFIX)
            .ok_or_else(|| ContactKeyError::MissingPrefix(s.to_owned()))?;

        let timestamp = if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            suffix.parse::<u64>().ok()
        } else {
            None
        };

        Ok(Self {
            timestamp,
            raw: s.to_owned(),
        })
    }

    /// Get the creation timestamp in milliseconds, if the key carries one.
    #[must_use]
    pub const fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for ContactKey {
    type Err = ContactKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContactKey {
    type Error = ContactKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContactKey> for String {
    fn from(key: ContactKey) -> Self {
        key.raw
    }
}

impl AsRef<str> for ContactKey {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_valid() {
        let key = ContactKey::parse("contact_1").unwrap();
        assert_eq!(key.timestamp(), Some(1));
        assert_eq!(key.as_str(), "contact_1");
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert!(matches!(
            ContactKey::parse("user"),
            Err(ContactKeyError::MissingPrefix(_))
        ));
        assert!(matches!(
            ContactKey::parse("Contact_1"),
            Err(ContactKeyError::MissingPrefix(_))
        ));
    }

    #[test]
    fn test_parse_untimed_suffix() {
        for input in ["contact_", "contact_abc", "contact_12a", "contact_-5"] {
            let key = ContactKey::parse(input).unwrap();
            assert_eq!(key.timestamp(), None, "{input}");
            assert_eq!(key.as_str(), input);
        }
    }

    #[test]
    fn test_at_uses_milliseconds() {
        let time = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(ContactKey::at(time).as_str(), "contact_1700000000123");
    }

    #[test]
    fn test_mint_skips_taken_keys() {
        let time = Utc.timestamp_millis_opt(1000).unwrap();
        let taken = [ContactKey::from_timestamp(1000), ContactKey::from_timestamp(1001)];

        let key = ContactKey::mint::<ContactKeyError>(time, |k| Ok(taken.contains(k))).unwrap();
        assert_eq!(key.timestamp(), Some(1002));
    }

    #[derive(Debug, PartialEq, Eq)]
    enum LookupError {
        Offline,
        Key(ContactKeyError),
    }

    impl From<ContactKeyError> for LookupError {
        fn from(e: ContactKeyError) -> Self {
            Self::Key(e)
        }
    }

    #[test]
    fn test_mint_returns_lookup_error() {
        let time = Utc.timestamp_millis_opt(1000).unwrap();
        let mut calls = 0;

        let result = ContactKey::mint(time, |_| {
            calls += 1;
            Err(LookupError::Offline)
        });
        assert_eq!(result, Err(LookupError::Offline));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_mint_stops_at_last_timestamp() {
        let result = ContactKey::mint_from(u64::MAX - 1, |_| Ok::<_, LookupError>(true));
        assert_eq!(
            result,
            Err(LookupError::Key(ContactKeyError::Exhausted(u64::MAX)))
        );
    }

    #[test]
    fn test_ordering_follows_timestamp() {
        let mut keys = vec![
            ContactKey::from_timestamp(30),
            ContactKey::from_timestamp(10),
            ContactKey::from_timestamp(20),
        ];
        keys.sort();
        let stamps: Vec<Option<u64>> = keys.iter().map(ContactKey::timestamp).collect();
        assert_eq!(stamps, vec![Some(10), Some(20), Some(30)]);
    }

    #[test]
    fn test_ordering_is_numeric_not_textual() {
        let mut keys = vec![
            ContactKey::parse("contact_1000").unwrap(),
            ContactKey::parse("contact_999").unwrap(),
            ContactKey::parse("contact_abc").unwrap(),
        ];
        keys.sort();
        let raw: Vec<&str> = keys.iter().map(ContactKey::as_str).collect();
        assert_eq!(raw, vec!["contact_abc", "contact_999", "contact_1000"]);
    }

    #[test]
    fn test_serde_as_string() {
        let key = ContactKey::from_timestamp(42);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"contact_42\"");

        let parsed: ContactKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
        assert!(serde_json::from_str::<ContactKey>("\"nope\"").is_err());
        let untimed: ContactKey = serde_json::from_str("\"contact_abc\"").unwrap();
        assert_eq!(untimed.timestamp(), None);
    }
}
