use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

/// Per-process random component, fixed at first use
static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random);

/// Wrapping 24-bit counter seeded randomly
static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| AtomicU32::new(rand::random::<u32>()));

/// Fixed-length document identifier rendered as 24 lowercase hex characters
///
/// Layout: 4-byte big-endian creation timestamp (seconds), 5 bytes unique to
/// the process, 3-byte counter. Identifiers generated by one process are
/// therefore roughly ordered by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Number of characters in the textual form
    pub const HEX_LEN: usize = 24;

    /// Generate a fresh identifier
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let seconds = chrono::Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes)
    }

    /// Parse the textual form, accepting either hex case
    ///
    /// # Errors
    /// Returns an error if the input is empty, not 24 characters long, or
    /// contains non-hexadecimal characters
    pub fn parse(value: &str) -> Result<Self, ObjectIdError> {
        if value.is_empty() {
            return Err(ObjectIdError::Empty);
        }

        if value.len() != Self::HEX_LEN {
            return Err(ObjectIdError::InvalidLength(value.len()));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| ObjectIdError::InvalidCharacters)?;

        Ok(Self(bytes))
    }

    /// Lowercase hex rendering
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creation time encoded in the identifier
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing an identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectIdError {
    #[error("identifier is empty")]
    Empty,
    #[error("expected 24 characters, got {0}")]
    InvalidLength(usize),
    #[error("identifier must contain only hexadecimal characters")]
    InvalidCharacters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_generated_ids_are_unique_and_well_formed() {
        let a = ObjectId::new();
        let b = ObjectId::new();

        assert_ne!(a, b);
        assert_eq!(a.to_hex().len(), ObjectId::HEX_LEN);
        assert!(a.to_hex().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_id_carries_creation_time() {
        let before = chrono::Utc::now().timestamp() as u32;
        let id = ObjectId::new();
        let after = chrono::Utc::now().timestamp() as u32;

        assert!(id.timestamp() >= before && id.timestamp() <= after);
    }

    #[test]
    fn test_parse_normalizes_case() {
        let id = ObjectId::parse("65A1B2C3D4E5F60718293A4B").unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
        assert_eq!(id, "65a1b2c3d4e5f60718293a4b".parse().unwrap());
    }

    #[rstest]
    #[case("", ObjectIdError::Empty)]
    #[case("abc123", ObjectIdError::InvalidLength(6))]
    #[case("65a1b2c3d4e5f60718293a4b00", ObjectIdError::InvalidLength(26))]
    #[case("65a1b2c3d4e5f60718293a4z", ObjectIdError::InvalidCharacters)]
    #[case("not-an-id-but-24-chars!!", ObjectIdError::InvalidCharacters)]
    fn test_parse_rejects_malformed(#[case] input: &str, #[case] expected: ObjectIdError) {
        assert_eq!(ObjectId::parse(input), Err(expected));
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let id = ObjectId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65a1b2c3d4e5f60718293a4b\"");

        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }
}
