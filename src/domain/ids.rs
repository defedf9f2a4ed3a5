//! Domain identifier types with validation
//!
//! Newtype wrappers for the two identities a point of interest carries: the
//! catalog's numeric ID and the surrogate UUID assigned locally.

use crate::domain::errors::InvalidRecordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Catalog-assigned identifier of a point of interest
///
/// A positive integer no larger than 2^53 - 1, the largest integer that
/// survives a round trip through a JSON double. This is the idempotency key.
///
/// # Examples
///
/// ```
/// use poi_sync::domain::ids::ExternalId;
///
/// let id = ExternalId::new(42).unwrap();
/// assert_eq!(id.get(), 42);
/// assert!(ExternalId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ExternalId(u64);

impl ExternalId {
    /// Largest accepted value (2^53 - 1)
    pub const MAX: u64 = 9_007_199_254_740_991;

    /// Creates a new ExternalId, rejecting zero and values above [`Self::MAX`]
    pub fn new(value: u64) -> Result<Self, InvalidRecordError> {
        if value == 0 || value > Self::MAX {
            return Err(InvalidRecordError::IdNotPositiveInteger);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Returns the value as a signed 64-bit integer for storage
    pub fn as_i64(&self) -> i64 {
        // MAX is below i64::MAX
        self.0 as i64
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExternalId {
    type Err = InvalidRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidRecordError::NonNumericId);
        }
        // All digits but too long for u64 is still out of range
        let value = s
            .parse::<u64>()
            .map_err(|_| InvalidRecordError::IdNotPositiveInteger)?;
        Self::new(value)
    }
}

impl TryFrom<u64> for ExternalId {
    type Error = InvalidRecordError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExternalId> for u64 {
    fn from(id: ExternalId) -> Self {
        id.0
    }
}

/// Locally assigned surrogate identifier
///
/// Generated fresh on every transform. The repository keeps the first one it
/// stored for an external ID and ignores later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurrogateId(Uuid);

impl SurrogateId {
    /// Generates a new random (v4) surrogate ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SurrogateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid surrogate ID '{s}': {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_id_bounds() {
        assert!(ExternalId::new(1).is_ok());
        assert!(ExternalId::new(ExternalId::MAX).is_ok());
        assert_eq!(
            ExternalId::new(0),
            Err(InvalidRecordError::IdNotPositiveInteger)
        );
        assert_eq!(
            ExternalId::new(ExternalId::MAX + 1),
            Err(InvalidRecordError::IdNotPositiveInteger)
        );
    }

    #[test]
    fn test_external_id_from_str() {
        assert_eq!(ExternalId::from_str("42").unwrap().get(), 42);
        assert_eq!(ExternalId::from_str(" 7 ").unwrap().get(), 7);
        assert_eq!(
            ExternalId::from_str("abc"),
            Err(InvalidRecordError::NonNumericId)
        );
        assert_eq!(
            ExternalId::from_str("1.5"),
            Err(InvalidRecordError::NonNumericId)
        );
        assert_eq!(
            ExternalId::from_str("-3"),
            Err(InvalidRecordError::NonNumericId)
        );
        assert_eq!(
            ExternalId::from_str(""),
            Err(InvalidRecordError::NonNumericId)
        );
        assert_eq!(
            ExternalId::from_str("0"),
            Err(InvalidRecordError::IdNotPositiveInteger)
        );
        assert_eq!(
            ExternalId::from_str("99999999999999999999999"),
            Err(InvalidRecordError::IdNotPositiveInteger)
        );
    }

    #[test]
    fn test_external_id_serializes_as_number() {
        let id = ExternalId::new(123).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "123");

        let parsed: ExternalId = serde_json::from_str("123").unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<ExternalId>("0").is_err());
    }

    #[test]
    fn test_surrogate_ids_are_unique() {
        let a = SurrogateId::generate();
        let b = SurrogateId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_surrogate_id_roundtrip_display() {
        let id = SurrogateId::generate();
        let parsed = SurrogateId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(SurrogateId::from_str("not-a-uuid").is_err());
    }
}
