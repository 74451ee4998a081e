//! Registration identifiers.
//!
//! Six characters, ASCII alphanumeric, always stored upper case. Operators
//! type them by hand, so lookups accept any case and surrounding spaces.
//! Fresh IDs use the Crockford base32 alphabet, which leaves out I, L, O
//! and U so a printed ID cannot be misread.

use std::fmt;

use serde::{Deserialize, Serialize};

use regdesk_core::ServiceError;

/// Length of every registration ID.
pub const ID_LEN: usize = 6;

/// Crockford base32 alphabet (32 symbols).
const ID_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Operator-visible registration identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationId(String);

impl RegistrationId {
    /// Normalize and validate operator input.
    pub fn parse(input: &str) -> Result<Self, ServiceError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.len() != ID_LEN || !normalized.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ServiceError::Validation(format!(
                "registration id must be {ID_LEN} letters or digits, got '{}'",
                input.trim()
            )));
        }
        Ok(Self(normalized))
    }

    /// Draw a fresh random ID. Uniqueness is enforced by the store.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        // 256 is a multiple of 32, so `% 32` keeps every symbol equally likely.
        let id = uuid.as_bytes()[..ID_LEN]
            .iter()
            .map(|b| ID_ALPHABET[(*b % 32) as usize] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RegistrationId {
    type Error = ServiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistrationId> for String {
    fn from(id: RegistrationId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let id = RegistrationId::parse("  ab12cd ").unwrap();
        assert_eq!(id.as_str(), "AB12CD");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(RegistrationId::parse("AB12C").is_err());
        assert!(RegistrationId::parse("AB12CDE").is_err());
        assert!(RegistrationId::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_alphanumeric() {
        let err = RegistrationId::parse("AB-2CD").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        // Six bytes but not six ASCII characters.
        assert!(RegistrationId::parse("ÄB12C").is_err());
    }

    #[test]
    fn generated_ids_are_valid() {
        for _ in 0..200 {
            let id = RegistrationId::generate();
            assert_eq!(id.as_str().len(), ID_LEN);
            assert!(id.as_str().bytes().all(|b| ID_ALPHABET.contains(&b)));
            assert_eq!(RegistrationId::parse(id.as_str()).unwrap(), id);
        }
    }

    #[test]
    fn serde_goes_through_validation() {
        let id: RegistrationId = serde_json::from_str("\"xy98zz\"").unwrap();
        assert_eq!(id.as_str(), "XY98ZZ");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"XY98ZZ\"");
        assert!(serde_json::from_str::<RegistrationId>("\"nope\"").is_err());
    }
}
