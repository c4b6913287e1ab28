//! List code domain model and the shared validation rule.
//!
//! A list code is the opaque string that scopes a shared shopping list. It
//! doubles as the informal invite mechanism: any device that knows a code can
//! read and write the list behind it. Codes come in two origins - codes this
//! application generated itself, and custom codes a user claimed by hand.
//!
//! The validation rule in this module is the single source of truth for what
//! a claimable code looks like. The client validates user input with it and
//! the server keeps it available for defense in depth.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted length for a custom list code.
pub const MIN_CODE_LEN: usize = 3;

/// Length of generated list codes.
///
/// 12 characters over a 36-symbol alphabet gives 36^12 possible codes, which
/// makes accidental collision between independently generated codes
/// negligible.
pub const GENERATED_CODE_LEN: usize = 12;

const GENERATED_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// How a list code came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeOrigin {
    /// Synthesized by the identity resolver; unique with overwhelming
    /// probability.
    Generated,
    /// Chosen by a user; valid in format but intentionally NOT unique -
    /// two devices claiming the same custom code share one list.
    Custom,
}

/// An opaque string identifying a shared list, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCode {
    /// The code itself.
    pub value: String,
    /// Whether the code was generated or claimed.
    pub origin: CodeOrigin,
}

impl ListCode {
    /// Synthesizes a fresh generated code.
    pub fn generated() -> Self {
        Self {
            value: generate_code(),
            origin: CodeOrigin::Generated,
        }
    }

    /// Adopts an already-known generated code (e.g. one loaded from storage).
    pub fn from_generated(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: CodeOrigin::Generated,
        }
    }

    /// Adopts a candidate as a custom code after validating its format.
    ///
    /// # Errors
    ///
    /// Returns a [`CodeError`] describing why the candidate was rejected.
    /// The candidate is not modified or normalized in any way.
    pub fn custom(candidate: impl Into<String>) -> std::result::Result<Self, CodeError> {
        let value = candidate.into();
        validate_code(&value)?;
        Ok(Self {
            value,
            origin: CodeOrigin::Custom,
        })
    }

    /// Whether this code was claimed by a user.
    pub fn is_custom(&self) -> bool {
        self.origin == CodeOrigin::Custom
    }
}

/// Reasons a candidate list code fails format validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("code must not be empty")]
    Empty,

    #[error("code must be at least {min} characters (got {len})")]
    TooShort { min: usize, len: usize },

    #[error("code contains disallowed character '{ch}' (letters, digits and '-' only)")]
    InvalidCharacter { ch: char },
}

/// Validates a candidate list code.
///
/// Pure function, no side effects. A candidate is valid iff it is non-empty,
/// at least [`MIN_CODE_LEN`] characters long, and consists only of ASCII
/// letters, digits and the hyphen.
///
/// # Examples
///
/// ```
/// use trolley_core::code::validate_code;
///
/// assert!(validate_code("test-list").is_ok());
/// assert!(validate_code("ab").is_err());
/// ```
pub fn validate_code(candidate: &str) -> std::result::Result<(), CodeError> {
    if candidate.is_empty() {
        return Err(CodeError::Empty);
    }
    if candidate.chars().count() < MIN_CODE_LEN {
        return Err(CodeError::TooShort {
            min: MIN_CODE_LEN,
            len: candidate.chars().count(),
        });
    }
    if let Some(ch) = candidate
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
    {
        return Err(CodeError::InvalidCharacter { ch });
    }
    Ok(())
}

/// Synthesizes a new generated list code.
///
/// Codes are [`GENERATED_CODE_LEN`] characters drawn uniformly from lowercase
/// letters and digits, so they always pass [`validate_code`].
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_CODE_LEN)
        .map(|_| GENERATED_ALPHABET[rng.gen_range(0..GENERATED_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_alphanumeric_and_hyphen() {
        assert!(validate_code("abc123").is_ok());
        assert!(validate_code("test-list").is_ok());
        assert!(validate_code("ABC").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(validate_code(""), Err(CodeError::Empty));
    }

    #[test]
    fn test_validate_rejects_too_short() {
        assert_eq!(
            validate_code("ab"),
            Err(CodeError::TooShort { min: 3, len: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_disallowed_characters() {
        assert_eq!(
            validate_code("AB@123"),
            Err(CodeError::InvalidCharacter { ch: '@' })
        );
        assert!(validate_code("a b c").is_err());
        assert!(validate_code("list_1").is_err());
    }

    #[test]
    fn test_generated_codes_are_valid_and_distinct() {
        let a = generate_code();
        let b = generate_code();
        assert_eq!(a.len(), GENERATED_CODE_LEN);
        assert!(validate_code(&a).is_ok());
        assert!(validate_code(&b).is_ok());
        // 36^12 space; equality here would indicate a broken generator
        assert_ne!(a, b);
    }

    #[test]
    fn test_custom_constructor_validates() {
        let code = ListCode::custom("my-groceries").unwrap();
        assert!(code.is_custom());
        assert_eq!(code.value, "my-groceries");

        assert!(ListCode::custom("@@").is_err());
    }

    #[test]
    fn test_generated_constructor_tags_origin() {
        let code = ListCode::generated();
        assert_eq!(code.origin, CodeOrigin::Generated);
        assert!(!code.is_custom());
    }
}
