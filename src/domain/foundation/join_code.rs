//! Join code value object for human-shareable session codes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Number of characters in a join code.
pub const JOIN_CODE_LENGTH: usize = 5;

/// Alphabet the code is drawn from: 36 symbols, uniform.
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short human-shareable code that lets a user join an existing session.
///
/// Always 5 uppercase alphanumeric characters. Uniqueness among
/// non-completed sessions is the session store's responsibility; this type
/// only guarantees shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Parses a join code, validating length and alphabet.
    ///
    /// Lowercase input is accepted and normalized to uppercase.
    pub fn parse(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into().to_ascii_uppercase();
        if code.len() != JOIN_CODE_LENGTH {
            return Err(ValidationError::invalid_format(
                "join_code",
                format!("must be exactly {} characters", JOIN_CODE_LENGTH),
            ));
        }
        if !code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)) {
            return Err(ValidationError::invalid_format(
                "join_code",
                "must contain only A-Z and 0-9",
            ));
        }
        Ok(Self(code))
    }

    /// Draws a random code from the alphabet using the given generator.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code: String = (0..JOIN_CODE_LENGTH)
            .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Draws a random code from the thread-local generator.
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JoinCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
