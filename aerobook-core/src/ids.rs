use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Passport numbers are fixed-length alphanumeric codes.
pub const PASSPORT_LEN: usize = 10;

/// Booking references are fixed-length draws from {A-Z, 0-9}.
pub const REFERENCE_LEN: usize = 10;

/// A validated passport number. Construction goes through [`parse`], so a
/// held value is always well-formed.
///
/// [`parse`]: PassportNumber::parse
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassportNumber(String);

impl PassportNumber {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if raw.len() != PASSPORT_LEN {
            return Err(CoreError::Validation(format!(
                "passport number must be exactly {} characters, got {}",
                PASSPORT_LEN,
                raw.len()
            )));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::Validation(
                "passport number must be alphanumeric".to_string(),
            ));
        }
        Ok(Self(raw.to_uppercase()))
    }

    /// Wrap a value from a trusted source (a stored row that already went
    /// through [`parse`] at creation).
    ///
    /// [`parse`]: PassportNumber::parse
    pub fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PassportNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public-facing unique identifier for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingReference(String);

impl BookingReference {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.len() != REFERENCE_LEN {
            return Err(CoreError::Validation(format!(
                "booking reference must be exactly {} characters",
                REFERENCE_LEN
            )));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(CoreError::Validation(
                "booking reference must be drawn from A-Z0-9".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Wrap a value the caller already knows is well-formed (the generator
    /// only emits alphabet characters).
    pub fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
