use crate::{
    Result,
    constants::{ACCESS_CODE_LENGTH, CODE_LOG_PREFIX_LEN, MIN_LOCKER_NUMBER},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Physical locker number as understood by the controller (1..=N).
///
/// The controller addresses boxes by a small positive index. The command
/// table in `cellkey-protocol` decides which indices actually exist; this
/// type only rules out zero, which no controller revision has ever used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockerNumber(u8);

impl LockerNumber {
    /// Create a new locker number with validation.
    ///
    /// # Errors
    /// Returns `Error::UnknownLocker` if the number is zero.
    pub fn new(number: u8) -> Result<Self> {
        if number < MIN_LOCKER_NUMBER {
            return Err(Error::UnknownLocker(number.to_string()));
        }
        Ok(LockerNumber(number))
    }

    /// Get the raw locker number as u8.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for LockerNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LockerNumber {
    type Err = Error;

    /// Parse a locker number from its decimal string form.
    ///
    /// The original kiosk keyed its tables by the strings `"1"`–`"3"`; the
    /// dashboard still submits lockers as strings, so this is the seam where
    /// they become typed.
    fn from_str(s: &str) -> Result<Self> {
        let number: u8 = s
            .trim()
            .parse()
            .map_err(|_| Error::UnknownLocker(s.to_string()))?;
        LockerNumber::new(number)
    }
}

/// Single-use unlock credential: a fixed-length ASCII digit string.
///
/// # Security
/// This type implements constant-time comparison to prevent timing attacks
/// when comparing presented codes against stored ones, and its `Display`
/// impl prints only a redacted prefix so a code can never leak whole through
/// a log line. Use [`AccessCode::as_str`] where the full value is genuinely
/// needed (database lookups, artifact filenames).
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct AccessCode(String);

impl AccessCode {
    /// Create a new access code with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidCode` if the value is not exactly
    /// [`ACCESS_CODE_LENGTH`] ASCII digits.
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();

        if code.len() != ACCESS_CODE_LENGTH {
            return Err(Error::InvalidCode(format!(
                "code must be {ACCESS_CODE_LENGTH} digits, got {}",
                code.len()
            )));
        }

        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCode(
                "code must contain only ASCII digits".to_string(),
            ));
        }

        Ok(AccessCode(code.to_string()))
    }

    /// Get the full code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading digits safe to include in log output.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.0[..CODE_LOG_PREFIX_LEN]
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}…", self.prefix())
    }
}

impl std::str::FromStr for AccessCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AccessCode::new(s)
    }
}

/// Constant-time comparison implementation for AccessCode
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the strings differ.
impl PartialEq for AccessCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for AccessCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
