//! Student profile fields: department, roll number, year, phone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::UnknownVariant;

/// Academic department a student is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Department {
    /// Computer Science & Engineering
    Bcs,
    /// Electronics & Communication Engineering
    Bec,
    /// Cyber Security
    Bcy,
    /// Computer Science & Design
    Bcd,
    Other,
}

impl Department {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bcs => "BCS",
            Self::Bec => "BEC",
            Self::Bcy => "BCY",
            Self::Bcd => "BCD",
            Self::Other => "OTHER",
        }
    }

    /// Two-letter branch code embedded in roll numbers (`CS` for `BCS`, ...).
    fn branch_code(self) -> Option<&'static str> {
        match self {
            Self::Bcs => Some("CS"),
            Self::Bec => Some("EC"),
            Self::Bcy => Some("CY"),
            Self::Bcd => Some("CD"),
            Self::Other => None,
        }
    }

    /// Whether a roll number may belong to a student of this department.
    /// `Other` accepts any well-formed roll number.
    pub fn accepts(self, roll: &RollNumber) -> bool {
        match self.branch_code() {
            Some(code) => roll.branch() == code,
            None => true,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BCS" => Ok(Self::Bcs),
            "BEC" => Ok(Self::Bec),
            "BCY" => Ok(Self::Bcy),
            "BCD" => Ok(Self::Bcd),
            "OTHER" => Ok(Self::Other),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// Errors from roll number parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollNumberError {
    #[error("roll number must look like 2024BCS0001")]
    Malformed,
    #[error("intake year must be between 2024 and 2099")]
    IntakeYear,
    #[error("unknown branch code {0:?}")]
    Branch(String),
}

/// Institute roll number, e.g. `2024BCS0001`: intake year, `B`, branch code, serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RollNumber(String);

const BRANCHES: [&str; 4] = ["CS", "CY", "CD", "EC"];

impl RollNumber {
    pub fn parse(raw: &str) -> Result<Self, RollNumberError> {
        let s = raw.trim().to_ascii_uppercase();
        let b = s.as_bytes();
        if b.len() != 11 || b[4] != b'B' {
            return Err(RollNumberError::Malformed);
        }
        if !b[..4].iter().all(u8::is_ascii_digit) || !b[7..].iter().all(u8::is_ascii_digit) {
            return Err(RollNumberError::Malformed);
        }
        let year: u16 = s[..4].parse().map_err(|_| RollNumberError::Malformed)?;
        if !(2024..=2099).contains(&year) {
            return Err(RollNumberError::IntakeYear);
        }
        let branch = &s[5..7];
        if !BRANCHES.contains(&branch) {
            return Err(RollNumberError::Branch(branch.to_owned()));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn branch(&self) -> &str {
        &self.0[5..7]
    }
}

impl fmt::Display for RollNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Academic year of study: 1 through 5 (five-year programs).
pub fn is_valid_year(year: u8) -> bool {
    (1..=5).contains(&year)
}

/// Optional leading `+`, then 9 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (9..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}
