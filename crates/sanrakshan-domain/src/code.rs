//! Validation codes handed to students when they store items.
//!
//! Codes are 8 characters drawn from [`CODE_ALPHABET`] and displayed as
//! `XXXX-XXXX`. Parsing is lenient about case, whitespace and separators so
//! staff can type what the student reads out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Characters a generated code may contain: `A-Z` without `I`/`O`, digits without `0`.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ123456789";

/// Number of significant characters in a code (separator excluded).
pub const CODE_LEN: usize = 8;

/// Separator inserted between the two halves of a displayed code.
pub const CODE_SEPARATOR: char = '-';

/// Errors returned when normalizing user-supplied code input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("code must contain exactly 8 letters or digits")]
    InvalidLength,
    #[error("code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A validation code in canonical display form (`XXXX-XXXX`, uppercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CodeValue(String);

impl CodeValue {
    /// Build a code from alphabet indices. Indices wrap modulo the alphabet size.
    ///
    /// ```
    /// use sanrakshan_domain::code::CodeValue;
    ///
    /// let code = CodeValue::from_indices([0, 1, 2, 3, 4, 5, 6, 7]);
    /// assert_eq!(code.as_str(), "ABCD-EFGH");
    /// ```
    pub fn from_indices(indices: [usize; CODE_LEN]) -> Self {
        let chars: Vec<char> = indices
            .iter()
            .map(|i| CODE_ALPHABET[i % CODE_ALPHABET.len()] as char)
            .collect();
        Self::from_compact(&chars)
    }

    /// Normalize raw input: drop whitespace and `-`, uppercase, then require
    /// exactly [`CODE_LEN`] ASCII alphanumerics.
    ///
    /// Lookup accepts any alphanumeric, not only [`CODE_ALPHABET`]; a mistyped
    /// confusable character then resolves to "not found" instead of an input error.
    ///
    /// ```
    /// use sanrakshan_domain::code::CodeValue;
    ///
    /// let code = CodeValue::parse(" a7b2-9xy1 ").unwrap();
    /// assert_eq!(code.as_str(), "A7B2-9XY1");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let mut compact = Vec::with_capacity(CODE_LEN);
        for c in raw.chars() {
            if c.is_ascii_whitespace() || c == CODE_SEPARATOR {
                continue;
            }
            if !c.is_ascii_alphanumeric() {
                return Err(CodeError::InvalidCharacter(c));
            }
            compact.push(c.to_ascii_uppercase());
        }
        if compact.len() != CODE_LEN {
            return Err(CodeError::InvalidLength);
        }
        Ok(Self::from_compact(&compact))
    }

    fn from_compact(chars: &[char]) -> Self {
        let (head, tail) = chars.split_at(CODE_LEN / 2);
        let mut s = String::with_capacity(CODE_LEN + 1);
        s.extend(head);
        s.push(CODE_SEPARATOR);
        s.extend(tail);
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if every character comes from [`CODE_ALPHABET`].
    pub fn is_generated_form(&self) -> bool {
        self.0
            .bytes()
            .filter(|b| *b != CODE_SEPARATOR as u8)
            .all(|b| CODE_ALPHABET.contains(&b))
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CodeValue {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CodeValue {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CodeValue> for String {
    fn from(code: CodeValue) -> Self {
        code.0
    }
}
