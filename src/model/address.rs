//! Postal address of a person.

use serde::{Deserialize, Serialize};

/// A postal code in the `DD-DDD` form, e.g. `01-234`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Parses a `DD-DDD` code. Returns `None` for anything else.
    pub fn parse(code: &str) -> Option<PostalCode> {
        let bytes = code.as_bytes();
        if bytes.len() != 6 || bytes[2] != b'-' {
            return None;
        }
        let digits = bytes[..2].iter().chain(&bytes[3..]);
        if digits.clone().all(u8::is_ascii_digit) {
            Some(PostalCode(code.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PostalCode {
    fn default() -> Self {
        PostalCode("00-000".to_string())
    }
}

impl TryFrom<String> for PostalCode {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        PostalCode::parse(&code).ok_or_else(|| format!("postal code {code:?} does not match DD-DDD"))
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> String {
        code.0
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a person lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub house_no: u32,
    pub apartment_no: u32,
    pub postal_code: PostalCode,
    pub city: String,
}
