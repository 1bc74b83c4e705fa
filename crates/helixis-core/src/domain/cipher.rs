use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HelixisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherMode {
    Encrypt,
    Decrypt,
}

impl CipherMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

impl FromStr for CipherMode {
    type Err = HelixisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("encrypt") {
            Ok(Self::Encrypt)
        } else if s.eq_ignore_ascii_case("decrypt") {
            Ok(Self::Decrypt)
        } else {
            Err(HelixisError::InvalidMode(s.to_string()))
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atbash substitution: `a <-> z`, `b <-> y`, ... on ASCII letters, case kept.
/// Applying it twice yields the input, so encryption and decryption coincide.
pub fn reverse_alphabet(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'a'..='z' => char::from(b'a' + b'z' - c as u8),
            'A'..='Z' => char::from(b'A' + b'Z' - c as u8),
            other => other,
        })
        .collect()
}
