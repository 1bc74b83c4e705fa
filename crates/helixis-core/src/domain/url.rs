//! HTML form (`application/x-www-form-urlencoded`) encoding.
//!
//! Unreserved characters are `A-Z a-z 0-9 . - * _`; a space becomes `+`; every
//! other byte of the charset encoding becomes an upper-case `%XX` escape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HelixisError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "ISO-8859-1")]
    Latin1,
    #[serde(rename = "US-ASCII")]
    Ascii,
}

impl Charset {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Unmappable characters become `?`.
    fn encode(self, input: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => input.as_bytes().to_vec(),
            Self::Latin1 => input
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            Self::Ascii => input
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }

    fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().copied().map(char::from).collect(),
            Self::Ascii => bytes
                .iter()
                .map(|b| {
                    if b.is_ascii() {
                        char::from(*b)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
        }
    }
}

impl FromStr for Charset {
    type Err = HelixisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "utf8" => Ok(Self::Utf8),
            "iso88591" | "latin1" => Ok(Self::Latin1),
            "usascii" | "ascii" => Ok(Self::Ascii),
            _ => Err(HelixisError::UnknownCharset(s.to_string())),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn form_encode(input: &str, charset: Charset) -> String {
    let bytes = charset.encode(input);
    // urlencoding treats `~` as unreserved and escapes `*`; forms do the opposite
    urlencoding::encode_binary(&bytes)
        .replace("%20", "+")
        .replace("%2A", "*")
        .replace('~', "%7E")
}

pub fn form_decode(input: &str, charset: Charset) -> Result<String> {
    validate_escapes(input)?;
    let spaced = input.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    Ok(charset.decode(&bytes))
}

fn validate_escapes(input: &str) -> Result<()> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3).ok_or_else(|| {
                HelixisError::invalid("Incomplete trailing escape (%) pattern")
            })?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return Err(HelixisError::invalid(format!(
                    "Illegal hex characters in escape (%) pattern at index {i}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_like_an_html_form() {
        assert_eq!(form_encode("hello world", Charset::Utf8), "hello+world");
        assert_eq!(form_encode("a*b-c_d.e~f", Charset::Utf8), "a*b-c_d.e%7Ef");
        assert_eq!(form_encode("q=1&r=2/3", Charset::Utf8), "q%3D1%26r%3D2%2F3");
        assert_eq!(form_encode("100%", Charset::Utf8), "100%25");
    }

    #[test]
    fn multibyte_characters_follow_the_charset() {
        assert_eq!(form_encode("é", Charset::Utf8), "%C3%A9");
        assert_eq!(form_encode("é", Charset::Latin1), "%E9");
        assert_eq!(form_encode("é", Charset::Ascii), "%3F");
        assert_eq!(form_encode("€", Charset::Latin1), "%3F");
    }

    #[test]
    fn decodes_plus_and_escapes() {
        assert_eq!(
            form_decode("hello+world%21", Charset::Utf8).unwrap(),
            "hello world!"
        );
        assert_eq!(form_decode("a%2Bb", Charset::Utf8).unwrap(), "a+b");
        assert_eq!(form_decode("%E9", Charset::Latin1).unwrap(), "é");
        assert_eq!(form_decode("%C3%A9", Charset::Utf8).unwrap(), "é");
    }

    #[test]
    fn malformed_escapes_are_errors() {
        assert!(form_decode("abc%2", Charset::Utf8).is_err());
        assert!(form_decode("abc%zz", Charset::Utf8).is_err());
        assert!(form_decode("%", Charset::Utf8).is_err());
    }

    #[test]
    fn encode_then_decode_restores_text() {
        let text = "name=Zoë & co / 50% * 2~";
        let encoded = form_encode(text, Charset::Utf8);
        assert_eq!(form_decode(&encoded, Charset::Utf8).unwrap(), text);
    }

    #[test]
    fn charset_names_are_flexible() {
        assert_eq!("utf-8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert_eq!("ISO-8859-1".parse::<Charset>().unwrap(), Charset::Latin1);
        assert_eq!("us_ascii".parse::<Charset>().unwrap(), Charset::Ascii);
        assert!("EBCDIC".parse::<Charset>().is_err());
    }
}
