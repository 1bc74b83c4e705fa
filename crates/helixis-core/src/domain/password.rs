use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{HelixisError, Result};

pub const DEFAULT_SPECIAL_CHARS: &str = "!@#$%^&*()-_=+[{]}\\|;:'\",<.>/?";

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Requested shape of a password before the lowercase share is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRequest {
    pub length: usize,
    pub uppercase: usize,
    pub lowercase: Option<usize>,
    pub digits: usize,
    pub special: usize,
    pub special_chars: String,
    pub separator: char,
    pub separator_frequency: usize,
}

/// A validated password policy: the class counts always add up to `length`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    length: usize,
    uppercase: usize,
    lowercase: usize,
    digits: usize,
    special: usize,
    special_chars: Vec<char>,
    separator: char,
    separator_frequency: usize,
}

impl PasswordPolicy {
    pub fn resolve(request: PasswordRequest) -> Result<Self> {
        let mismatch =
            || HelixisError::invalid("Sum of character types does not match the total length.");

        let fixed = request
            .uppercase
            .checked_add(request.digits)
            .and_then(|n| n.checked_add(request.special))
            .ok_or_else(mismatch)?;

        let lowercase = match request.lowercase {
            Some(n) => n,
            None => request.length.checked_sub(fixed).ok_or_else(|| {
                HelixisError::invalid(
                    "Total length is less than the sum of required uppercase, digits, and special characters.",
                )
            })?,
        };

        if fixed.checked_add(lowercase) != Some(request.length) {
            return Err(mismatch());
        }

        let special_chars: Vec<char> = request.special_chars.chars().collect();
        if request.special > 0 && special_chars.is_empty() {
            return Err(HelixisError::invalid(
                "Special characters were requested but the allowed set is empty.",
            ));
        }

        Ok(Self {
            length: request.length,
            uppercase: request.uppercase,
            lowercase,
            digits: request.digits,
            special: request.special,
            special_chars,
            separator: request.separator,
            separator_frequency: request.separator_frequency,
        })
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut chars = Vec::with_capacity(self.length);

        chars.extend(pick(UPPERCASE, self.uppercase, rng));
        chars.extend(pick(DIGITS, self.digits, rng));
        for _ in 0..self.special {
            chars.push(self.special_chars[rng.gen_range(0..self.special_chars.len())]);
        }
        chars.extend(pick(LOWERCASE, self.lowercase, rng));

        chars.shuffle(rng);
        self.with_separators(&chars)
    }

    fn with_separators(&self, chars: &[char]) -> String {
        let mut out = String::with_capacity(chars.len() * 2);
        for (i, c) in chars.iter().enumerate() {
            out.push(*c);
            let written = i + 1;
            if self.separator_frequency > 0
                && written % self.separator_frequency == 0
                && written < chars.len()
            {
                out.push(self.separator);
            }
        }
        out
    }
}

fn pick<'a, R: Rng + ?Sized>(
    alphabet: &'static [u8],
    count: usize,
    rng: &'a mut R,
) -> impl Iterator<Item = char> + 'a {
    (0..count).map(move |_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
}

/// Rejects file names containing characters that are invalid on common filesystems.
pub fn validate_file_name(name: &str) -> Result<()> {
    const INVALID: &str = "/\\:*?\"<>|";

    if let Some(c) = name.chars().find(|c| INVALID.contains(*c)) {
        tracing::warn!(character = %c, "filename contains invalid character");
        return Err(HelixisError::invalid("Invalid filename!"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn request() -> PasswordRequest {
        PasswordRequest {
            length: 18,
            uppercase: 1,
            lowercase: None,
            digits: 1,
            special: 0,
            special_chars: DEFAULT_SPECIAL_CHARS.to_string(),
            separator: '-',
            separator_frequency: 6,
        }
    }

    #[test]
    fn lowercase_is_derived_from_length() {
        let policy = PasswordPolicy::resolve(request()).unwrap();
        assert_eq!(policy.lowercase, 16);
    }

    #[test]
    fn length_shorter_than_required_classes_is_rejected() {
        let err = PasswordPolicy::resolve(PasswordRequest {
            length: 3,
            uppercase: 2,
            digits: 2,
            ..request()
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("Total length is less"));
    }

    #[test]
    fn explicit_counts_must_add_up() {
        let err = PasswordPolicy::resolve(PasswordRequest {
            lowercase: Some(3),
            ..request()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sum of character types does not match the total length."
        );
    }

    #[test]
    fn oversized_class_counts_are_rejected_without_overflow() {
        let err = PasswordPolicy::resolve(PasswordRequest {
            uppercase: usize::MAX,
            digits: 1,
            ..request()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sum of character types does not match the total length."
        );

        let err = PasswordPolicy::resolve(PasswordRequest {
            lowercase: Some(usize::MAX),
            ..request()
        })
        .unwrap_err();
        assert!(matches!(err, HelixisError::InvalidArgument(_)));
    }

    #[test]
    fn empty_special_set_is_rejected_when_special_requested() {
        let err = PasswordPolicy::resolve(PasswordRequest {
            special: 2,
            special_chars: String::new(),
            ..request()
        })
        .unwrap_err();
        assert!(matches!(err, HelixisError::InvalidArgument(_)));
    }

    #[test]
    fn default_password_has_expected_shape() {
        let policy = PasswordPolicy::resolve(request()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let password = policy.generate(&mut rng);
            let groups: Vec<&str> = password.split('-').collect();
            assert_eq!(groups.len(), 3, "{password}");
            assert!(groups.iter().all(|g| g.len() == 6), "{password}");

            let body: String = groups.concat();
            assert_eq!(body.chars().filter(char::is_ascii_uppercase).count(), 1);
            assert_eq!(body.chars().filter(char::is_ascii_digit).count(), 1);
            assert_eq!(body.chars().filter(char::is_ascii_lowercase).count(), 16);
        }
    }

    #[test]
    fn separator_never_trails_or_leads() {
        let policy = PasswordPolicy::resolve(PasswordRequest {
            length: 12,
            separator: '.',
            separator_frequency: 4,
            special: 2,
            ..request()
        })
        .unwrap();
        let password = policy.generate(&mut StdRng::seed_from_u64(1));

        assert_eq!(password.chars().count(), 14);
        assert!(!password.starts_with('.'));
        assert!(!password.ends_with('.'));
        assert_eq!(password.chars().nth(4), Some('.'));
        assert_eq!(password.chars().nth(9), Some('.'));
    }

    #[test]
    fn zero_frequency_disables_separators() {
        let policy = PasswordPolicy::resolve(PasswordRequest {
            separator_frequency: 0,
            ..request()
        })
        .unwrap();
        let password = policy.generate(&mut StdRng::seed_from_u64(3));
        assert_eq!(password.len(), 18);
        assert!(!password.contains('-'));
    }

    #[test]
    fn special_characters_come_from_allowed_set() {
        let policy = PasswordPolicy::resolve(PasswordRequest {
            special: 5,
            special_chars: "#%".to_string(),
            separator_frequency: 0,
            ..request()
        })
        .unwrap();
        let password = policy.generate(&mut StdRng::seed_from_u64(11));
        let specials: Vec<char> = password
            .chars()
            .filter(|c| !c.is_ascii_alphanumeric())
            .collect();
        assert_eq!(specials.len(), 5);
        assert!(specials.iter().all(|c| *c == '#' || *c == '%'));
    }

    #[test]
    fn file_name_validation() {
        assert!(validate_file_name("passwords.txt").is_ok());
        assert!(validate_file_name("bad:name.txt").is_err());
        assert!(validate_file_name("what?.txt").is_err());
    }
}
