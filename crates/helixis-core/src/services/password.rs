use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::Rng;

use crate::domain::PasswordPolicy;
use crate::domain::password::validate_file_name;
use crate::error::{HelixisError, Result};

pub fn generate_passwords<R: Rng + ?Sized>(
    policy: &PasswordPolicy,
    number: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    if number == 0 {
        return Err(HelixisError::invalid("Invalid number of passwords."));
    }
    Ok((0..number).map(|_| policy.generate(rng)).collect())
}

/// Writes one password per line, replacing any existing file.
pub fn write_passwords(path: &Path, passwords: &[String]) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| HelixisError::invalid("Invalid filename!"))?;
    validate_file_name(name)?;

    let mut writer = BufWriter::new(File::create(path)?);
    for password in passwords {
        writeln!(writer, "{password}")?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), count = passwords.len(), "wrote passwords");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordRequest;
    use crate::domain::password::DEFAULT_SPECIAL_CHARS;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::resolve(PasswordRequest {
            length: 12,
            uppercase: 2,
            lowercase: None,
            digits: 2,
            special: 1,
            special_chars: DEFAULT_SPECIAL_CHARS.to_string(),
            separator: '-',
            separator_frequency: 4,
        })
        .unwrap()
    }

    #[test]
    fn generates_requested_number() {
        let mut rng = StdRng::seed_from_u64(7);
        let passwords = generate_passwords(&policy(), 5, &mut rng).unwrap();
        assert_eq!(passwords.len(), 5);
        for password in &passwords {
            assert_eq!(password.chars().filter(|c| *c != '-').count(), 12);
        }
    }

    #[test]
    fn zero_passwords_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = generate_passwords(&policy(), 0, &mut rng).unwrap_err();
        assert_eq!(err.to_string(), "Invalid number of passwords.");
    }

    #[test]
    fn writes_one_password_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passwords.txt");
        let passwords = vec!["abc-def".to_string(), "ghi-jkl".to_string()];

        write_passwords(&path, &passwords).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "abc-def\nghi-jkl\n"
        );
    }

    #[test]
    fn invalid_file_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad?name.txt");
        let err = write_passwords(&path, &["x".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid filename!");
        assert!(!path.exists());
    }
}
