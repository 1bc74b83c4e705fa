use std::path::Path;

use serde::Serialize;

use crate::domain::{CipherMode, reverse_alphabet};
use crate::error::{HelixisError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherReport {
    pub mode: CipherMode,
    pub text: String,
}

impl CipherReport {
    pub const fn heading(&self) -> &'static str {
        match self.mode {
            CipherMode::Encrypt => "Encrypted text:",
            CipherMode::Decrypt => "Decrypted text:",
        }
    }
}

/// Applies the reverse-alphabet cipher to a text file. Encryption and
/// decryption are the same transform; the mode only labels the result.
pub fn reverse_alphabet_file(mode: CipherMode, path: &Path) -> Result<CipherReport> {
    if !path.is_file() {
        return Err(HelixisError::FileNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let input = String::from_utf8_lossy(&bytes);
    tracing::debug!(path = %path.display(), %mode, chars = input.len(), "reverse alphabet");
    Ok(CipherReport {
        mode,
        text: reverse_alphabet(&input),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transforms_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "Hello World").unwrap();

        let report = reverse_alphabet_file(CipherMode::Encrypt, &path).unwrap();
        assert_eq!(report.text, "Svool Dliow");
        assert_eq!(report.heading(), "Encrypted text:");

        std::fs::write(&path, &report.text).unwrap();
        let report = reverse_alphabet_file(CipherMode::Decrypt, &path).unwrap();
        assert_eq!(report.text, "Hello World");
        assert_eq!(report.heading(), "Decrypted text:");
    }

    #[test]
    fn non_utf8_input_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"caf\xe9 abc").unwrap();

        let report = reverse_alphabet_file(CipherMode::Encrypt, &path).unwrap();
        assert_eq!(report.text, "xzu\u{fffd} zyx");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = reverse_alphabet_file(CipherMode::Encrypt, &missing).unwrap_err();
        assert_eq!(err.to_string(), format!("File not found: {}", missing.display()));
    }
}
