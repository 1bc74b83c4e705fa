use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;

use crate::domain::HashAlgorithm;
use crate::error::{HelixisError, Result};

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestReport {
    pub algorithm: HashAlgorithm,
    pub hex: String,
}

pub fn hash_text(algorithm: HashAlgorithm, text: &str) -> DigestReport {
    DigestReport {
        algorithm,
        hex: algorithm.digest_hex(text.as_bytes()),
    }
}

pub fn hash_file(algorithm: HashAlgorithm, path: &Path) -> Result<DigestReport> {
    if !path.is_file() {
        return Err(HelixisError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = algorithm.hasher();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    tracing::debug!(path = %path.display(), %algorithm, bytes = total, "hashed file");
    Ok(DigestReport {
        algorithm,
        hex: hasher.finalize_hex(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_and_text_digests_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "hello world").unwrap();

        for algorithm in HashAlgorithm::ALL {
            assert_eq!(
                hash_file(algorithm, &path).unwrap(),
                hash_text(algorithm, "hello world")
            );
        }
    }

    #[test]
    fn large_files_are_streamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let data = vec![b'x'; CHUNK_SIZE * 3 + 17];
        std::fs::write(&path, &data).unwrap();

        let report = hash_file(HashAlgorithm::Sha256, &path).unwrap();
        assert_eq!(report.hex, HashAlgorithm::Sha256.digest_hex(&data));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = hash_file(HashAlgorithm::Md5, &dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().starts_with("File not found:"));
    }
}
