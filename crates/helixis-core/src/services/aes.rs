//! AES-128-CBC with PKCS#7 padding.
//!
//! Strings are emitted as `base64(iv || ciphertext)`; files are written as the
//! raw 16-byte IV followed by the ciphertext and processed as a stream.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use aes::Aes128;
use aes::Block;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{HelixisError, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

pub const KEY_SIZE: usize = 16;
pub const IV_SIZE: usize = 16;
const BLOCK_SIZE: usize = 16;
const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Clone)]
pub struct AesCipher {
    key: [u8; KEY_SIZE],
}

impl std::fmt::Debug for AesCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesCipher").finish_non_exhaustive()
    }
}

impl AesCipher {
    /// The key is the password's UTF-8 bytes, truncated or zero-padded to 16 bytes.
    // TODO: derive the key with PBKDF2 and store the salt ahead of the IV
    pub fn from_password(password: &str) -> Self {
        let mut key = [0u8; KEY_SIZE];
        let bytes = password.as_bytes();
        let n = bytes.len().min(KEY_SIZE);
        key[..n].copy_from_slice(&bytes[..n]);
        Self { key }
    }

    pub const fn from_key(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    pub fn encrypt_str(&self, plaintext: &str) -> String {
        self.encrypt_str_with_iv(plaintext, random_iv())
    }

    fn encrypt_str_with_iv(&self, plaintext: &str, iv: [u8; IV_SIZE]) -> String {
        let ciphertext = Aes128CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut combined = Vec::with_capacity(IV_SIZE + ciphertext.len());
        combined.extend_from_slice(&iv);
        combined.extend_from_slice(&ciphertext);
        STANDARD.encode(combined)
    }

    pub fn decrypt_str(&self, encoded: &str) -> Result<String> {
        let combined = STANDARD
            .decode(encoded.trim())
            .map_err(|e| HelixisError::Decrypt(format!("input is not valid base64: {e}")))?;

        if combined.len() < IV_SIZE {
            return Err(HelixisError::Decrypt(
                "input is shorter than the initialization vector".to_string(),
            ));
        }

        let (iv, ciphertext) = combined.split_at(IV_SIZE);
        let plaintext = Aes128CbcDec::new_from_slices(&self.key, iv)
            .map_err(|e| HelixisError::Decrypt(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| bad_padding())?;

        String::from_utf8(plaintext)
            .map_err(|_| HelixisError::Decrypt("decrypted bytes are not valid UTF-8".to_string()))
    }

    pub fn encrypt_file(&self, input: &Path, output: &Path) -> Result<u64> {
        let (reader, writer) = open_pair(input, output)?;
        let result = self.encrypt_stream(reader, writer, random_iv());
        discard_on_error(result, output)
    }

    pub fn decrypt_file(&self, input: &Path, output: &Path) -> Result<u64> {
        let (reader, writer) = open_pair(input, output)?;
        let result = self.decrypt_stream(reader, writer);
        discard_on_error(result, output)
    }

    /// Returns the number of bytes written, IV included.
    pub fn encrypt_stream<R: Read, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
        iv: [u8; IV_SIZE],
    ) -> Result<u64> {
        let mut encryptor = Aes128CbcEnc::new(&self.key.into(), &iv.into());
        writer.write_all(&iv)?;
        let mut written = IV_SIZE as u64;

        let mut pending = Vec::with_capacity(CHUNK_SIZE + BLOCK_SIZE);
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = read_some(&mut reader, &mut buf)?;
            if n == 0 {
                break;
            }
            pending.extend_from_slice(&buf[..n]);

            let ready = pending.len() - pending.len() % BLOCK_SIZE;
            for block in pending[..ready].chunks_exact_mut(BLOCK_SIZE) {
                encryptor.encrypt_block_mut(Block::from_mut_slice(block));
            }
            writer.write_all(&pending[..ready])?;
            written += ready as u64;
            pending.drain(..ready);
        }

        // PKCS#7 always adds between 1 and 16 bytes
        #[allow(clippy::cast_possible_truncation)]
        let pad = (BLOCK_SIZE - pending.len()) as u8;
        pending.resize(BLOCK_SIZE, pad);
        encryptor.encrypt_block_mut(Block::from_mut_slice(&mut pending));
        writer.write_all(&pending)?;
        writer.flush()?;

        Ok(written + BLOCK_SIZE as u64)
    }

    /// Returns the number of plaintext bytes written.
    pub fn decrypt_stream<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> Result<u64> {
        let mut iv = [0u8; IV_SIZE];
        reader.read_exact(&mut iv).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                HelixisError::Decrypt("could not read IV from encrypted input".to_string())
            } else {
                e.into()
            }
        })?;

        let mut decryptor = Aes128CbcDec::new(&self.key.into(), &iv.into());
        let mut written = 0u64;

        let mut pending = Vec::with_capacity(CHUNK_SIZE + BLOCK_SIZE);
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = read_some(&mut reader, &mut buf)?;
            if n == 0 {
                break;
            }
            pending.extend_from_slice(&buf[..n]);

            // the last full block carries the padding; hold it back until EOF
            let ready = pending.len().saturating_sub(1) / BLOCK_SIZE * BLOCK_SIZE;
            for block in pending[..ready].chunks_exact_mut(BLOCK_SIZE) {
                decryptor.decrypt_block_mut(Block::from_mut_slice(block));
            }
            writer.write_all(&pending[..ready])?;
            written += ready as u64;
            pending.drain(..ready);
        }

        if pending.len() != BLOCK_SIZE {
            return Err(HelixisError::Decrypt(
                "ciphertext length is not a multiple of the block size".to_string(),
            ));
        }

        decryptor.decrypt_block_mut(Block::from_mut_slice(&mut pending));
        let pad = usize::from(pending[BLOCK_SIZE - 1]);
        let valid = (1..=BLOCK_SIZE).contains(&pad)
            && pending[BLOCK_SIZE - pad..]
                .iter()
                .all(|b| usize::from(*b) == pad);
        if !valid {
            return Err(bad_padding());
        }

        let tail = &pending[..BLOCK_SIZE - pad];
        writer.write_all(tail)?;
        writer.flush()?;

        Ok(written + tail.len() as u64)
    }
}

fn random_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

fn bad_padding() -> HelixisError {
    HelixisError::Decrypt("invalid padding (wrong password or corrupted input)".to_string())
}

fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}

fn open_pair(input: &Path, output: &Path) -> Result<(BufReader<File>, BufWriter<File>)> {
    if !input.exists() {
        return Err(HelixisError::FileNotFound(input.to_path_buf()));
    }
    if output.exists() && std::fs::canonicalize(input)? == std::fs::canonicalize(output)? {
        return Err(HelixisError::invalid(
            "Output file must differ from the input file.",
        ));
    }

    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    Ok((reader, writer))
}

fn discard_on_error(result: Result<u64>, output: &Path) -> Result<u64> {
    if result.is_err() {
        if let Err(e) = std::fs::remove_file(output) {
            tracing::warn!(path = %output.display(), error = %e, "failed to remove partial output");
        }
    }
    result
}
