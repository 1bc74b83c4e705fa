use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, bail};
use helixis_core::domain::{CipherMode, HashAlgorithm};
use helixis_core::services::{AesCipher, hash_file, hash_text, reverse_alphabet_file};
use serde_json::json;

use super::CryptCommands;
use crate::output::print_json;

pub fn run(command: CryptCommands, json: bool) -> Result<ExitCode> {
    match command {
        CryptCommands::ReverseAlphabet { mode, file } => reverse_alphabet(&mode, &file, json),
        CryptCommands::Hash {
            input,
            algorithm,
            file,
        } => hash(&input, &algorithm, file, json),
        CryptCommands::Aes {
            mode,
            input,
            password,
            output,
            file,
        } => {
            let mode: CipherMode = mode.parse()?;
            let cipher = AesCipher::from_password(&password);
            if file {
                aes_file(&cipher, mode, Path::new(&input), output.as_deref(), json)
            } else {
                aes_text(&cipher, mode, &input, json)
            }
        }
    }
}

fn reverse_alphabet(mode: &str, file: &Path, json: bool) -> Result<ExitCode> {
    let mode: CipherMode = mode.parse()?;
    let report = reverse_alphabet_file(mode, file)?;

    if json {
        print_json(&report)?;
    } else {
        println!("{}", report.heading());
        println!("{}", report.text);
    }
    Ok(ExitCode::SUCCESS)
}

fn hash(input: &str, algorithm: &str, file: bool, json: bool) -> Result<ExitCode> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    let report = if file {
        hash_file(algorithm, Path::new(input))?
    } else {
        hash_text(algorithm, input)
    };

    if json {
        print_json(&report)?;
    } else {
        println!("Hash ({}): {}", report.algorithm, report.hex);
    }
    Ok(ExitCode::SUCCESS)
}

fn aes_text(cipher: &AesCipher, mode: CipherMode, input: &str, json: bool) -> Result<ExitCode> {
    let (label, text) = match mode {
        CipherMode::Encrypt => ("Encrypted", cipher.encrypt_str(input)),
        CipherMode::Decrypt => ("Decrypted", cipher.decrypt_str(input)?),
    };

    if json {
        print_json(&json!({ "mode": mode, "result": text }))?;
    } else {
        println!("{label}: {text}");
    }
    Ok(ExitCode::SUCCESS)
}

fn aes_file(
    cipher: &AesCipher,
    mode: CipherMode,
    input: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<ExitCode> {
    let action = match mode {
        CipherMode::Encrypt => "encrypt",
        CipherMode::Decrypt => "decrypt",
    };
    let Some(output) = output else {
        bail!("Output file path is required for file {action}ion.");
    };

    let bytes = match mode {
        CipherMode::Encrypt => cipher.encrypt_file(input, output)?,
        CipherMode::Decrypt => cipher.decrypt_file(input, output)?,
    };
    let written = absolute(output);

    if json {
        print_json(&json!({ "mode": mode, "output": written, "bytes": bytes }))?;
    } else {
        println!("File {action}ed successfully to: {}", written.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
