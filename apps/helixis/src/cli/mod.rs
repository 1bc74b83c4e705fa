use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use helixis_core::config::Config;
use helixis_core::domain::DEFAULT_DATE_FORMAT;

mod checksum;
mod color;
mod crypt;
mod date;
mod dns;
mod filecompare;
mod filetouch;
mod password;
mod portscan;
mod url;
mod uuid;

#[derive(Parser, Debug)]
#[command(name = "helixis")]
#[command(version, about = "A command-line multitool for everyday developer chores")]
pub struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Read configuration from this file only"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Generate random passwords")]
    Password {
        #[arg(short, long, default_value_t = 1, help = "Number of passwords to generate")]
        number: usize,

        #[arg(short, long, help = "Write passwords to this file instead of stdout")]
        file: Option<PathBuf>,

        #[arg(short, long, help = "Password length, excluding separators [default: 18]")]
        length: Option<usize>,

        #[arg(short, long, help = "Number of uppercase letters [default: 1]")]
        uppercase: Option<usize>,

        #[arg(short = 'c', long, help = "Number of lowercase letters [default: remaining]")]
        lowercase: Option<usize>,

        #[arg(short, long, help = "Number of digits [default: 1]")]
        digits: Option<usize>,

        #[arg(short, long, help = "Number of special characters [default: 0]")]
        special: Option<usize>,

        #[arg(long, help = "Allowed special characters")]
        special_chars: Option<String>,

        #[arg(long, help = "Separator character [default: -]")]
        separator: Option<char>,

        #[arg(long, help = "Insert a separator every N characters, 0 disables [default: 6]")]
        separator_frequency: Option<usize>,
    },

    #[command(about = "Convert RGB values to hex and suggest similar colors")]
    Color {
        #[arg(allow_negative_numbers = true, help = "Red value (0-255)")]
        red: i64,

        #[arg(allow_negative_numbers = true, help = "Green value (0-255)")]
        green: i64,

        #[arg(allow_negative_numbers = true, help = "Blue value (0-255)")]
        blue: i64,

        #[arg(
            short,
            long,
            default_value_t = 0,
            value_name = "NUMBER",
            help = "Number of similar colors"
        )]
        similar: usize,

        #[arg(long, help = "Standard deviation of the color noise [default: 30]")]
        sigma: Option<f64>,
    },

    #[command(about = "Ciphers, hashes and AES encryption")]
    Crypt {
        #[command(subcommand)]
        command: CryptCommands,
    },

    #[command(about = "Date calculations")]
    Date {
        #[command(subcommand)]
        command: DateCommands,
    },

    #[command(about = "Generate UUIDs")]
    Uuid {
        #[arg(short, long, default_value_t = 1, help = "Number of UUIDs to generate")]
        number: usize,

        #[arg(
            short = 'V',
            long = "uuid-version",
            default_value_t = 4,
            help = "UUID version (1-5)"
        )]
        version: u8,

        #[arg(short, long, help = "Use the operating system RNG for version 4")]
        secure: bool,

        #[arg(short, long, help = "Local identifier for version 2")]
        local: Option<u32>,

        #[arg(short, long, help = "Local domain for version 2 (0=user, 1=group, 2=org)")]
        domain: Option<u8>,

        #[arg(long, help = "Namespace for versions 3 and 5: a UUID or dns, url, oid, x500")]
        namespace: Option<String>,

        #[arg(short = 'N', long, help = "Name for versions 3 and 5")]
        name: Option<String>,
    },

    #[command(about = "URL-encode and decode strings")]
    Url {
        #[command(subcommand)]
        command: UrlCommands,
    },

    #[command(about = "DNS lookups")]
    Dns {
        #[command(subcommand)]
        command: DnsCommands,
    },

    #[command(about = "Scan a host for open TCP ports")]
    Portscan {
        #[arg(help = "Target host (IP address or hostname)")]
        host: String,

        #[arg(help = "Port range to scan, e.g. '1-1024' or '443'")]
        range: String,

        #[arg(short, long, help = "Connection timeout in milliseconds [default: 200]")]
        timeout: Option<u64>,

        #[arg(short, long, help = "Number of concurrent workers [default: 100]")]
        workers: Option<usize>,
    },

    #[command(about = "Print the checksum of a file")]
    Checksum {
        #[command(subcommand)]
        command: ChecksumCommands,
    },

    #[command(about = "Compare two files byte by byte")]
    Filecompare {
        #[arg(help = "First file")]
        first: PathBuf,

        #[arg(help = "Second file")]
        second: PathBuf,
    },

    #[command(about = "Set file timestamps")]
    Filetouch {
        #[arg(help = "Path to the file")]
        file: PathBuf,

        #[arg(short, long, help = "New date and time [default: now]")]
        date: Option<String>,

        #[arg(short, long, default_value = DEFAULT_DATE_FORMAT, help = "strftime format of --date")]
        format: String,

        #[arg(short = 'm', help = "Change the modification time")]
        modified: bool,

        #[arg(short = 'a', help = "Change the access time")]
        accessed: bool,

        #[arg(short = 'c', help = "Change the creation time")]
        created: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CryptCommands {
    #[command(about = "Reverse-alphabet cipher over a text file")]
    ReverseAlphabet {
        #[arg(help = "Mode: 'encrypt' or 'decrypt'")]
        mode: String,

        #[arg(help = "Path to the input file")]
        file: PathBuf,
    },

    #[command(about = "Hash a string or file")]
    Hash {
        #[arg(help = "Input string, or file path with --file")]
        input: String,

        #[arg(
            short,
            long,
            default_value = "SHA-256",
            help = "MD5, SHA-1, SHA-224, SHA-256, SHA-384, SHA-512 or BLAKE3"
        )]
        algorithm: String,

        #[arg(short, long, help = "Treat input as a file path")]
        file: bool,
    },

    #[command(about = "AES-128-CBC encryption of a string or file")]
    Aes {
        #[arg(help = "Mode: 'encrypt' or 'decrypt'")]
        mode: String,

        #[arg(help = "Input string, or file path with --file")]
        input: String,

        #[arg(short, long, help = "Password used as the key")]
        password: String,

        #[arg(short, long, help = "Output file (required with --file)")]
        output: Option<PathBuf>,

        #[arg(short, long, help = "Treat input as a file path")]
        file: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DateCommands {
    #[command(about = "Time between two dates")]
    Difference {
        #[arg(help = "The earlier date")]
        first: String,

        #[arg(help = "The later date")]
        second: String,

        #[arg(long, default_value = DEFAULT_DATE_FORMAT, help = "strftime format of both dates")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UrlCommands {
    #[command(about = "URL-encode a string")]
    Encode {
        input: String,

        #[arg(short, long, default_value = "UTF-8", help = "UTF-8, ISO-8859-1 or US-ASCII")]
        charset: String,
    },

    #[command(about = "URL-decode a string")]
    Decode {
        input: String,

        #[arg(short, long, default_value = "UTF-8", help = "UTF-8, ISO-8859-1 or US-ASCII")]
        charset: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DnsCommands {
    #[command(about = "Look up records for a host")]
    Lookup {
        host: String,

        #[arg(
            short = 't',
            long = "type",
            default_value = "A",
            help = "A, AAAA, MX, TXT, CNAME or NS"
        )]
        record_type: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChecksumCommands {
    #[command(about = "SHA-256 checksum")]
    Sha256 { file: PathBuf },

    #[command(about = "MD5 checksum")]
    Md5 { file: PathBuf },

    #[command(about = "SHA-1 checksum")]
    Sha1 { file: PathBuf },

    #[command(about = "SHA-512 checksum")]
    Sha512 { file: PathBuf },
}

pub async fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    let json = cli.json;
    match cli.command {
        Commands::Password {
            number,
            file,
            length,
            uppercase,
            lowercase,
            digits,
            special,
            special_chars,
            separator,
            separator_frequency,
        } => {
            let defaults = &config.password;
            let request = helixis_core::domain::PasswordRequest {
                length: length.unwrap_or(defaults.length),
                uppercase: uppercase.unwrap_or(defaults.uppercase),
                lowercase,
                digits: digits.unwrap_or(defaults.digits),
                special: special.unwrap_or(defaults.special),
                special_chars: special_chars.unwrap_or_else(|| defaults.special_chars.clone()),
                separator: separator.unwrap_or(defaults.separator),
                separator_frequency: separator_frequency.unwrap_or(defaults.separator_frequency),
            };
            password::run(request, number, file.as_deref(), json)
        }
        Commands::Color {
            red,
            green,
            blue,
            similar,
            sigma,
        } => color::run(red, green, blue, similar, sigma.unwrap_or(config.color.sigma), json),
        Commands::Crypt { command } => crypt::run(command, json),
        Commands::Date {
            command: DateCommands::Difference {
                first,
                second,
                format,
            },
        } => date::difference(&first, &second, &format, json),
        Commands::Uuid {
            number,
            version,
            secure,
            local,
            domain,
            namespace,
            name,
        } => {
            let options = helixis_core::services::UuidOptions {
                version,
                secure,
                local,
                domain,
                namespace,
                name,
            };
            uuid::run(options, number, json)
        }
        Commands::Url { command } => url::run(command, json),
        Commands::Dns {
            command: DnsCommands::Lookup { host, record_type },
        } => dns::lookup(&host, &record_type, json).await,
        Commands::Portscan {
            host,
            range,
            timeout,
            workers,
        } => {
            let mut settings = config.portscan.clone();
            if let Some(timeout) = timeout {
                settings.timeout_ms = timeout;
            }
            if let Some(workers) = workers {
                settings.workers = workers;
            }
            portscan::run(&host, &range, &settings, json).await
        }
        Commands::Checksum { command } => checksum::run(command, json),
        Commands::Filecompare { first, second } => filecompare::run(&first, &second, json),
        Commands::Filetouch {
            file,
            date,
            format,
            modified,
            accessed,
            created,
        } => filetouch::run(&file, date.as_deref(), &format, [modified, accessed, created], json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_counts_flags() {
        let cli = Cli::parse_from(["helixis", "-vv", "uuid"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn negative_color_components_reach_validation() {
        let cli = Cli::parse_from(["helixis", "color", "-1", "0", "0"]);
        assert!(matches!(cli.command, Commands::Color { red: -1, .. }));
    }
}
