pub mod aes;
pub mod cipher;
pub mod digest;
pub mod dns;
pub mod files;
pub mod password;
pub mod portscan;
pub mod uuids;

pub use aes::AesCipher;
pub use cipher::{CipherReport, reverse_alphabet_file};
pub use digest::{DigestReport, hash_file, hash_text};
pub use dns::{DnsReport, DnsService, HickoryResolver};
pub use files::{
    Comparison, Timestamp, TouchReport, TouchRequest, compare_files, local_time, touch_file,
};
pub use password::{generate_passwords, write_passwords};
pub use portscan::{PortScanner, ScanOptions, ScanReport, TcpProbe};
pub use uuids::{UuidFactory, UuidOptions, UuidRequest, UuidVersion, parse_namespace};
