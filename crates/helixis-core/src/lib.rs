//! Core of the `helixis` multitool: password and color generation, ciphers
//! and digests, UUIDs, URL encoding, DNS lookups, port scanning and small file
//! utilities. The binary in `apps/helixis` is a thin clap layer over this crate.

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{HelixisError, Result};
