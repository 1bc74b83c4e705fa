//! RFC 4122 UUID generation for versions 1 through 5.
//!
//! Versions 3, 4 and 5 come from the `uuid` crate. Versions 1 and 2 are laid
//! out here so the node id and the DCE security fields stay under our control.

use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{HelixisError, Result};

/// 100 ns ticks between 1582-10-15 and the Unix epoch.
const GREGORIAN_OFFSET: u64 = 0x01B2_1DD2_1381_4000;
const CLOCK_SEQ_MASK: u16 = 0x3FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UuidVersion {
    V1,
    V2,
    V3,
    V4,
    V5,
}

impl TryFrom<u8> for UuidVersion {
    type Error = HelixisError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            5 => Ok(Self::V5),
            other => Err(HelixisError::InvalidUuidVersion(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UuidRequest {
    TimeBased,
    DceSecurity { local: u32, domain: u8 },
    Md5Name { namespace: Uuid, name: String },
    Random { secure: bool },
    Sha1Name { namespace: Uuid, name: String },
}

/// Raw command-line style options, validated by [`UuidRequest::from_options`].
#[derive(Debug, Clone, Default)]
pub struct UuidOptions {
    pub version: u8,
    pub secure: bool,
    pub local: Option<u32>,
    pub domain: Option<u8>,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

impl UuidRequest {
    pub fn from_options(options: UuidOptions) -> Result<Self> {
        match UuidVersion::try_from(options.version)? {
            UuidVersion::V1 => Ok(Self::TimeBased),
            UuidVersion::V2 => match (options.local, options.domain) {
                (Some(local), Some(domain)) => Ok(Self::DceSecurity { local, domain }),
                _ => Err(HelixisError::invalid(
                    "Version 2 UUIDs require both --local and --domain.",
                )),
            },
            UuidVersion::V4 => Ok(Self::Random {
                secure: options.secure,
            }),
            version @ (UuidVersion::V3 | UuidVersion::V5) => {
                let (Some(namespace), Some(name)) = (options.namespace, options.name) else {
                    return Err(HelixisError::invalid(
                        "Version 3 and 5 UUIDs require both --namespace and --name.",
                    ));
                };
                let namespace = parse_namespace(&namespace)?;
                Ok(if version == UuidVersion::V3 {
                    Self::Md5Name { namespace, name }
                } else {
                    Self::Sha1Name { namespace, name }
                })
            }
        }
    }
}

/// Accepts a literal UUID or one of the RFC 4122 namespace names.
pub fn parse_namespace(raw: &str) -> Result<Uuid> {
    match raw.to_ascii_lowercase().as_str() {
        "dns" => Ok(Uuid::NAMESPACE_DNS),
        "url" => Ok(Uuid::NAMESPACE_URL),
        "oid" => Ok(Uuid::NAMESPACE_OID),
        "x500" => Ok(Uuid::NAMESPACE_X500),
        _ => Uuid::parse_str(raw).map_err(|e| {
            HelixisError::invalid(format!(
                "Invalid namespace '{raw}': {e} (use a UUID or dns, url, oid, x500)"
            ))
        }),
    }
}

#[derive(Debug)]
struct ClockState {
    last_ticks: u64,
    sequence: u16,
}

#[derive(Debug)]
pub struct UuidFactory {
    clock: Mutex<ClockState>,
    node: [u8; 6],
}

impl Default for UuidFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidFactory {
    pub fn new() -> Self {
        Self::with_node(node_id())
    }

    pub fn with_node(node: [u8; 6]) -> Self {
        Self {
            clock: Mutex::new(ClockState {
                last_ticks: 0,
                sequence: rand::thread_rng().gen_range(0..=CLOCK_SEQ_MASK),
            }),
            node,
        }
    }

    pub fn generate(&self, request: &UuidRequest) -> Uuid {
        match request {
            UuidRequest::TimeBased => self.time_based(),
            UuidRequest::DceSecurity { local, domain } => self.dce_security(*local, *domain),
            UuidRequest::Md5Name { namespace, name } => Uuid::new_v3(namespace, name.as_bytes()),
            UuidRequest::Sha1Name { namespace, name } => Uuid::new_v5(namespace, name.as_bytes()),
            UuidRequest::Random { secure } => random_uuid(*secure),
        }
    }

    /// Generates `count` UUIDs, each one fresh.
    pub fn generate_many(&self, request: &UuidRequest, count: usize) -> Vec<Uuid> {
        (0..count).map(|_| self.generate(request)).collect()
    }

    fn next_tick(&self) -> (u64, u16) {
        let now = gregorian_ticks();
        let mut state = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        if now <= state.last_ticks {
            state.sequence = state.sequence.wrapping_add(1) & CLOCK_SEQ_MASK;
        }
        state.last_ticks = now;
        (now, state.sequence)
    }

    fn time_based(&self) -> Uuid {
        let (ticks, sequence) = self.next_tick();
        let (time_low, time_mid, time_hi) = split_ticks(ticks);
        self.assemble(time_low, time_mid, time_hi | (1 << 12), sequence)
    }

    fn dce_security(&self, local: u32, domain: u8) -> Uuid {
        let (ticks, sequence) = self.next_tick();
        let (_, time_mid, time_hi) = split_ticks(ticks);
        let sequence = (sequence & 0xFF00) | u16::from(domain);
        self.assemble(local, time_mid, time_hi | (2 << 12), sequence)
    }

    fn assemble(&self, time_low: u32, time_mid: u16, time_hi_and_version: u16, sequence: u16) -> Uuid {
        let [seq_hi, seq_low] = sequence.to_be_bytes();
        let [n0, n1, n2, n3, n4, n5] = self.node;
        // variant bits 10xx
        let tail = [(seq_hi & 0x3F) | 0x80, seq_low, n0, n1, n2, n3, n4, n5];
        Uuid::from_fields(time_low, time_mid, time_hi_and_version, &tail)
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn split_ticks(ticks: u64) -> (u32, u16, u16) {
    (
        ticks as u32,
        (ticks >> 32) as u16,
        ((ticks >> 48) as u16) & 0x0FFF,
    )
}

#[allow(clippy::cast_possible_truncation)]
fn gregorian_ticks() -> u64 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (since_epoch.as_nanos() / 100) as u64 + GREGORIAN_OFFSET
}

fn random_uuid(secure: bool) -> Uuid {
    let mut bytes = [0u8; 16];
    if secure {
        OsRng.fill_bytes(&mut bytes);
    } else {
        rand::thread_rng().fill_bytes(&mut bytes);
    }
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

fn node_id() -> [u8; 6] {
    hardware_address().unwrap_or_else(|| {
        tracing::debug!("no hardware address found, using a random node id");
        let mut node = [0u8; 6];
        rand::thread_rng().fill_bytes(&mut node);
        node[0] |= 0x01;
        node
    })
}

#[cfg(target_os = "linux")]
fn hardware_address() -> Option<[u8; 6]> {
    let mut interfaces: Vec<_> = std::fs::read_dir("/sys/class/net")
        .ok()?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_name() != "lo")
        .collect();
    interfaces.sort_by_key(std::fs::DirEntry::file_name);

    interfaces.into_iter().find_map(|entry| {
        let dir = entry.path();
        let state = std::fs::read_to_string(dir.join("operstate")).ok()?;
        if state.trim() != "up" {
            return None;
        }
        parse_mac(std::fs::read_to_string(dir.join("address")).ok()?.trim())
    })
}

#[cfg(not(target_os = "linux"))]
const fn hardware_address() -> Option<[u8; 6]> {
    None
}

fn parse_mac(raw: &str) -> Option<[u8; 6]> {
    let mut mac = [0u8; 6];
    let mut parts = raw.split(':');
    for byte in &mut mac {
        *byte = u8::from_str_radix(parts.next()?, 16).ok()?;
    }
    if parts.next().is_some() || mac == [0u8; 6] {
        return None;
    }
    Some(mac)
}
