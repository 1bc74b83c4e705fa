use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{HelixisError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    #[default]
    A,
    Aaaa,
    Mx,
    Txt,
    Cname,
    Ns,
}

impl RecordType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Cname => "CNAME",
            Self::Ns => "NS",
        }
    }
}

impl FromStr for RecordType {
    type Err = HelixisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "CNAME" => Ok(Self::Cname),
            "NS" => Ok(Self::Ns),
            _ => Err(HelixisError::invalid(format!(
                "Unsupported record type: {s} (expected A, AAAA, MX, TXT, CNAME or NS)"
            ))),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves one record type for a name. An empty vector means the name
/// exists but has no records of that type.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn lookup(&self, name: &str, record_type: RecordType) -> Result<Vec<String>>;
}
