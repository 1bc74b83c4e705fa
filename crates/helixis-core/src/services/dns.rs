use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType as WireType;
use serde::Serialize;

use crate::error::{HelixisError, Result};
use crate::ports::{DnsResolver, RecordType};

/// Resolver backed by the system configuration (`/etc/resolv.conf` or the
/// platform equivalent).
pub struct HickoryResolver {
    inner: TokioAsyncResolver,
}

impl HickoryResolver {
    pub fn from_system_conf() -> Result<Self> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| HelixisError::Dns(e.to_string()))?;
        Ok(Self { inner })
    }
}

const fn wire_type(record_type: RecordType) -> WireType {
    match record_type {
        RecordType::A => WireType::A,
        RecordType::Aaaa => WireType::AAAA,
        RecordType::Mx => WireType::MX,
        RecordType::Txt => WireType::TXT,
        RecordType::Cname => WireType::CNAME,
        RecordType::Ns => WireType::NS,
    }
}

#[async_trait]
impl DnsResolver for HickoryResolver {
    async fn lookup(&self, name: &str, record_type: RecordType) -> Result<Vec<String>> {
        let wanted = wire_type(record_type);
        match self.inner.lookup(name, wanted).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .filter(|rdata| rdata.record_type() == wanted)
                .map(ToString::to_string)
                .collect()),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                    empty_answer(name, *response_code)
                }
                _ => Err(HelixisError::Dns(e.to_string())),
            },
        }
    }
}

/// An empty answer means "no records of this type" unless the name itself
/// does not exist.
fn empty_answer(name: &str, response_code: ResponseCode) -> Result<Vec<String>> {
    if response_code == ResponseCode::NXDomain {
        return Err(HelixisError::Dns(format!("{name}: no such host")));
    }
    Ok(Vec::new())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsReport {
    pub host: String,
    pub record_type: RecordType,
    pub records: Vec<String>,
}

pub struct DnsService<R>
where
    R: DnsResolver,
{
    resolver: Arc<R>,
}

impl<R> DnsService<R>
where
    R: DnsResolver,
{
    pub const fn new(resolver: Arc<R>) -> Self {
        Self { resolver }
    }

    pub async fn lookup(&self, host: &str, record_type: RecordType) -> Result<DnsReport> {
        let host = host.trim();
        if host.is_empty() {
            return Err(HelixisError::invalid("Host name must not be empty."));
        }

        let records = self.resolver.lookup(host, record_type).await?;
        tracing::debug!(host, %record_type, count = records.len(), "dns lookup");
        Ok(DnsReport {
            host: host.to_string(),
            record_type,
            records,
        })
    }
}
