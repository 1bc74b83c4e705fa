mod probe;
mod resolve;

pub use probe::{PortProbe, ProbeOutcome};
pub use resolve::{DnsResolver, RecordType};
