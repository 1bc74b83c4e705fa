use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::PortScanConfig;
use crate::domain::PortRange;
use crate::error::{HelixisError, Result};
use crate::ports::{PortProbe, ProbeOutcome};

/// Plain TCP connect probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

#[async_trait]
impl PortProbe for TcpProbe {
    async fn probe(&self, addr: SocketAddr, timeout: Duration) -> ProbeOutcome {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => ProbeOutcome::Open,
            Ok(Err(_)) => ProbeOutcome::Closed,
            Err(_) => ProbeOutcome::TimedOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub timeout: Duration,
    pub workers: usize,
    pub deadline: Duration,
}

impl ScanOptions {
    pub fn new(timeout: Duration, workers: usize, deadline: Duration) -> Result<Self> {
        if workers == 0 {
            return Err(HelixisError::invalid("Number of workers must be at least 1."));
        }
        Ok(Self {
            timeout,
            workers,
            deadline,
        })
    }
}

impl TryFrom<&PortScanConfig> for ScanOptions {
    type Error = HelixisError;

    fn try_from(config: &PortScanConfig) -> Result<Self> {
        Self::new(
            Duration::from_millis(config.timeout_ms),
            config.workers,
            Duration::from_secs(config.deadline_secs),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub host: String,
    pub address: IpAddr,
    pub range: PortRange,
    /// Ascending.
    pub open: Vec<u16>,
    pub scanned: usize,
    /// The overall deadline expired before every port was probed.
    pub incomplete: bool,
}

pub struct PortScanner<P>
where
    P: PortProbe,
{
    probe: Arc<P>,
    options: ScanOptions,
}

impl<P> PortScanner<P>
where
    P: PortProbe + 'static,
{
    pub const fn new(probe: Arc<P>, options: ScanOptions) -> Self {
        Self { probe, options }
    }

    /// Probes every port in `range`, at most `workers` at a time.
    /// `on_progress` receives the number of ports finished so far.
    pub async fn scan<F>(&self, host: &str, range: PortRange, on_progress: F) -> Result<ScanReport>
    where
        F: Fn(usize),
    {
        let address = resolve(host).await?;
        tracing::info!(host, %address, %range, workers = self.options.workers, "starting scan");

        let semaphore = Arc::new(Semaphore::new(self.options.workers));
        let mut tasks = JoinSet::new();
        for port in range.ports() {
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.options.timeout;
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                let outcome = probe.probe(SocketAddr::new(address, port), timeout).await;
                Some((port, outcome))
            });
        }

        let mut open = Vec::new();
        let mut scanned = 0usize;
        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Some((port, outcome))) => {
                        if outcome == ProbeOutcome::Open {
                            tracing::debug!(port, "open");
                            open.push(port);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "probe task failed"),
                }
                scanned += 1;
                on_progress(scanned);
            }
        };
        let incomplete = tokio::time::timeout(self.options.deadline, collect)
            .await
            .is_err();
        if incomplete {
            tracing::warn!(scanned, total = range.len(), "scan deadline expired");
            tasks.abort_all();
        }

        open.sort_unstable();
        Ok(ScanReport {
            host: host.to_string(),
            address,
            range,
            open,
            scanned,
            incomplete,
        })
    }
}

async fn resolve(host: &str) -> Result<IpAddr> {
    let mut addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|e| HelixisError::invalid(format!("Unable to resolve host {host}: {e}")))?;
    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| HelixisError::invalid(format!("Unable to resolve host {host}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProbe {
        open: HashSet<u16>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FixedProbe {
        fn new(open: &[u16]) -> Self {
            Self {
                open: open.iter().copied().collect(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PortProbe for FixedProbe {
        async fn probe(&self, addr: SocketAddr, _timeout: Duration) -> ProbeOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.open.contains(&addr.port()) {
                ProbeOutcome::Open
            } else {
                ProbeOutcome::Closed
            }
        }
    }

    struct StuckProbe;

    #[async_trait]
    impl PortProbe for StuckProbe {
        async fn probe(&self, _addr: SocketAddr, _timeout: Duration) -> ProbeOutcome {
            tokio::time::sleep(Duration::from_secs(30)).await;
            ProbeOutcome::TimedOut
        }
    }

    fn options(workers: usize, deadline: Duration) -> ScanOptions {
        ScanOptions::new(Duration::from_millis(200), workers, deadline).unwrap()
    }

    #[tokio::test]
    async fn reports_open_ports_in_order_within_worker_limit() {
        let probe = Arc::new(FixedProbe::new(&[80, 22, 443]));
        let scanner = PortScanner::new(Arc::clone(&probe), options(8, Duration::from_secs(10)));
        let progress = AtomicUsize::new(0);

        let report = scanner
            .scan("127.0.0.1", "1-500".parse().unwrap(), |done| {
                progress.store(done, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert_eq!(report.open, vec![22, 80, 443]);
        assert_eq!(report.scanned, 500);
        assert!(!report.incomplete);
        assert_eq!(progress.load(Ordering::SeqCst), 500);
        assert!(probe.peak.load(Ordering::SeqCst) <= 8);
    }

    #[tokio::test]
    async fn deadline_stops_the_scan() {
        let scanner = PortScanner::new(Arc::new(StuckProbe), options(4, Duration::from_millis(50)));
        let report = scanner
            .scan("127.0.0.1", "1-10".parse().unwrap(), |_| {})
            .await
            .unwrap();

        assert!(report.incomplete);
        assert!(report.open.is_empty());
        assert_eq!(report.scanned, 0);
    }

    #[tokio::test]
    async fn tcp_probe_finds_a_listening_socket() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let scanner = PortScanner::new(Arc::new(TcpProbe), options(4, Duration::from_secs(10)));
        let range = PortRange::new(port, port).unwrap();
        let report = scanner.scan("127.0.0.1", range, |_| {}).await.unwrap();

        assert_eq!(report.open, vec![port]);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(ScanOptions::new(Duration::from_millis(1), 0, Duration::from_secs(1)).is_err());

        let config = PortScanConfig::default();
        let options = ScanOptions::try_from(&config).unwrap();
        assert_eq!(options.workers, 100);
        assert_eq!(options.timeout, Duration::from_millis(200));
        assert_eq!(options.deadline, Duration::from_secs(60));
    }
}
