use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HelixisError;

/// Inclusive TCP port range within 1..=65535.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, HelixisError> {
        if start == 0 || start > end {
            return Err(out_of_range());
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> u16 {
        self.start
    }

    pub const fn end(&self) -> u16 {
        self.end
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn ports(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl FromStr for PortRange {
    type Err = HelixisError;

    /// Parses `start-end` or a single `port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let (start, end) = match parts.as_slice() {
            [port] => (parse_port(port)?, parse_port(port)?),
            [start, end] => (parse_port(start)?, parse_port(end)?),
            _ => {
                return Err(HelixisError::InvalidPortRange(
                    "Invalid port range format. Use 'start-end' or 'port'.".to_string(),
                ));
            }
        };

        // numeric but above 65535
        let start = start.ok_or_else(out_of_range)?;
        let end = end.ok_or_else(out_of_range)?;
        Self::new(start, end)
    }
}

fn out_of_range() -> HelixisError {
    HelixisError::InvalidPortRange(
        "Invalid port range. Ports must be between 1 and 65535.".to_string(),
    )
}

fn parse_port(raw: &str) -> Result<Option<u16>, HelixisError> {
    let value: u64 = raw.trim().parse().map_err(|_| {
        HelixisError::InvalidPortRange(format!("Invalid port number in range: '{}'", raw.trim()))
    })?;
    Ok(u16::try_from(value).ok())
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_ranges_and_single_ports() {
        let range: PortRange = "1-1024".parse().unwrap();
        assert_eq!((range.start(), range.end(), range.len()), (1, 1024, 1024));

        let single: PortRange = "443".parse().unwrap();
        assert_eq!(single.ports().collect::<Vec<_>>(), vec![443]);
        assert_eq!(single.to_string(), "443");
    }

    #[test]
    fn full_range_is_accepted() {
        let range: PortRange = "1-65535".parse().unwrap();
        assert_eq!(range.len(), 65535);
    }

    #[test]
    fn rejects_zero_reversed_and_overflowing_ports() {
        for input in ["0-10", "10-5", "1-65536", "70000"] {
            assert!(input.parse::<PortRange>().is_err(), "{input}");
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let err = "1-2-3".parse::<PortRange>().unwrap_err();
        assert!(err.to_string().contains("Use 'start-end' or 'port'."));

        let err = "http".parse::<PortRange>().unwrap_err();
        assert!(err.to_string().starts_with("Invalid port number in range"));
    }
}
