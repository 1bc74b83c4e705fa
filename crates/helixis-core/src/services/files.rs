use std::fs::{File, FileTimes, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;

use crate::error::{HelixisError, Result};

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Offset of the first differing byte; the shorter length when one file
    /// is a prefix of the other.
    pub mismatch: Option<u64>,
}

impl Comparison {
    pub const fn identical(&self) -> bool {
        self.mismatch.is_none()
    }
}

pub fn compare_files(first: &Path, second: &Path) -> Result<Comparison> {
    for path in [first, second] {
        if !path.is_file() {
            return Err(HelixisError::FileNotFound(path.to_path_buf()));
        }
    }

    let mut a = BufReader::with_capacity(CHUNK_SIZE, File::open(first)?);
    let mut b = BufReader::with_capacity(CHUNK_SIZE, File::open(second)?);

    Ok(Comparison {
        first: first.to_path_buf(),
        second: second.to_path_buf(),
        mismatch: first_mismatch(&mut a, &mut b)?,
    })
}

fn first_mismatch<A: BufRead, B: BufRead>(a: &mut A, b: &mut B) -> Result<Option<u64>> {
    let mut offset = 0u64;
    loop {
        let left = a.fill_buf()?;
        let right = b.fill_buf()?;

        match (left.is_empty(), right.is_empty()) {
            (true, true) => return Ok(None),
            (true, false) | (false, true) => return Ok(Some(offset)),
            (false, false) => {}
        }

        let n = left.len().min(right.len());
        if let Some(i) = left[..n].iter().zip(&right[..n]).position(|(x, y)| x != y) {
            return Ok(Some(offset + i as u64));
        }

        a.consume(n);
        b.consume(n);
        offset += n as u64;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timestamp {
    Modified,
    Accessed,
    Created,
}

impl Timestamp {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Modified => "Last modified time",
            Self::Accessed => "Last access time",
            Self::Created => "Creation time",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TouchRequest {
    pub when: DateTime<Local>,
    pub timestamps: Vec<Timestamp>,
}

impl TouchRequest {
    /// With no timestamp selected only the modification time changes.
    pub fn new(when: DateTime<Local>, modified: bool, accessed: bool, created: bool) -> Self {
        let mut timestamps = Vec::new();
        if modified || !(accessed || created) {
            timestamps.push(Timestamp::Modified);
        }
        if accessed {
            timestamps.push(Timestamp::Accessed);
        }
        if created {
            timestamps.push(Timestamp::Created);
        }
        Self { when, timestamps }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TouchReport {
    pub path: PathBuf,
    pub time: DateTime<Local>,
    pub updated: Vec<Timestamp>,
}

pub fn local_time(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    Local.from_local_datetime(&naive).single().ok_or_else(|| {
        HelixisError::invalid(format!(
            "{naive} is ambiguous or does not exist in the local time zone"
        ))
    })
}

pub fn touch_file(path: &Path, request: &TouchRequest) -> Result<TouchReport> {
    if !path.exists() {
        return Err(HelixisError::FileNotFound(path.to_path_buf()));
    }

    let time = SystemTime::from(request.when);
    let mut times = FileTimes::new();
    for timestamp in &request.timestamps {
        times = match timestamp {
            Timestamp::Modified => times.set_modified(time),
            Timestamp::Accessed => times.set_accessed(time),
            Timestamp::Created => with_created(times, time)?,
        };
    }

    let file = OpenOptions::new()
        .read(true)
        .write(cfg!(windows))
        .open(path)?;
    file.set_times(times)?;

    tracing::info!(path = %path.display(), time = %request.when, "updated file times");
    Ok(TouchReport {
        path: path.to_path_buf(),
        time: request.when,
        updated: request.timestamps.clone(),
    })
}

#[cfg(target_os = "macos")]
#[allow(clippy::unnecessary_wraps)]
fn with_created(times: FileTimes, time: SystemTime) -> Result<FileTimes> {
    use std::os::macos::fs::FileTimesExt;
    Ok(times.set_created(time))
}

#[cfg(windows)]
#[allow(clippy::unnecessary_wraps)]
fn with_created(times: FileTimes, time: SystemTime) -> Result<FileTimes> {
    use std::os::windows::fs::FileTimesExt;
    Ok(times.set_created(time))
}

#[cfg(not(any(target_os = "macos", windows)))]
fn with_created(_times: FileTimes, _time: SystemTime) -> Result<FileTimes> {
    Err(HelixisError::Unsupported(
        "Modifying creation time is not supported on this platform.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a", b"same bytes");
        let b = write(dir.path(), "b", b"same bytes");
        assert!(compare_files(&a, &b).unwrap().identical());
    }

    #[test]
    fn reports_first_differing_offset() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a", b"hello world");
        let b = write(dir.path(), "b", b"hello there");
        assert_eq!(compare_files(&a, &b).unwrap().mismatch, Some(6));
    }

    #[test]
    fn prefix_mismatches_at_shorter_length() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a", b"abc");
        let b = write(dir.path(), "b", b"abcdef");
        assert_eq!(compare_files(&a, &b).unwrap().mismatch, Some(3));
        assert_eq!(compare_files(&b, &a).unwrap().mismatch, Some(3));
    }

    #[test]
    fn mismatch_beyond_first_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let mut left = vec![7u8; CHUNK_SIZE * 2 + 10];
        let right = left.clone();
        left[CHUNK_SIZE + 3] = 8;
        let a = write(dir.path(), "a", &left);
        let b = write(dir.path(), "b", &right);
        assert_eq!(
            compare_files(&a, &b).unwrap().mismatch,
            Some(CHUNK_SIZE as u64 + 3)
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a", b"x");
        let err = compare_files(&a, &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, HelixisError::FileNotFound(_)));
    }

    #[test]
    fn default_touch_targets_modification_time() {
        let request = TouchRequest::new(Local::now(), false, false, false);
        assert_eq!(request.timestamps, vec![Timestamp::Modified]);

        let request = TouchRequest::new(Local::now(), false, true, false);
        assert_eq!(request.timestamps, vec![Timestamp::Accessed]);
    }

    #[test]
    fn touch_sets_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "touched", b"data");

        let naive = NaiveDateTime::parse_from_str("2020-06-15 08:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let when = local_time(naive).unwrap();
        let report = touch_file(&path, &TouchRequest::new(when, true, true, false)).unwrap();
        assert_eq!(report.updated, vec![Timestamp::Modified, Timestamp::Accessed]);

        let modified: DateTime<Local> = std::fs::metadata(&path).unwrap().modified().unwrap().into();
        assert_eq!(modified.timestamp(), when.timestamp());
    }

    #[cfg(not(any(target_os = "macos", windows)))]
    #[test]
    fn creation_time_is_unsupported_here() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "touched", b"data");
        let err = touch_file(&path, &TouchRequest::new(Local::now(), false, false, true))
            .unwrap_err();
        assert!(matches!(err, HelixisError::Unsupported(_)));
    }
}
