//! Source and destination path checks, and the derived output file names.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::ntp::ClockOffset;
use crate::pcap::{PcapReader, PcapResult};

/// Extensions accepted for source and destination captures, lowercase without the dot.
pub const PCAP_EXTENSIONS: &[&str] = &["pcap"];

/// Format of the timestamp part of a derived name.
const NAME_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Side of a copy a path is checked for.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PathRole {
    Source,
    Destination,
}

impl std::fmt::Display for PathRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathRole::Source => f.write_str("source"),
            PathRole::Destination => f.write_str("destination"),
        }
    }
}

/// A source or destination path can not be used.
#[derive(Debug, Error)]
pub enum NamingError {
    #[error("Cannot resolve {0}")]
    Resolve(PathBuf, #[source] io::Error),
    #[error("The {1} file {0} must have an extension")]
    MissingExtension(PathBuf, PathRole),
    #[error("Unsupported {1} file type ({0})")]
    UnsupportedExtension(String, PathRole),
    #[error("The source file {0} does not exist")]
    SourceMissing(PathBuf),
    #[error("The destination file {0} already exists")]
    DestinationExists(PathBuf),
    #[error("The directory of {0} does not exist")]
    DirectoryMissing(PathBuf),
    #[error("Source and destination files cannot be the same ({0})")]
    SameFile(PathBuf),
}

/// Absolute form of `path`, relative paths being joined to the current directory.
pub fn resolve_full_path<P: AsRef<Path>>(path: P) -> Result<PathBuf, NamingError> {
    let path = path.as_ref();
    std::path::absolute(path).map_err(|e| NamingError::Resolve(path.to_path_buf(), e))
}

/// Checks that `path` carries one of [`PCAP_EXTENSIONS`], ignoring case.
pub fn check_extension(path: &Path, role: PathRole) -> Result<(), NamingError> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| NamingError::MissingExtension(path.to_path_buf(), role))?;

    if !PCAP_EXTENSIONS.contains(&ext.as_str()) {
        return Err(NamingError::UnsupportedExtension(format!(".{ext}"), role));
    }

    Ok(())
}

/// Resolves the source capture; it must exist and be a pcap file.
pub fn check_source<P: AsRef<Path>>(path: P) -> Result<PathBuf, NamingError> {
    let path = resolve_full_path(path)?;
    check_extension(&path, PathRole::Source)?;

    if !path.is_file() {
        return Err(NamingError::SourceMissing(path));
    }

    Ok(path)
}

/// Resolves a destination capture for `source`.
///
/// It must be a new pcap file, in an existing directory, other than the source.
pub fn check_destination<P: AsRef<Path>>(source: &Path, path: P) -> Result<PathBuf, NamingError> {
    let path = resolve_full_path(path)?;
    check_extension(&path, PathRole::Destination)?;

    if path == source {
        return Err(NamingError::SameFile(path));
    }
    if path.exists() {
        return Err(NamingError::DestinationExists(path));
    }
    match path.parent() {
        Some(dir) if dir.is_dir() => {},
        _ => return Err(NamingError::DirectoryMissing(path)),
    }

    Ok(path)
}

/// Timestamp of the first record of a capture, `None` if it has no record.
pub fn read_first_timestamp<P: AsRef<Path>>(path: P) -> PcapResult<Option<Duration>> {
    let mut reader = PcapReader::open(path)?;
    let first = match reader.next_packet() {
        Some(packet) => Some(packet?.timestamp),
        None => None,
    };

    Ok(first)
}

/// Derives `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.<ext>` next to a source capture.
///
/// The time is the corrected timestamp of the first record, in UTC, or the
/// current time for a capture without records.
#[derive(Clone, Debug)]
pub struct OutputNamer {
    source: PathBuf,
    prefix: Option<String>,
    first_timestamp: Option<Duration>,
    offset: ClockOffset,
}

impl OutputNamer {
    /// Without a prefix the file stem of the source is used.
    pub fn new<P: Into<PathBuf>>(source: P, prefix: Option<&str>) -> OutputNamer {
        OutputNamer {
            source: source.into(),
            prefix: prefix.map(str::to_string),
            first_timestamp: None,
            offset: ClockOffset::ZERO,
        }
    }

    pub fn with_first_timestamp(mut self, first_timestamp: Option<Duration>) -> OutputNamer {
        self.first_timestamp = first_timestamp;
        self
    }

    pub fn with_offset(mut self, offset: ClockOffset) -> OutputNamer {
        self.offset = offset;
        self
    }

    /// Instant the name is derived from.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.first_timestamp
            .map(|ts| self.offset.apply(ts).unwrap_or(ts))
            .and_then(|ts| Utc.timestamp_opt(ts.as_secs() as i64, ts.subsec_nanos()).single())
            .unwrap_or_else(Utc::now)
    }

    pub fn name(&self) -> PathBuf {
        let dir = self.source.parent().unwrap_or_else(|| Path::new(""));
        let stem = self.source.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let prefix = self.prefix.as_deref().unwrap_or(&stem);

        let mut file_name = format!("{prefix}_{}", self.reference_time().format(NAME_TIME_FORMAT));
        if let Some(ext) = self.source.extension() {
            file_name.push('.');
            file_name.push_str(&ext.to_string_lossy());
        }

        dir.join(file_name)
    }
}
