use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::report::VisitReport;

/// Storage key the browser front-end historically kept the report under.
/// The autosave snapshot reuses it as its on-disk name.
pub const STORAGE_KEY: &str = "rssVisitReport";

lazy_static! {
    static ref REPORT_NAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Whether `name` is acceptable as an on-disk report name: letters, digits,
/// `-` and `_` only, so a saved name can never escape the data directory.
pub fn is_valid_report_name(name: &str) -> bool {
    REPORT_NAME_REGEX.is_match(name)
}

/// Where a named report snapshot lives under the data directory.
pub fn report_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.bin.gz", name))
}

pub fn save_report(report: &VisitReport, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = std::io::BufWriter::new(encoder);

    serialize_into(&mut writer, report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    log::debug!("saved report snapshot to {}", path.display());
    Ok(())
}

pub fn load_report(path: &Path) -> std::io::Result<VisitReport> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(file);
    let mut reader = std::io::BufReader::new(decoder);

    let report: VisitReport = deserialize_from(&mut reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    log::debug!("loaded report snapshot from {}", path.display());
    Ok(report)
}

/// Serialize a report into the same gzip format `save_report` writes, but
/// into memory, for handing the snapshot to the browser as a download.
pub fn snapshot_to_bytes(report: &VisitReport) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());

    serialize_into(&mut encoder, report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    encoder.finish()
}

/// Rebuild a report from snapshot bytes uploaded by the browser.
pub fn snapshot_from_bytes(bytes: &[u8]) -> std::io::Result<VisitReport> {
    let decoder = GzDecoder::new(Cursor::new(bytes));
    let mut reader = std::io::BufReader::new(decoder);

    let report: VisitReport = deserialize_from(&mut reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(report)
}
