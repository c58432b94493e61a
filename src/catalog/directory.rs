//! Directory-scan catalog backend: one NetCDF file per time window.

use std::path::{Path, PathBuf};

use wamdens_types::label::TimeLabel;

use crate::catalog::{SnapshotCatalog, SnapshotRef, SnapshotSource};
use crate::error::{Result, WamdensError};
use crate::snapshot::Snapshot;

/// Catalog over a directory of per-window snapshot files.
///
/// Membership is decided by file name: a file belongs to label `L` when its
/// name contains `L`'s canonical `YYYYMMDD_HHMM00` string. The directory is
/// re-listed on every probe, so files added between invocations are seen
/// without any cache invalidation.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    /// Create a catalog over `dir`.
    ///
    /// The directory is not touched until the first probe.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this catalog scans.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List snapshot file names in the directory, sorted for determinism.
    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

impl SnapshotCatalog for DirectoryCatalog {
    fn find(&self, label: &TimeLabel) -> Result<Option<SnapshotRef>> {
        let pattern = label.to_string();
        let matches: Vec<String> = self
            .list()?
            .into_iter()
            .filter(|name| name.contains(&pattern))
            .collect();

        if matches.len() > 1 {
            log::warn!(
                "{} files match label {} in {}, using {}",
                matches.len(),
                pattern,
                self.dir.display(),
                matches[0]
            );
        }

        Ok(matches.into_iter().next().map(|name| SnapshotRef {
            label: *label,
            source: SnapshotSource::File(self.dir.join(name)),
        }))
    }

    fn bounds(&self) -> Result<Option<(TimeLabel, TimeLabel)>> {
        let mut earliest: Option<TimeLabel> = None;
        let mut latest: Option<TimeLabel> = None;

        for name in self.list()? {
            if let Some(label) = extract_label(&name) {
                earliest = Some(earliest.map_or(label, |e| e.min(label)));
                latest = Some(latest.map_or(label, |l| l.max(label)));
            }
        }

        Ok(earliest.zip(latest))
    }

    fn load(&self, snapshot: &SnapshotRef) -> Result<Snapshot> {
        match &snapshot.source {
            SnapshotSource::File(path) => Snapshot::from_file(path),
            other => Err(WamdensError::MalformedSnapshot(format!(
                "directory catalog cannot load {:?}",
                other
            ))),
        }
    }
}

/// Pull the first `YYYYMMDD_HHMM00`-shaped substring out of a file name.
fn extract_label(name: &str) -> Option<TimeLabel> {
    for (i, _) in name.match_indices('_') {
        let Some(window) = i.checked_sub(8).and_then(|start| name.get(start..i + 7)) else {
            continue;
        };
        let bytes = window.as_bytes();
        let digits_ok = bytes[..8].iter().all(u8::is_ascii_digit)
            && bytes[9..].iter().all(u8::is_ascii_digit);
        if digits_ok {
            if let Ok(label) = TimeLabel::parse(window) {
                return Some(label);
            }
        }
    }
    None
}
