//! Indexed-block catalog backend: a single multi-day archive file.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use wamdens_types::label::TimeLabel;

use crate::catalog::{SnapshotCatalog, SnapshotRef, SnapshotSource};
use crate::error::{Result, WamdensError};
use crate::snapshot::Snapshot;

/// Catalog over one archive file whose leading `time` dimension indexes
/// fixed-granularity blocks.
///
/// The archive's first block starts at midnight of the day embedded as an
/// 8-digit `YYYYMMDD` substring in the file name (the WAM daily-file
/// nomenclature, e.g. `WAM_den_20211102.nc`). Block `b` covers the window
/// starting `b * granularity` minutes after midnight. The block count is
/// read from the file on every probe, never cached.
#[derive(Debug, Clone)]
pub struct ArchiveCatalog {
    path: PathBuf,
    day_start: NaiveDateTime,
    granularity_minutes: u32,
}

impl ArchiveCatalog {
    /// Open a catalog over the archive at `path`.
    ///
    /// Fails if the file does not exist or its name carries no `YYYYMMDD`
    /// day to anchor the block index to.
    pub fn open<P: Into<PathBuf>>(path: P, granularity_minutes: u32) -> Result<Self> {
        let path = path.into();
        std::fs::metadata(&path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let day = extract_day(name).ok_or_else(|| {
            WamdensError::Config(format!(
                "archive file name {:?} carries no YYYYMMDD day to anchor its block index",
                name
            ))
        })?;

        Ok(Self {
            path,
            day_start: day.and_hms_opt(0, 0, 0).expect("midnight is a valid time"),
            granularity_minutes,
        })
    }

    /// The archive file this catalog reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Map a label to its block index, if it lies on this archive's grid.
    fn block_of(&self, label: &TimeLabel) -> Option<i64> {
        let minutes = (label.datetime() - self.day_start).num_minutes();
        if minutes < 0 || minutes % i64::from(self.granularity_minutes) != 0 {
            return None;
        }
        Some(minutes / i64::from(self.granularity_minutes))
    }
}

impl SnapshotCatalog for ArchiveCatalog {
    fn find(&self, label: &TimeLabel) -> Result<Option<SnapshotRef>> {
        let Some(block) = self.block_of(label) else {
            return Ok(None);
        };

        let count = Snapshot::archive_block_count(&self.path)? as i64;
        if block >= count {
            return Ok(None);
        }

        Ok(Some(SnapshotRef {
            label: *label,
            source: SnapshotSource::ArchiveBlock {
                path: self.path.clone(),
                block: block as usize,
            },
        }))
    }

    fn bounds(&self) -> Result<Option<(TimeLabel, TimeLabel)>> {
        let count = Snapshot::archive_block_count(&self.path)? as i64;
        if count == 0 {
            return Ok(None);
        }

        let earliest = TimeLabel::from_datetime(self.day_start);
        let latest = earliest.step(count - 1, self.granularity_minutes);
        Ok(Some((earliest, latest)))
    }

    fn load(&self, snapshot: &SnapshotRef) -> Result<Snapshot> {
        match &snapshot.source {
            SnapshotSource::ArchiveBlock { path, block } => {
                Snapshot::from_archive_block(path, *block)
            }
            other => Err(WamdensError::MalformedSnapshot(format!(
                "archive catalog cannot load {:?}",
                other
            ))),
        }
    }
}

/// Pull the first standalone 8-digit `YYYYMMDD` run out of a file name.
fn extract_day(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    let n = bytes.len();
    for start in 0..n.saturating_sub(7) {
        let run_ok = bytes[start..start + 8].iter().all(u8::is_ascii_digit)
            && (start == 0 || !bytes[start - 1].is_ascii_digit())
            && (start + 8 == n || !bytes[start + 8].is_ascii_digit());
        if run_ok {
            if let Some(window) = name.get(start..start + 8) {
                if let Ok(day) = NaiveDate::parse_from_str(window, "%Y%m%d") {
                    return Some(day);
                }
            }
        }
    }
    None
}
