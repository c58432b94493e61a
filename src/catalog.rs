//! Snapshot catalog abstraction.
//!
//! A catalog is the set of snapshots available to a lookup, keyed by the
//! time label each snapshot embeds. This module provides a trait-based
//! abstraction over catalog backends, allowing the same resolver to run
//! against a directory of per-window files or a single multi-day archive
//! with an in-file block index.
//!
//! Membership is queried, never cached: every probe re-inspects the backing
//! store, so a catalog that grows while a scenario runs is picked up by the
//! next invocation.

use std::path::PathBuf;

use wamdens_types::label::TimeLabel;

use crate::error::Result;
use crate::snapshot::Snapshot;

mod archive;
mod directory;

pub use archive::ArchiveCatalog;
pub use directory::DirectoryCatalog;

/// Trait for snapshot catalog backends.
pub trait SnapshotCatalog {
    /// Probe for a snapshot whose time label matches `label` exactly.
    fn find(&self, label: &TimeLabel) -> Result<Option<SnapshotRef>>;

    /// The earliest and latest labels present, or `None` for an empty
    /// catalog. Used by the resolver to fail fast instead of stepping past
    /// the catalog's edges.
    fn bounds(&self) -> Result<Option<(TimeLabel, TimeLabel)>>;

    /// Load the snapshot a reference points at.
    ///
    /// The backing file handle is scoped to this call; only the in-memory
    /// arrays survive it.
    fn load(&self, snapshot: &SnapshotRef) -> Result<Snapshot>;
}

/// Handle to one snapshot inside a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    /// The window-start label the snapshot embeds.
    pub label: TimeLabel,
    /// Where the snapshot's data lives.
    pub source: SnapshotSource,
}

/// Backend-specific location of a snapshot's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// A per-window file holding exactly this snapshot.
    File(PathBuf),
    /// One time block inside a multi-day archive file.
    ArchiveBlock { path: PathBuf, block: usize },
}
