//! The density lookup facade.
//!
//! `DensityDb` wires the pieces together: validate the query, resolve its
//! target instant against the catalog, load the snapshot(s), interpolate
//! spatially, and combine. One call answers one 4-D point; nothing is
//! cached between calls.

use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use wamdens_types::point::QueryPoint;

use crate::builder::DensityDbBuilder;
use crate::catalog::{SnapshotCatalog, SnapshotRef};
use crate::config::Config;
use crate::error::Result;
use crate::resolver::{Resolution, WindowResolver};
use crate::validate::validate_query_point;

/// Density lookup over a snapshot catalog.
///
/// # Examples
///
/// ```rust,no_run
/// use wamdens::{DensityDb, QueryPoint};
/// use chrono::NaiveDateTime;
///
/// # fn main() -> Result<(), wamdens::WamdensError> {
/// let db = DensityDb::open_dir("/data/wam")?;
///
/// let start: NaiveDateTime = "2023-05-12T16:00:00".parse().unwrap();
/// let density = db.density_at(start, &QueryPoint::new(85.3, 150.0, 45.0, 195.0))?;
/// println!("{density:e} kg/m^3");
/// # Ok(())
/// # }
/// ```
pub struct DensityDb {
    pub(crate) catalog: Box<dyn SnapshotCatalog>,
    pub(crate) config: Config,
}

impl std::fmt::Debug for DensityDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DensityDb")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DensityDb {
    /// Start building a lookup with explicit backend and configuration.
    pub fn builder() -> DensityDbBuilder {
        DensityDbBuilder::new()
    }

    /// Open a lookup over a directory of per-window snapshot files with the
    /// default configuration.
    pub fn open_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::builder().data_dir(dir.as_ref()).build()
    }

    /// Open a lookup over a single multi-day archive file with the default
    /// configuration.
    pub fn open_archive<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().archive_file(path.as_ref()).build()
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a target instant without loading any data.
    pub fn resolve(&self, target: NaiveDateTime) -> Result<Resolution> {
        WindowResolver::new(self.catalog.as_ref(), &self.config).resolve(target)
    }

    /// Resolve the density at one 4-D point.
    ///
    /// `start_time` anchors the query's epoch offset. Inputs are validated
    /// before any I/O. An exact-window target uses one snapshot; a
    /// bracketed target loads both neighbors, interpolates each at the same
    /// spatial point, and combines with an unweighted mean, deliberately
    /// independent of where the target falls between the two boundaries.
    pub fn density_at(&self, start_time: NaiveDateTime, query: &QueryPoint) -> Result<f64> {
        validate_query_point(query)?;

        let offset = Duration::nanoseconds((query.epoch_minutes * 60e9).round() as i64);
        let target = start_time + offset;

        let density = match self.resolve(target)? {
            Resolution::Exact(snapshot) => {
                log::debug!("target {} hit window {}", target, snapshot.label);
                self.interpolate_one(&snapshot, query)?
            }
            Resolution::Bracketed { lower, upper } => {
                log::debug!(
                    "target {} bracketed by windows {} and {}",
                    target,
                    lower.label,
                    upper.label
                );
                let below = self.interpolate_one(&lower, query)?;
                let above = self.interpolate_one(&upper, query)?;
                (below + above) / 2.0
            }
        };

        if !density.is_finite() || density < 0.0 {
            log::warn!(
                "suspicious density {} at (h={} km, lat={}, lon={})",
                density,
                query.height_km,
                query.latitude_deg,
                query.longitude_deg
            );
        }

        Ok(density)
    }

    /// Load one snapshot, build its interpolant, and evaluate the query's
    /// spatial point. Everything loaded here is dropped before returning.
    fn interpolate_one(&self, snapshot: &SnapshotRef, query: &QueryPoint) -> Result<f64> {
        let grid = self
            .catalog
            .load(snapshot)?
            .into_interpolant(self.config.extrapolation)?;
        grid.interpolate(query.height_km, query.latitude_deg, query.longitude_deg)
    }
}
