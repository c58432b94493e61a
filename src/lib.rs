//! Atmospheric mass-density lookup over time-gridded model snapshots.
//!
//! Given a scenario start time and an epoch offset, wamdens finds the
//! snapshot file(s) whose time windows cover or bracket the requested
//! instant, interpolates each density grid trilinearly at the requested
//! (height, latitude, longitude), and combines the results into a single
//! estimate.
//!
//! ```rust,no_run
//! use wamdens::{DensityDb, QueryPoint};
//! use chrono::NaiveDateTime;
//!
//! let db = DensityDb::open_dir("/data/wam")?;
//!
//! let start: NaiveDateTime = "2023-05-12T16:00:00".parse().unwrap();
//! let query = QueryPoint::new(5.0, 150.0, 45.0, 195.0);
//! let density = db.density_at(start, &query)?;
//! # Ok::<(), wamdens::WamdensError>(())
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod interp;
pub mod resolver;
pub mod snapshot;
pub mod validate;

pub use builder::DensityDbBuilder;
pub use db::DensityDb;
pub use error::{Result, WamdensError};

pub type Wamdens = DensityDb;

pub use config::{Config, ExtrapolationPolicy};

pub use catalog::{ArchiveCatalog, DirectoryCatalog, SnapshotCatalog, SnapshotRef, SnapshotSource};

pub use interp::Grid3;

pub use resolver::{Resolution, WindowResolver};

pub use snapshot::Snapshot;

pub use wamdens_types::label::TimeLabel;
pub use wamdens_types::point::QueryPoint;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{DensityDb, DensityDbBuilder, Result, Wamdens, WamdensError};

    pub use crate::{Config, ExtrapolationPolicy};

    pub use crate::{QueryPoint, TimeLabel};

    pub use crate::{Resolution, SnapshotCatalog};

    pub use chrono::NaiveDateTime;
}
