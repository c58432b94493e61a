//! Lookup builder for flexible configuration.
//!
//! The storage location is always an explicit parameter here: there is no
//! default directory and no process-wide state. Setting one backend clears
//! the other, so the last selection wins.

use std::path::PathBuf;

use crate::catalog::{ArchiveCatalog, DirectoryCatalog, SnapshotCatalog};
use crate::config::{Config, ExtrapolationPolicy};
use crate::db::DensityDb;
use crate::error::{Result, WamdensError};

/// Builder for [`DensityDb`] with backend selection and settings.
#[derive(Debug)]
pub struct DensityDbBuilder {
    data_dir: Option<PathBuf>,
    archive_file: Option<PathBuf>,
    config: Config,
}

impl DensityDbBuilder {
    /// Create a builder with the default configuration and no backend.
    pub fn new() -> Self {
        Self {
            data_dir: None,
            archive_file: None,
            config: Config::default(),
        }
    }

    /// Select the directory backend: one snapshot file per time window
    /// under `dir`.
    pub fn data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = Some(dir.into());
        self.archive_file = None;
        self
    }

    /// Select the archive backend: a single multi-day file with an in-file
    /// block index.
    pub fn archive_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.archive_file = Some(path.into());
        self.data_dir = None;
        self
    }

    /// Set the lookup configuration (granularity, search cap, policy).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the out-of-hull policy without replacing the whole configuration.
    pub fn extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.config = self.config.with_extrapolation(policy);
        self
    }

    /// Build the lookup. Validates the configuration and opens the selected
    /// backend.
    pub fn build(self) -> Result<DensityDb> {
        self.config.validate()?;

        let catalog: Box<dyn SnapshotCatalog> = match (self.data_dir, self.archive_file) {
            (Some(dir), None) => {
                if !dir.is_dir() {
                    return Err(WamdensError::Config(format!(
                        "data_dir {} is not a directory",
                        dir.display()
                    )));
                }
                Box::new(DirectoryCatalog::new(dir))
            }
            (None, Some(path)) => Box::new(ArchiveCatalog::open(
                path,
                self.config.granularity_minutes,
            )?),
            _ => {
                return Err(WamdensError::Config(
                    "a storage location is required: set data_dir or archive_file".to_string(),
                ));
            }
        };

        Ok(DensityDb {
            catalog,
            config: self.config,
        })
    }
}

impl Default for DensityDbBuilder {
    fn default() -> Self {
        Self::new()
    }
}
