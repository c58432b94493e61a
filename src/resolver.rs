//! Time-window resolution: map a target instant to the snapshot(s) that
//! answer it.
//!
//! A target that falls on a catalog window boundary resolves to a single
//! snapshot (the exact-window case). Any other target resolves to the pair
//! of snapshots bracketing it, found by stepping outward from the rounded
//! candidates one granularity interval at a time. Both directions share one
//! bounded search: a hard iteration cap plus a catalog-bounds check
//! guarantee termination, turning a missing snapshot into a typed
//! `CatalogExhausted` error instead of an unbounded scan.

use chrono::NaiveDateTime;
use wamdens_types::label::TimeLabel;

use crate::catalog::{SnapshotCatalog, SnapshotRef};
use crate::config::Config;
use crate::error::{Result, WamdensError};

/// Outcome of resolving a target instant against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target coincides with a window boundary; one snapshot answers it.
    Exact(SnapshotRef),
    /// The target lies strictly between two boundaries; both neighbors are
    /// needed.
    Bracketed {
        lower: SnapshotRef,
        upper: SnapshotRef,
    },
}

/// Direction of the outward stepping search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchDirection {
    Backward,
    Forward,
}

/// Resolves target instants to snapshot references.
pub struct WindowResolver<'a> {
    catalog: &'a dyn SnapshotCatalog,
    granularity_minutes: u32,
    max_steps: usize,
}

impl<'a> WindowResolver<'a> {
    /// Create a resolver over `catalog` with the given lookup configuration.
    pub fn new(catalog: &'a dyn SnapshotCatalog, config: &Config) -> Self {
        Self {
            catalog,
            granularity_minutes: config.granularity_minutes,
            max_steps: config.max_search_steps,
        }
    }

    /// Resolve `target` to the exact snapshot or the bracketing pair.
    pub fn resolve(&self, target: NaiveDateTime) -> Result<Resolution> {
        let probe = TimeLabel::from_datetime(target);
        if let Some(snapshot) = self.catalog.find(&probe)? {
            return Ok(Resolution::Exact(snapshot));
        }

        let Some(bounds) = self.catalog.bounds()? else {
            return Err(WamdensError::CatalogExhausted(
                "catalog holds no snapshots".to_string(),
            ));
        };

        // The lower candidate is the probe rounded down to the grid; the
        // upper candidate is always one interval above it, so an aligned
        // probe with a missing file still brackets around the gap.
        let lower_start = probe.floor_to(self.granularity_minutes);
        let upper_start = lower_start.step(1, self.granularity_minutes);

        let lower = self.search(lower_start, SearchDirection::Backward, bounds)?;
        let upper = self.search(upper_start, SearchDirection::Forward, bounds)?;
        Ok(Resolution::Bracketed { lower, upper })
    }

    /// Step outward from `start` until a snapshot is found.
    ///
    /// Terminates with `CatalogExhausted` when the candidate leaves the
    /// catalog's time bounds or the step cap is spent.
    fn search(
        &self,
        start: TimeLabel,
        direction: SearchDirection,
        (earliest, latest): (TimeLabel, TimeLabel),
    ) -> Result<SnapshotRef> {
        let step = match direction {
            SearchDirection::Backward => -1,
            SearchDirection::Forward => 1,
        };

        let mut candidate = start;
        for _ in 0..=self.max_steps {
            let out_of_bounds = match direction {
                SearchDirection::Backward => candidate < earliest,
                SearchDirection::Forward => candidate > latest,
            };
            if out_of_bounds {
                return Err(WamdensError::CatalogExhausted(format!(
                    "no snapshot {} {} within catalog bounds [{}, {}]",
                    match direction {
                        SearchDirection::Backward => "at or before",
                        SearchDirection::Forward => "at or after",
                    },
                    start,
                    earliest,
                    latest
                )));
            }

            if let Some(snapshot) = self.catalog.find(&candidate)? {
                return Ok(snapshot);
            }
            candidate = candidate.step(step, self.granularity_minutes);
        }

        Err(WamdensError::CatalogExhausted(format!(
            "no snapshot within {} steps {} of {}",
            self.max_steps,
            match direction {
                SearchDirection::Backward => "backward",
                SearchDirection::Forward => "forward",
            },
            start
        )))
    }
}
