//! Validation for query inputs.
//!
//! Everything here runs before any I/O: a query that fails validation never
//! touches the catalog.

use wamdens_types::point::QueryPoint;

use crate::error::{Result, WamdensError};

/// Validates a query point's four components.
///
/// Epoch offset must be non-negative; latitude within [-90, 90]; longitude
/// within [0, 360); all components finite. Height is only required to be
/// finite, since the grid hull governs its physical range.
///
/// # Examples
///
/// ```
/// use wamdens::validate::validate_query_point;
/// use wamdens_types::point::QueryPoint;
///
/// let valid = QueryPoint::new(5.0, 150.0, 45.0, 195.0);
/// assert!(validate_query_point(&valid).is_ok());
///
/// // Negative epoch offset
/// let invalid = QueryPoint::new(-1.0, 150.0, 45.0, 195.0);
/// assert!(validate_query_point(&invalid).is_err());
///
/// // Latitude out of range
/// let invalid = QueryPoint::new(5.0, 150.0, 95.0, 195.0);
/// assert!(validate_query_point(&invalid).is_err());
/// ```
pub fn validate_query_point(query: &QueryPoint) -> Result<()> {
    for (name, value) in [
        ("epoch_minutes", query.epoch_minutes),
        ("height_km", query.height_km),
        ("latitude_deg", query.latitude_deg),
        ("longitude_deg", query.longitude_deg),
    ] {
        if !value.is_finite() {
            return Err(WamdensError::InvalidInput(format!(
                "{} must be finite, got: {}",
                name, value
            )));
        }
    }

    if query.epoch_minutes < 0.0 {
        return Err(WamdensError::InvalidInput(format!(
            "epoch_minutes must be non-negative, got: {}",
            query.epoch_minutes
        )));
    }

    if !(-90.0..=90.0).contains(&query.latitude_deg) {
        return Err(WamdensError::InvalidInput(format!(
            "latitude_deg out of range [-90.0, 90.0]: {}",
            query.latitude_deg
        )));
    }

    if !(0.0..360.0).contains(&query.longitude_deg) {
        return Err(WamdensError::InvalidInput(format!(
            "longitude_deg out of range [0.0, 360.0): {}",
            query.longitude_deg
        )));
    }

    Ok(())
}
