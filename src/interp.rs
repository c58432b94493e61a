//! Trilinear interpolation over a rectilinear (height, lat, lon) grid.
//!
//! This is the spatial half of a density lookup: given one snapshot's
//! coordinate axes and density field, build an interpolant and evaluate it at
//! a single point. Interpolation is piecewise-linear along each axis
//! independently; the interpolant is cheap to construct and is discarded
//! after one evaluation.

use ndarray::Array3;

use crate::config::ExtrapolationPolicy;
use crate::error::{Result, WamdensError};

/// A piecewise-trilinear interpolant over a rectilinear 3-D grid.
///
/// Axes must be strictly ascending with at least two points each, and the
/// value array's shape must equal `(heights, lats, lons)` lengths. Queries
/// outside the grid hull follow the configured [`ExtrapolationPolicy`]:
/// the default refuses to extrapolate.
///
/// # Examples
///
/// ```rust
/// use ndarray::Array3;
/// use wamdens::interp::Grid3;
///
/// // A 2x2x2 grid that doubles along the height axis
/// let values = Array3::from_shape_fn((2, 2, 2), |(i, _, _)| 1.0 + i as f64);
/// let grid = Grid3::new(
///     vec![100.0, 200.0],
///     vec![-45.0, 45.0],
///     vec![0.0, 180.0],
///     values,
/// ).unwrap();
///
/// let mid = grid.interpolate(150.0, 0.0, 90.0).unwrap();
/// assert!((mid - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Grid3 {
    heights: Vec<f64>,
    lats: Vec<f64>,
    lons: Vec<f64>,
    values: Array3<f64>,
    policy: ExtrapolationPolicy,
}

impl Grid3 {
    /// Build an interpolant, validating the grid contract.
    ///
    /// Extrapolation defaults to [`ExtrapolationPolicy::Deny`]; use
    /// [`Grid3::with_policy`] to opt into edge clamping.
    pub fn new(
        heights: Vec<f64>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        values: Array3<f64>,
    ) -> Result<Self> {
        check_axis("hlevs", &heights)?;
        check_axis("lat", &lats)?;
        check_axis("lon", &lons)?;

        let expected = (heights.len(), lats.len(), lons.len());
        if values.dim() != expected {
            return Err(WamdensError::MalformedSnapshot(format!(
                "field shape {:?} does not match axis lengths {:?}",
                values.dim(),
                expected
            )));
        }

        Ok(Self {
            heights,
            lats,
            lons,
            values,
            policy: ExtrapolationPolicy::default(),
        })
    }

    /// Set the out-of-hull policy.
    pub fn with_policy(mut self, policy: ExtrapolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Evaluate the interpolant at one point.
    ///
    /// Points exactly on the hull boundary are in-domain. Points outside it
    /// produce `OutOfDomain` under the default policy, or are clamped to the
    /// nearest hull face under `ClampToEdge`.
    pub fn interpolate(&self, height_km: f64, lat_deg: f64, lon_deg: f64) -> Result<f64> {
        let (i, th) = self.locate("hlevs", &self.heights, height_km)?;
        let (j, tlat) = self.locate("lat", &self.lats, lat_deg)?;
        let (k, tlon) = self.locate("lon", &self.lons, lon_deg)?;

        let mut acc = 0.0;
        for (di, wi) in [(0, 1.0 - th), (1, th)] {
            for (dj, wj) in [(0, 1.0 - tlat), (1, tlat)] {
                for (dk, wk) in [(0, 1.0 - tlon), (1, tlon)] {
                    acc += wi * wj * wk * self.values[[i + di, j + dj, k + dk]];
                }
            }
        }
        Ok(acc)
    }

    /// Locate the grid cell containing `x` along one axis.
    ///
    /// Returns the lower cell index and the fractional position within the
    /// cell, after applying the extrapolation policy to out-of-range values.
    fn locate(&self, name: &str, axis: &[f64], x: f64) -> Result<(usize, f64)> {
        if !x.is_finite() {
            return Err(WamdensError::InvalidInput(format!(
                "{} coordinate must be finite, got {}",
                name, x
            )));
        }

        let n = axis.len();
        let (first, last) = (axis[0], axis[n - 1]);

        let x = if x < first || x > last {
            match self.policy {
                ExtrapolationPolicy::Deny => {
                    return Err(WamdensError::OutOfDomain(format!(
                        "{}={} outside grid range [{}, {}]",
                        name, x, first, last
                    )));
                }
                ExtrapolationPolicy::ClampToEdge => x.clamp(first, last),
            }
        } else {
            x
        };

        // First index whose axis value exceeds x, pulled back to a valid
        // lower cell corner. x == last lands in the top cell with t == 1.
        let i = axis.partition_point(|&v| v <= x).saturating_sub(1).min(n - 2);
        let t = (x - axis[i]) / (axis[i + 1] - axis[i]);
        Ok((i, t))
    }
}

/// Validate one coordinate axis: at least two points, strictly ascending.
fn check_axis(name: &str, axis: &[f64]) -> Result<()> {
    if axis.len() < 2 {
        return Err(WamdensError::MalformedSnapshot(format!(
            "axis {} needs at least 2 points, got {}",
            name,
            axis.len()
        )));
    }
    for pair in axis.windows(2) {
        if !(pair[0] < pair[1]) {
            return Err(WamdensError::MalformedSnapshot(format!(
                "axis {} is not strictly ascending at {} -> {}",
                name, pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_grid() -> Grid3 {
        // f(h, lat, lon) = h + 2*lat + 3*lon on axis indices, which a
        // trilinear interpolant reproduces exactly
        let heights = vec![100.0, 150.0, 200.0];
        let lats = vec![-30.0, 0.0, 30.0];
        let lons = vec![0.0, 120.0, 240.0];
        let values = Array3::from_shape_fn((3, 3, 3), |(i, j, k)| {
            heights[i] + 2.0 * lats[j] + 3.0 * lons[k]
        });
        Grid3::new(heights, lats, lons, values).unwrap()
    }

    #[test]
    fn test_agrees_with_manual_trilinear() {
        let grid = sample_grid();

        // Linear fields are interpolated exactly
        let v = grid.interpolate(125.0, 15.0, 60.0).unwrap();
        assert_relative_eq!(v, 125.0 + 2.0 * 15.0 + 3.0 * 60.0, max_relative = 1e-12);

        // And a hand-computed corner mix in one cell
        let v = grid.interpolate(110.0, -30.0, 0.0).unwrap();
        assert_relative_eq!(v, 110.0 + 2.0 * -30.0, max_relative = 1e-12);
    }

    #[test]
    fn test_grid_nodes_are_reproduced() {
        let grid = sample_grid();
        let v = grid.interpolate(150.0, 0.0, 120.0).unwrap();
        assert_relative_eq!(v, 150.0 + 360.0, max_relative = 1e-12);
    }

    #[test]
    fn test_hull_boundary_is_in_domain() {
        let grid = sample_grid();
        assert!(grid.interpolate(100.0, -30.0, 0.0).is_ok());
        assert!(grid.interpolate(200.0, 30.0, 240.0).is_ok());
    }

    #[test]
    fn test_out_of_domain_is_refused() {
        let grid = sample_grid();
        let err = grid.interpolate(99.9, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, WamdensError::OutOfDomain(_)));

        let err = grid.interpolate(150.0, 0.0, 300.0).unwrap_err();
        assert!(matches!(err, WamdensError::OutOfDomain(_)));
    }

    #[test]
    fn test_clamp_to_edge_policy() {
        let grid = sample_grid().with_policy(ExtrapolationPolicy::ClampToEdge);

        // Below the bottom height level clamps to the bottom face
        let clamped = grid.interpolate(50.0, 0.0, 0.0).unwrap();
        let edge = grid.interpolate(100.0, 0.0, 0.0).unwrap();
        assert_relative_eq!(clamped, edge, max_relative = 1e-12);
    }

    #[test]
    fn test_non_finite_query_is_invalid_input() {
        let grid = sample_grid();
        let err = grid.interpolate(f64::NAN, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, WamdensError::InvalidInput(_)));
    }

    #[test]
    fn test_constant_field() {
        let values = Array3::from_elem((2, 2, 2), 1.2);
        let grid = Grid3::new(
            vec![90.0, 800.0],
            vec![-90.0, 90.0],
            vec![0.0, 360.0],
            values,
        )
        .unwrap();
        assert_relative_eq!(grid.interpolate(150.0, 45.0, 195.0).unwrap(), 1.2);
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let values = Array3::from_elem((2, 2, 3), 0.0);
        let err = Grid3::new(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            values,
        )
        .unwrap_err();
        assert!(matches!(err, WamdensError::MalformedSnapshot(_)));
    }

    #[test]
    fn test_rejects_non_monotonic_axis() {
        let values = Array3::from_elem((3, 2, 2), 0.0);
        let err = Grid3::new(
            vec![1.0, 3.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            values,
        )
        .unwrap_err();
        assert!(matches!(err, WamdensError::MalformedSnapshot(_)));

        // Repeated values are not strictly ascending either
        let values = Array3::from_elem((2, 2, 2), 0.0);
        let err = Grid3::new(
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            values,
        )
        .unwrap_err();
        assert!(matches!(err, WamdensError::MalformedSnapshot(_)));
    }

    #[test]
    fn test_rejects_short_axis() {
        let values = Array3::from_elem((1, 2, 2), 0.0);
        let err = Grid3::new(vec![1.0], vec![1.0, 2.0], vec![1.0, 2.0], values).unwrap_err();
        assert!(matches!(err, WamdensError::MalformedSnapshot(_)));
    }
}
