//! Snapshot loading from NetCDF model output.
//!
//! A snapshot is one discrete-time gridded density field together with its
//! coordinate axes. Files follow the WAM output convention: variables `den`
//! (density, kg/m^3), `hlevs` (height levels, km), `lat` (degrees, ascending
//! from -90) and `lon` (degrees, ascending from 0). The density field is
//! either 3-D or 4-D with a leading time dimension. WAM height levels start
//! near the model's nominal 90 km floor; the grid hull, not a constant,
//! decides what is in range.
//!
//! Snapshots are loaded read-only on demand; the NetCDF handle is dropped as
//! soon as the in-memory arrays are built, on success and failure alike.

use std::path::Path;

use ndarray::Array3;

use crate::config::ExtrapolationPolicy;
use crate::error::{Result, WamdensError};
use crate::interp::Grid3;

/// Name of the density variable.
pub const DENSITY_VAR: &str = "den";
/// Name of the height-level axis variable.
pub const HEIGHT_VAR: &str = "hlevs";
/// Name of the latitude axis variable.
pub const LAT_VAR: &str = "lat";
/// Name of the longitude axis variable.
pub const LON_VAR: &str = "lon";

/// One discrete-time 3-D gridded density field, loaded into memory.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Height levels in km, ascending.
    pub heights: Vec<f64>,
    /// Latitudes in degrees, ascending.
    pub lats: Vec<f64>,
    /// Longitudes in degrees, ascending.
    pub lons: Vec<f64>,
    /// Density in kg/m^3, indexed by (height, lat, lon).
    pub density: Array3<f64>,
}

impl Snapshot {
    /// Load a per-window snapshot file.
    ///
    /// Accepts a 3-D density field or a 4-D field whose time dimension has
    /// exactly one block (squeezed on read).
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = netcdf::open(path)?;

        let heights = read_axis(&file, HEIGHT_VAR)?;
        let lats = read_axis(&file, LAT_VAR)?;
        let lons = read_axis(&file, LON_VAR)?;

        let var = density_variable(&file)?;
        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let (raw, shape) = match dims.as_slice() {
            [time, nh, nlat, nlon] => {
                if *time != 1 {
                    return Err(WamdensError::MalformedSnapshot(format!(
                        "{}: expected a single time block, found {}",
                        path.display(),
                        time
                    )));
                }
                (
                    var.get_values::<f64, _>((0, .., .., ..))?,
                    (*nh, *nlat, *nlon),
                )
            }
            [nh, nlat, nlon] => (var.get_values::<f64, _>(..)?, (*nh, *nlat, *nlon)),
            other => {
                return Err(WamdensError::MalformedSnapshot(format!(
                    "{}: density field has {} dimensions, expected 3 or 4",
                    path.display(),
                    other.len()
                )));
            }
        };

        Self::assemble(path, heights, lats, lons, raw, shape)
    }

    /// Load one time block out of a multi-day archive file.
    ///
    /// The archive's density field must be 4-D with the time dimension
    /// leading; `block` selects the window.
    pub fn from_archive_block(path: &Path, block: usize) -> Result<Self> {
        let file = netcdf::open(path)?;

        let heights = read_axis(&file, HEIGHT_VAR)?;
        let lats = read_axis(&file, LAT_VAR)?;
        let lons = read_axis(&file, LON_VAR)?;

        let var = density_variable(&file)?;
        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let [time, nh, nlat, nlon] = dims.as_slice() else {
            return Err(WamdensError::MalformedSnapshot(format!(
                "{}: archive density field has {} dimensions, expected 4",
                path.display(),
                dims.len()
            )));
        };
        if block >= *time {
            return Err(WamdensError::MalformedSnapshot(format!(
                "{}: time block {} outside archive time dimension of length {}",
                path.display(),
                block,
                time
            )));
        }

        let raw = var.get_values::<f64, _>((block, .., .., ..))?;
        Self::assemble(path, heights, lats, lons, raw, (*nh, *nlat, *nlon))
    }

    /// Number of time blocks the archive at `path` holds.
    pub fn archive_block_count(path: &Path) -> Result<usize> {
        let file = netcdf::open(path)?;
        let var = density_variable(&file)?;
        let dims = var.dimensions();
        if dims.len() != 4 {
            return Err(WamdensError::MalformedSnapshot(format!(
                "{}: archive density field has {} dimensions, expected 4",
                path.display(),
                dims.len()
            )));
        }
        Ok(dims[0].len())
    }

    /// Build the spatial interpolant for this snapshot.
    ///
    /// Consumes the snapshot: the interpolant owns the arrays and is itself
    /// discarded after one evaluation.
    pub fn into_interpolant(self, policy: ExtrapolationPolicy) -> Result<Grid3> {
        Ok(Grid3::new(self.heights, self.lats, self.lons, self.density)?.with_policy(policy))
    }

    fn assemble(
        path: &Path,
        heights: Vec<f64>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        raw: Vec<f64>,
        shape: (usize, usize, usize),
    ) -> Result<Self> {
        let density = Array3::from_shape_vec(shape, raw).map_err(|e| {
            WamdensError::MalformedSnapshot(format!("{}: {}", path.display(), e))
        })?;

        let expected = (heights.len(), lats.len(), lons.len());
        if density.dim() != expected {
            return Err(WamdensError::MalformedSnapshot(format!(
                "{}: field shape {:?} does not match axis lengths {:?}",
                path.display(),
                density.dim(),
                expected
            )));
        }

        Ok(Self {
            heights,
            lats,
            lons,
            density,
        })
    }
}

fn density_variable<'f>(file: &'f netcdf::File) -> Result<netcdf::Variable<'f>> {
    file.variable(DENSITY_VAR).ok_or_else(|| {
        WamdensError::MalformedSnapshot(format!("missing variable {}", DENSITY_VAR))
    })
}

fn read_axis(file: &netcdf::File, name: &str) -> Result<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| WamdensError::MalformedSnapshot(format!("missing variable {}", name)))?;
    Ok(var.get_values::<f64, _>(..)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_snapshot(path: &Path, with_time_dim: bool, value: f64) {
        let mut file = netcdf::create(path).unwrap();

        file.add_dimension(HEIGHT_VAR, 2).unwrap();
        file.add_dimension(LAT_VAR, 3).unwrap();
        file.add_dimension(LON_VAR, 4).unwrap();

        let mut hlevs = file.add_variable::<f64>(HEIGHT_VAR, &[HEIGHT_VAR]).unwrap();
        hlevs.put_values(&[100.0, 200.0], ..).unwrap();
        let mut lat = file.add_variable::<f64>(LAT_VAR, &[LAT_VAR]).unwrap();
        lat.put_values(&[-90.0, 0.0, 90.0], ..).unwrap();
        let mut lon = file.add_variable::<f64>(LON_VAR, &[LON_VAR]).unwrap();
        lon.put_values(&[0.0, 120.0, 240.0, 360.0], ..).unwrap();

        let den_values = vec![value; 2 * 3 * 4];
        if with_time_dim {
            file.add_dimension("time", 1).unwrap();
            let mut den = file
                .add_variable::<f64>(DENSITY_VAR, &["time", HEIGHT_VAR, LAT_VAR, LON_VAR])
                .unwrap();
            den.put_values(&den_values, ..).unwrap();
        } else {
            let mut den = file
                .add_variable::<f64>(DENSITY_VAR, &[HEIGHT_VAR, LAT_VAR, LON_VAR])
                .unwrap();
            den.put_values(&den_values, ..).unwrap();
        }
    }

    #[test]
    fn test_load_3d_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wam_20230512_160000.nc");
        write_snapshot(&path, false, 1.2);

        let snap = Snapshot::from_file(&path).unwrap();
        assert_eq!(snap.density.dim(), (2, 3, 4));
        assert_eq!(snap.heights, vec![100.0, 200.0]);
        assert_eq!(snap.density[[1, 2, 3]], 1.2);
    }

    #[test]
    fn test_load_squeezes_singleton_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wam_20230512_160000.nc");
        write_snapshot(&path, true, 2.5);

        let snap = Snapshot::from_file(&path).unwrap();
        assert_eq!(snap.density.dim(), (2, 3, 4));
        assert_eq!(snap.density[[0, 0, 0]], 2.5);
    }

    #[test]
    fn test_missing_density_variable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension(HEIGHT_VAR, 2).unwrap();
            let mut hlevs = file.add_variable::<f64>(HEIGHT_VAR, &[HEIGHT_VAR]).unwrap();
            hlevs.put_values(&[100.0, 200.0], ..).unwrap();
        }

        let err = Snapshot::from_file(&path).unwrap_err();
        assert!(matches!(err, WamdensError::MalformedSnapshot(_)));
    }

    #[test]
    fn test_archive_block_selection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("WAM_den_20230512.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension("time", 3).unwrap();
            file.add_dimension(HEIGHT_VAR, 2).unwrap();
            file.add_dimension(LAT_VAR, 2).unwrap();
            file.add_dimension(LON_VAR, 2).unwrap();

            let mut hlevs = file.add_variable::<f64>(HEIGHT_VAR, &[HEIGHT_VAR]).unwrap();
            hlevs.put_values(&[100.0, 200.0], ..).unwrap();
            let mut lat = file.add_variable::<f64>(LAT_VAR, &[LAT_VAR]).unwrap();
            lat.put_values(&[-45.0, 45.0], ..).unwrap();
            let mut lon = file.add_variable::<f64>(LON_VAR, &[LON_VAR]).unwrap();
            lon.put_values(&[0.0, 180.0], ..).unwrap();

            // Each block holds its index as the constant density
            let mut den = file
                .add_variable::<f64>(DENSITY_VAR, &["time", HEIGHT_VAR, LAT_VAR, LON_VAR])
                .unwrap();
            let values: Vec<f64> = (0..3).flat_map(|b| vec![b as f64; 8]).collect();
            den.put_values(&values, ..).unwrap();
        }

        assert_eq!(Snapshot::archive_block_count(&path).unwrap(), 3);

        let snap = Snapshot::from_archive_block(&path, 2).unwrap();
        assert_eq!(snap.density[[0, 0, 0]], 2.0);
        assert_eq!(snap.density[[1, 1, 1]], 2.0);

        let err = Snapshot::from_archive_block(&path, 3).unwrap_err();
        assert!(matches!(err, WamdensError::MalformedSnapshot(_)));
    }

    #[test]
    fn test_axis_mismatch_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension(HEIGHT_VAR, 2).unwrap();
            file.add_dimension(LAT_VAR, 2).unwrap();
            file.add_dimension(LON_VAR, 2).unwrap();
            // Axis variable shorter than the field's height dimension
            file.add_dimension("short", 1).unwrap();

            let mut hlevs = file.add_variable::<f64>(HEIGHT_VAR, &["short"]).unwrap();
            hlevs.put_values(&[100.0], ..).unwrap();
            let mut lat = file.add_variable::<f64>(LAT_VAR, &[LAT_VAR]).unwrap();
            lat.put_values(&[-45.0, 45.0], ..).unwrap();
            let mut lon = file.add_variable::<f64>(LON_VAR, &[LON_VAR]).unwrap();
            lon.put_values(&[0.0, 180.0], ..).unwrap();
            let mut den = file
                .add_variable::<f64>(DENSITY_VAR, &[HEIGHT_VAR, LAT_VAR, LON_VAR])
                .unwrap();
            den.put_values(&[0.0; 8], ..).unwrap();
        }

        let err = Snapshot::from_file(&path).unwrap_err();
        assert!(matches!(err, WamdensError::MalformedSnapshot(_)));
    }

    #[test]
    fn test_interpolant_construction() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wam_20230512_160000.nc");
        write_snapshot(&path, false, 1.2);

        let snap = Snapshot::from_file(&path).unwrap();
        let grid = snap.into_interpolant(ExtrapolationPolicy::Deny).unwrap();
        let v = grid.interpolate(150.0, 45.0, 195.0).unwrap();
        assert!((v - 1.2).abs() < 1e-12);
    }
}
