//! # OSGB36 National Grid projection
//!
//! Transverse Mercator (Redfearn series) projection of OSGB36 geodetic coordinates onto the
//! British National Grid, as published in *A guide to coordinate systems in Great Britain*
//! (Ordnance Survey).
//!
//! With `Δλ = λ − λ₀` and `t = tanφ`:
//!
//! ```text
//! N = I + II·Δλ² + III·Δλ⁴ + IIIA·Δλ⁶
//! E = E₀ + IV·Δλ + V·Δλ³ + VI·Δλ⁵
//! ```
//!
//! where `I = M + N₀` and `M` is the meridional arc between `φ₀` and `φ`. All trigonometric
//! arguments are radians; the routines are pure and safe to call from any number of threads.

use rayon::prelude::*;

use crate::cartesian::GeodeticCoord;
use crate::constants::{AngleUnit, Meter, Radian};
use crate::ellipsoid::{Datum, OSGB36};
use crate::flood_tool_errors::{check_batch_lengths, FloodToolError};
use crate::helmert::wgs84_to_osgb36;

/// A National Grid position, in **meters**.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridCoord {
    pub easting: Meter,
    pub northing: Meter,
}

impl GridCoord {
    pub fn new(easting: Meter, northing: Meter) -> Self {
        GridCoord { easting, northing }
    }
}

/// Meridional arc from the true origin latitude `φ₀` to `lat`, in **meters**.
fn meridional_arc(lat: Radian, datum: &Datum) -> Meter {
    let ell = &datum.ellipsoid;
    let n = ell.n;
    let n2 = n * n;
    let n3 = n2 * n;

    let dphi = lat - datum.phi0;
    let sphi = lat + datum.phi0;

    ell.b
        * ell.f0
        * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * dphi
            - (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * dphi.sin() * sphi.cos()
            + (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * dphi).sin() * (2.0 * sphi).cos()
            - (35.0 / 24.0 * n3) * (3.0 * dphi).sin() * (3.0 * sphi).cos())
}

/// Project geodetic coordinates on `datum` to grid coordinates.
///
/// Arguments
/// ---------
/// * `lat`, `long`: geodetic coordinates on `datum`, in **radians**.
/// * `datum`: datum providing the ellipsoid and grid origin.
///
/// Returns
/// -------
/// * [`GridCoord`] in **meters**, offset by the false origin `(E₀, N₀)`.
pub fn transverse_mercator(lat: Radian, long: Radian, datum: &Datum) -> GridCoord {
    let ell = &datum.ellipsoid;

    let (sin_lat, cos_lat) = lat.sin_cos();
    let tan2 = lat.tan().powi(2);
    let tan4 = tan2 * tan2;

    let nu = ell.nu(lat);
    let rho = ell.rho(lat);
    let eta2 = nu / rho - 1.0;

    let m = meridional_arc(lat, datum);

    let term_i = m + datum.n0;
    let term_ii = nu / 2.0 * sin_lat * cos_lat;
    let term_iii = nu / 24.0 * sin_lat * cos_lat.powi(3) * (5.0 - tan2 + 9.0 * eta2);
    let term_iiia = nu / 720.0 * sin_lat * cos_lat.powi(5) * (61.0 - 58.0 * tan2 + tan4);
    let term_iv = nu * cos_lat;
    let term_v = nu / 6.0 * cos_lat.powi(3) * (nu / rho - tan2);
    let term_vi = nu / 120.0
        * cos_lat.powi(5)
        * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

    let dl = long - datum.lam0;
    let dl2 = dl * dl;

    let easting = datum.e0 + dl * (term_iv + dl2 * (term_v + dl2 * term_vi));
    let northing = term_i + dl2 * (term_ii + dl2 * (term_iii + dl2 * term_iiia));

    GridCoord { easting, northing }
}

/// Project OSGB36 geodetic coordinates (radians) to the National Grid.
///
/// This is the projection stage alone; use [`lat_long_to_easting_northing`] for GPS input.
pub fn project_osgb36(lat: Radian, long: Radian) -> GridCoord {
    transverse_mercator(lat, long, &OSGB36)
}

/// Convert a GPS (WGS84) latitude/longitude to an OSGB36 easting/northing.
///
/// Arguments
/// ---------
/// * `lat`, `long`: WGS84 coordinates, in `unit`.
/// * `unit`: [`AngleUnit`] of the inputs.
///
/// Returns
/// -------
/// * [`GridCoord`] in **meters**.
///
/// See also
/// --------
/// * [`wgs84_to_osgb36`] – datum shift applied before projecting.
/// * [`project_osgb36`] – projection of coordinates already on OSGB36.
pub fn lat_long_to_easting_northing(lat: f64, long: f64, unit: AngleUnit) -> GridCoord {
    let GeodeticCoord {
        latitude,
        longitude,
    } = wgs84_to_osgb36(lat, long, unit);
    project_osgb36(latitude, longitude)
}

/// Element-wise [`lat_long_to_easting_northing`] over paired slices, order preserved.
///
/// NaN inputs produce NaN eastings/northings for that element only.
///
/// Errors
/// ------
/// * [`FloodToolError::BatchLengthMismatch`] if the slices differ in length.
pub fn easting_northing_batch(
    lats: &[f64],
    longs: &[f64],
    unit: AngleUnit,
) -> Result<Vec<GridCoord>, FloodToolError> {
    check_batch_lengths(lats.len(), longs.len())?;
    Ok(lats
        .par_iter()
        .zip(longs.par_iter())
        .map(|(&lat, &long)| lat_long_to_easting_northing(lat, long, unit))
        .collect())
}

#[cfg(test)]
mod projection_test {
    use super::*;
    use crate::conversion::{dms_to_rad, parse_dms_to_deg};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ordnance_survey_worked_example() {
        // OS guide, annex C: 52°39'27.2531"N 1°43'4.5177"E on OSGB36
        let lat = dms_to_rad(52.0, 39.0, 27.2531);
        let long = dms_to_rad(1.0, 43.0, 4.5177);

        let grid = project_osgb36(lat, long);
        assert_abs_diff_eq!(grid.easting, 651_409.903, epsilon = 1.0);
        assert_abs_diff_eq!(grid.northing, 313_177.270, epsilon = 1.0);

        let (lat, _) = parse_dms_to_deg("52°39'27.2531\"N").unwrap();
        let (long, _) = parse_dms_to_deg("1°43'4.5177\"E").unwrap();
        let parsed = project_osgb36(lat.to_radians(), long.to_radians());
        assert_abs_diff_eq!(parsed.easting, grid.easting, epsilon = 1e-6);
        assert_abs_diff_eq!(parsed.northing, grid.northing, epsilon = 1e-6);
    }

    #[test]
    fn test_true_origin() {
        let grid = project_osgb36(OSGB36.phi0, OSGB36.lam0);
        assert_abs_diff_eq!(grid.easting, 400_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(grid.northing, -100_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gps_to_easting_northing() {
        let grid = lat_long_to_easting_northing(52.657570, 1.716590, AngleUnit::Degrees);
        assert_abs_diff_eq!(grid.easting, 651_448.674, epsilon = 1.0);
        assert_abs_diff_eq!(grid.northing, 313_133.759, epsilon = 1.0);

        let grid = lat_long_to_easting_northing(51.200131, 1.395154, AngleUnit::Degrees);
        assert_abs_diff_eq!(grid.easting, 637_284.031, epsilon = 1.0);
        assert_abs_diff_eq!(grid.northing, 150_025.024, epsilon = 1.0);
    }

    #[test]
    fn test_radians_input() {
        let deg = lat_long_to_easting_northing(51.444248, 0.275078, AngleUnit::Degrees);
        let rad = lat_long_to_easting_northing(
            51.444248_f64.to_radians(),
            0.275078_f64.to_radians(),
            AngleUnit::Radians,
        );
        assert_abs_diff_eq!(deg.easting, rad.easting, epsilon = 1e-6);
        assert_abs_diff_eq!(deg.northing, rad.northing, epsilon = 1e-6);
        assert_abs_diff_eq!(deg.easting, 558_204.067, epsilon = 1.0);
        assert_abs_diff_eq!(deg.northing, 174_150.021, epsilon = 1.0);
    }

    #[test]
    fn test_batch() {
        let lats = [51.200131, 51.444248, f64::NAN, 51.437398];
        let longs = [1.395154, 0.275078, 0.0, 0.250708];

        let grid = easting_northing_batch(&lats, &longs, AngleUnit::Degrees).unwrap();
        assert_eq!(grid.len(), 4);
        assert_abs_diff_eq!(grid[0].easting, 637_284.031, epsilon = 1.0);
        assert!(grid[2].easting.is_nan() && grid[2].northing.is_nan());
        assert_abs_diff_eq!(grid[3].easting, 556_534.066, epsilon = 1.0);
        assert_abs_diff_eq!(grid[3].northing, 173_336.004, epsilon = 1.0);

        assert_eq!(
            easting_northing_batch(&lats, &longs[..2], AngleUnit::Degrees).unwrap_err(),
            FloodToolError::BatchLengthMismatch { left: 4, right: 2 }
        );
    }
}
