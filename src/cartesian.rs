//! # Geodetic ⇄ body-Cartesian conversion
//!
//! Converts latitude/longitude on a [`Datum`] to 3D Earth-centred Cartesian coordinates
//! (meters) and back.
//!
//! ## Forward
//!
//! ```text
//! ν = a·F₀ / sqrt(1 − e²·sin²φ)
//! x = (ν + H)·cosφ·cosλ
//! y = (ν + H)·cosφ·sinλ
//! z = ((1 − e²)·ν + H)·sinφ
//! ```
//!
//! ## Inverse
//!
//! Longitude is `atan2(y, x)`. Latitude solves the implicit equation
//!
//! ```text
//! f(φ) = (z + e²·ν(φ)·sinφ) / p − tanφ = 0,     p = sqrt(x² + y²)
//! ```
//!
//! by Newton–Raphson started from `φ₀ = atan2(z, p·(1 − e²))`. The step count is fixed at
//! [`NEWTON_ITERATIONS`] with no convergence test, so outputs are reproducible bit for bit.
//! [`to_geodetic_with_residual`] exposes the size of the last correction for callers who
//! want a convergence diagnostic.
//!
//! The inverse ignores `H`; points handed to it are treated as lying on the scaled ellipsoid.

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::constants::{AngleUnit, Degree, Radian, NEWTON_ITERATIONS};
use crate::ellipsoid::Datum;
use crate::flood_tool_errors::{check_batch_lengths, FloodToolError};

/// A latitude/longitude pair. The unit depends on the routine that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeodeticCoord {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeodeticCoord {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeodeticCoord {
            latitude,
            longitude,
        }
    }

    /// Sentinel returned for postcodes that cannot be resolved.
    pub fn nan() -> Self {
        GeodeticCoord::new(f64::NAN, f64::NAN)
    }

    /// True when either component is NaN.
    pub fn is_nan(&self) -> bool {
        self.latitude.is_nan() || self.longitude.is_nan()
    }
}

impl From<(Degree, Degree)> for GeodeticCoord {
    fn from((latitude, longitude): (Degree, Degree)) -> Self {
        GeodeticCoord::new(latitude, longitude)
    }
}

/// Convert a latitude/longitude on `datum` to body-Cartesian coordinates.
///
/// Arguments
/// ---------
/// * `lat`, `long`: geodetic coordinates, in `unit`.
/// * `unit`: [`AngleUnit`] of the inputs.
/// * `datum`: frame to work on.
///
/// Returns
/// -------
/// * `Vector3<f64>`: `(x, y, z)` in **meters**.
pub fn to_cartesian(lat: f64, long: f64, unit: AngleUnit, datum: &Datum) -> Vector3<f64> {
    let lat = unit.to_radians(lat);
    let long = unit.to_radians(long);

    let ell = &datum.ellipsoid;
    let nu = ell.nu(lat);

    Vector3::new(
        (nu + datum.h) * lat.cos() * long.cos(),
        (nu + datum.h) * lat.cos() * long.sin(),
        ((1.0 - ell.e2) * nu + datum.h) * lat.sin(),
    )
}

/// Convert body-Cartesian coordinates to latitude/longitude on `datum`.
///
/// See [`to_geodetic_with_residual`] for the algorithm; this variant drops the diagnostic.
pub fn to_geodetic(x: f64, y: f64, z: f64, unit: AngleUnit, datum: &Datum) -> GeodeticCoord {
    to_geodetic_with_residual(x, y, z, unit, datum).0
}

/// Convert body-Cartesian coordinates to latitude/longitude and report the last Newton step.
///
/// Arguments
/// ---------
/// * `x`, `y`, `z`: body-Cartesian coordinates in **meters**.
/// * `unit`: [`AngleUnit`] of the returned angles.
/// * `datum`: frame to work on.
///
/// Returns
/// -------
/// * `(GeodeticCoord, f64)`: the coordinates and the absolute value of the final latitude
///   correction, in **radians**. A residual above ~1e-12 rad signals a pathological input.
///
/// Remarks
/// -------
/// * Exactly [`NEWTON_ITERATIONS`] steps are taken regardless of the residual.
/// * A point on the polar axis (`p = 0`) maps to latitude ±90° (0° at the centre) without
///   iterating; the residual is then `0.0`.
pub fn to_geodetic_with_residual(
    x: f64,
    y: f64,
    z: f64,
    unit: AngleUnit,
    datum: &Datum,
) -> (GeodeticCoord, Radian) {
    let ell = &datum.ellipsoid;
    let p = x.hypot(y);

    let longitude = y.atan2(x);

    if p == 0.0 {
        let pole = if z == 0.0 {
            0.0
        } else {
            std::f64::consts::FRAC_PI_2.copysign(z)
        };
        return (
            GeodeticCoord::new(unit.from_radians(pole), unit.from_radians(longitude)),
            0.0,
        );
    }

    let mut latitude = z.atan2(p * (1.0 - ell.e2));
    let mut step = 0.0;

    for _ in 0..NEWTON_ITERATIONS {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let w = 1.0 - ell.e2 * sin_lat * sin_lat;

        let nu = ell.a * ell.f0 / w.sqrt();
        let dnu = ell.a * ell.f0 * ell.e2 * sin_lat * cos_lat / w.powf(1.5);

        let f0 = (z + ell.e2 * nu * sin_lat) / p - latitude.tan();
        let f1 = ell.e2 * (nu * cos_lat + dnu * sin_lat) / p - 1.0 / (cos_lat * cos_lat);

        step = f0 / f1;
        latitude -= step;
    }

    (
        GeodeticCoord::new(unit.from_radians(latitude), unit.from_radians(longitude)),
        step.abs(),
    )
}

/// Element-wise [`to_cartesian`] over paired latitude and longitude slices.
///
/// Errors
/// ------
/// * [`FloodToolError::BatchLengthMismatch`] if the slices differ in length.
pub fn to_cartesian_batch(
    lats: &[f64],
    longs: &[f64],
    unit: AngleUnit,
    datum: &Datum,
) -> Result<Vec<Vector3<f64>>, FloodToolError> {
    check_batch_lengths(lats.len(), longs.len())?;
    Ok(lats
        .par_iter()
        .zip(longs.par_iter())
        .map(|(&lat, &long)| to_cartesian(lat, long, unit, datum))
        .collect())
}

/// Element-wise [`to_geodetic`] over a slice of Cartesian points, order preserved.
pub fn to_geodetic_batch(
    points: &[Vector3<f64>],
    unit: AngleUnit,
    datum: &Datum,
) -> Vec<GeodeticCoord> {
    points
        .par_iter()
        .map(|pt| to_geodetic(pt.x, pt.y, pt.z, unit, datum))
        .collect()
}
