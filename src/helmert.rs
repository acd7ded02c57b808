//! # Helmert datum transform
//!
//! A 7-parameter similarity transform (scale, three small rotations, three translations)
//! mapping body-Cartesian coordinates from one datum to another:
//!
//! ```text
//! X' = T + M·X
//!
//!     ⎡ 1+s  −rz   ry ⎤
//! M = ⎢  rz  1+s  −rx ⎥
//!     ⎣ −ry   rx  1+s ⎦
//! ```
//!
//! The matrix is the first-order small-angle approximation of rotation plus scale; it is built
//! once at construction and reused for every point.
//!
//! [`wgs84_to_osgb36`] is the single datum-shift path of the crate: WGS84 geodetic →
//! Cartesian → [`WGS84_TO_OSGB36`] → OSGB36 geodetic.

use std::sync::LazyLock;

use nalgebra::{Matrix3, Vector3};
use rayon::prelude::*;

use crate::cartesian::{to_cartesian, to_geodetic, GeodeticCoord};
use crate::constants::{AngleUnit, Meter, Radian, RADSEC};
use crate::ellipsoid::{OSGB36, WGS84_DATUM};
use crate::flood_tool_errors::{check_batch_lengths, FloodToolError};

/// The seven parameters of a Helmert transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmertParameters {
    /// Scale change (dimensionless, ppm order).
    pub s: f64,
    pub rx: Radian,
    pub ry: Radian,
    pub rz: Radian,
    /// Translation in **meters**.
    pub t: [Meter; 3],
}

/// Published WGS84 → OSGB36 parameters.
pub const WGS84_TO_OSGB36_PARAMETERS: HelmertParameters = HelmertParameters {
    s: 20.4894e-6,
    rx: -0.1502 * RADSEC,
    ry: -0.2470 * RADSEC,
    rz: -0.8421 * RADSEC,
    t: [-446.448, 125.157, -542.060],
};

/// Helmert transform with its matrix precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct HelmertTransform {
    t: Vector3<f64>,
    m: Matrix3<f64>,
}

impl HelmertTransform {
    pub fn new(params: &HelmertParameters) -> Self {
        let HelmertParameters { s, rx, ry, rz, t } = *params;

        #[rustfmt::skip]
        let m = Matrix3::new(
            1.0 + s, -rz,      ry,
            rz,      1.0 + s, -rx,
            -ry,     rx,       1.0 + s,
        );

        HelmertTransform {
            t: Vector3::from(t),
            m,
        }
    }

    /// Transform a single point, `T + M·X`.
    #[inline]
    pub fn apply(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.t + self.m * point
    }

    /// Transform a set of points, one output per input, order preserved.
    pub fn apply_batch(&self, points: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        points.par_iter().map(|pt| self.apply(pt)).collect()
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    pub fn translation(&self) -> &Vector3<f64> {
        &self.t
    }
}

/// Process-wide WGS84 → OSGB36 transform, built on first use.
pub static WGS84_TO_OSGB36: LazyLock<HelmertTransform> =
    LazyLock::new(|| HelmertTransform::new(&WGS84_TO_OSGB36_PARAMETERS));

/// Transform a GPS (WGS84) latitude/longitude to the OSGB36 datum.
///
/// Arguments
/// ---------
/// * `lat`, `long`: WGS84 coordinates, in `unit`.
/// * `unit`: [`AngleUnit`] of the inputs.
///
/// Returns
/// -------
/// * [`GeodeticCoord`] on OSGB36, always in **radians**.
pub fn wgs84_to_osgb36(lat: f64, long: f64, unit: AngleUnit) -> GeodeticCoord {
    let wgs84_xyz = to_cartesian(lat, long, unit, &WGS84_DATUM);
    let osgb_xyz = WGS84_TO_OSGB36.apply(&wgs84_xyz);
    to_geodetic(
        osgb_xyz.x,
        osgb_xyz.y,
        osgb_xyz.z,
        AngleUnit::Radians,
        &OSGB36,
    )
}

/// Element-wise [`wgs84_to_osgb36`] over paired slices.
///
/// Errors
/// ------
/// * [`FloodToolError::BatchLengthMismatch`] if the slices differ in length.
pub fn wgs84_to_osgb36_batch(
    lats: &[f64],
    longs: &[f64],
    unit: AngleUnit,
) -> Result<Vec<GeodeticCoord>, FloodToolError> {
    check_batch_lengths(lats.len(), longs.len())?;
    Ok(lats
        .par_iter()
        .zip(longs.par_iter())
        .map(|(&lat, &long)| wgs84_to_osgb36(lat, long, unit))
        .collect())
}
