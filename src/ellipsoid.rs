//! # Reference ellipsoids and map datums
//!
//! Immutable containers for the geometric constants the geodetic engine works on.
//!
//! - [`Ellipsoid`] holds the semi-axes, the grid scale factor and the derived quantities
//!   `n = (a−b)/(a+b)` and `e² = (a²−b²)/a²`.
//! - [`Datum`] embeds an [`Ellipsoid`] and adds the origin of the projected grid
//!   (`φ₀`, `λ₀`, `E₀`, `N₀`) and an orthometric height `H`.
//!
//! Exactly two named frames exist, both compile-time constants:
//!
//! | Name       | a (m)        | b (m)         | F₀           |
//! |------------|--------------|---------------|--------------|
//! | [`WGS84`]  | 6 378 137    | 6 356 752.3142| 0.9996       |
//! | [`OSGB36`] | 6 377 563.396| 6 356 256.910 | 0.9996012717 |
//!
//! The WGS84 constant carries a scale factor too; the Cartesian conversion multiplies the
//! radius of curvature by `F₀` on every frame, and the published reference eastings depend
//! on that convention.

use crate::constants::{Meter, Radian, RADEG};

/// Geometric description of a terrestrial ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in **meters**.
    pub a: Meter,
    /// Semi-minor axis in **meters**.
    pub b: Meter,
    /// Central meridian scale factor.
    pub f0: f64,
    /// Third flattening `(a−b)/(a+b)`.
    pub n: f64,
    /// Squared first eccentricity `(a²−b²)/a²`.
    pub e2: f64,
}

impl Ellipsoid {
    /// Build an ellipsoid from its semi-axes and scale factor.
    ///
    /// Arguments
    /// -----------------
    /// * `a`: semi-major axis in meters.
    /// * `b`: semi-minor axis in meters, `0 < b < a`.
    /// * `f0`: scale factor applied to the radius of curvature.
    pub const fn new(a: Meter, b: Meter, f0: f64) -> Self {
        Ellipsoid {
            a,
            b,
            f0,
            n: (a - b) / (a + b),
            e2: (a * a - b * b) / (a * a),
        }
    }

    /// Prime vertical radius of curvature `ν = a·F₀ / sqrt(1 − e²·sin²φ)`.
    #[inline]
    pub fn nu(&self, lat: Radian) -> Meter {
        self.a * self.f0 / (1.0 - self.e2 * lat.sin().powi(2)).sqrt()
    }

    /// Meridional radius of curvature `ρ = a·F₀·(1−e²) / (1 − e²·sin²φ)^1.5`.
    #[inline]
    pub fn rho(&self, lat: Radian) -> Meter {
        self.a * self.f0 * (1.0 - self.e2) / (1.0 - self.e2 * lat.sin().powi(2)).powf(1.5)
    }
}

/// A map datum: an [`Ellipsoid`] plus the origin of its projected grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    pub ellipsoid: Ellipsoid,
    /// Latitude of the true origin, **radians**.
    pub phi0: Radian,
    /// Longitude of the true origin (central meridian), **radians**.
    pub lam0: Radian,
    /// Easting of the false origin, **meters**.
    pub e0: Meter,
    /// Northing of the false origin, **meters**.
    pub n0: Meter,
    /// Orthometric height added to the radius of curvature, **meters**.
    pub h: Meter,
}

impl Datum {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        a: Meter,
        b: Meter,
        f0: f64,
        phi0: Radian,
        lam0: Radian,
        e0: Meter,
        n0: Meter,
        h: Meter,
    ) -> Self {
        Datum {
            ellipsoid: Ellipsoid::new(a, b, f0),
            phi0,
            lam0,
            e0,
            n0,
            h,
        }
    }

    /// View a bare ellipsoid as a datum with a null origin and zero height.
    pub const fn from_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        Datum {
            ellipsoid,
            phi0: 0.0,
            lam0: 0.0,
            e0: 0.0,
            n0: 0.0,
            h: 0.0,
        }
    }
}

/// Ellipsoid of the WGS 1984 datum, as used for GPS coordinates.
pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 6_356_752.3142, 0.9996);

/// WGS84 viewed as a datum (zero height, no grid origin).
pub const WGS84_DATUM: Datum = Datum::from_ellipsoid(WGS84);

/// Ordnance Survey GB 1936 datum, as used by the OS National Grid.
pub const OSGB36: Datum = Datum::new(
    6_377_563.396,
    6_356_256.910,
    0.9996012717,
    49.0 * RADEG,
    -2.0 * RADEG,
    400_000.0,
    -100_000.0,
    24.7,
);

#[cfg(test)]
mod ellipsoid_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derived_quantities() {
        let e = Ellipsoid::new(2.0, 1.0, 1.0);
        assert_relative_eq!(e.n, 1.0 / 3.0);
        assert_relative_eq!(e.e2, 0.75);

        assert!(OSGB36.ellipsoid.e2 >= 0.0 && OSGB36.ellipsoid.e2 < 1.0);
        assert!(WGS84.e2 >= 0.0 && WGS84.e2 < 1.0);
        assert_relative_eq!(OSGB36.ellipsoid.e2, 0.006670539761597337, epsilon = 1e-12);
    }

    #[test]
    fn test_radii_of_curvature() {
        // on the equator ν = a·F₀ and ρ = a·F₀·(1−e²)
        let e = OSGB36.ellipsoid;
        assert_relative_eq!(e.nu(0.0), e.a * e.f0);
        assert_relative_eq!(e.rho(0.0), e.a * e.f0 * (1.0 - e.e2));

        // at the pole both radii coincide
        let pole = std::f64::consts::FRAC_PI_2;
        assert_relative_eq!(e.nu(pole), e.rho(pole), max_relative = 1e-12);
    }

    #[test]
    fn test_wgs84_datum_has_no_height() {
        assert_eq!(WGS84_DATUM.h, 0.0);
        assert_eq!(WGS84_DATUM.ellipsoid, WGS84);
    }
}
