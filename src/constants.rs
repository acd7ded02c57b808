//! # Constants and type definitions for flood_tool
//!
//! This module centralizes the **numerical constants**, **conversion factors**, and **common type
//! definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, arcseconds → radians)
//! - The fixed iteration count of the inverse geodetic solver
//! - Flood risk scaling constants
//! - Core type aliases and the [`AngleUnit`] selector
//!
//! These definitions are used by the geodetic engine (`cartesian`, `helmert`, `projection`)
//! and by the risk modules (`risk_zone`, `risk`).

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

// -------------------------------------------------------------------------------------------------
// Numerical settings
// -------------------------------------------------------------------------------------------------

/// Number of Newton–Raphson steps used to invert Cartesian coordinates to latitude.
///
/// This count is part of the output contract: reference eastings and northings were computed
/// with exactly this many steps, so the solver never exits early.
pub const NEWTON_ITERATIONS: usize = 6;

/// Fraction of the total property value lost in a flood event.
pub const RISK_FACTOR: f64 = 0.05;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Monetary amount in pounds sterling
pub type Pound = f64;

/// Unit of the angles handed to (or returned by) the geodetic routines.
///
/// Internally every trigonometric argument is in radians; this only describes the
/// caller-facing side. Degrees are the default, as for GPS fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert an angle expressed in `self` into radians.
    #[inline]
    pub fn to_radians(self, angle: f64) -> Radian {
        match self {
            AngleUnit::Degrees => angle * RADEG,
            AngleUnit::Radians => angle,
        }
    }

    /// Convert an angle in radians into `self`.
    #[inline]
    pub fn from_radians(self, angle: Radian) -> f64 {
        match self {
            AngleUnit::Degrees => angle / RADEG,
            AngleUnit::Radians => angle,
        }
    }
}
