//! # flood_tool
//!
//! Locate UK postcodes on the British National Grid and classify their exposure to flooding.
//!
//! - Geodetic engine: [`cartesian`], [`helmert`], [`projection`] take a WGS84 latitude/longitude
//!   to an OSGB36 easting/northing.
//! - Flood risk: [`postcode`], [`risk_zone`], [`risk`] resolve postcodes, classify them against
//!   circular risk zones, and aggregate cost and annual risk into [`report`]s.
//! - [`flood_tool::FloodTool`] owns the loaded tables and exposes every operation as a method.

pub mod cartesian;
pub mod constants;
pub mod conversion;
pub mod ellipsoid;
pub mod flood_tool;
pub mod flood_tool_errors;
pub mod helmert;
pub mod postcode;
pub mod projection;
pub mod rainfall;
pub mod report;
pub mod risk;
pub mod risk_zone;
pub mod table_reader;
