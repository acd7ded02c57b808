//! # FloodTool: loaded tables and the public operations
//!
//! [`FloodTool`] owns the two read-only tables the crate works on:
//!
//! 1. a [`PostcodeTable`]: normalised postcode → WGS84 latitude/longitude and property value;
//! 2. a [`RiskZoneTable`]: circular flood risk zones on the National Grid.
//!
//! Every public operation is a method taking slices and returning one row per input (or a
//! sorted report). Both tables are immutable after construction, so a `FloodTool` can be
//! shared across threads behind a plain reference or an `Arc`.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use flood_tool::flood_tool::{DataSources, FloodTool};
//!
//! let sources = DataSources::from_env().unwrap();
//! let tool = FloodTool::from_sources(&sources).unwrap();
//!
//! let report = tool.sorted_annual_flood_risk(&["DA1 1PT", "da99nt", "CT14 7PF"]);
//! println!("{report}");
//! ```
//!
//! ## Data sources
//!
//! [`DataSources`] names the three CSV files. By default they live in
//! `<cwd>/flood_tool/resources/`; the `FLOOD_TOOL_RESOURCES` environment variable overrides
//! that directory, and each path can be overridden individually.
//!
//! ## See also
//! ------------
//! * [`table_reader`](crate::table_reader) – CSV parsing and the property value join.
//! * [`risk`](crate::risk) – cost, annual risk, and sorted reports.

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;

use crate::{
    cartesian::GeodeticCoord,
    constants::{AngleUnit, Meter, Pound},
    flood_tool_errors::FloodToolError,
    postcode::PostcodeTable,
    projection::{lat_long_to_easting_northing, GridCoord},
    report::{ProbabilityReport, RiskReport},
    risk::{annual_risk, flood_cost, sorted_annual_risk, sorted_probabilities},
    risk_zone::{ProbabilityBand, RiskZoneTable},
    table_reader::{load_postcode_table, load_risk_zone_table},
};

/// Environment variable naming the resource directory.
pub const RESOURCES_ENV: &str = "FLOOD_TOOL_RESOURCES";

/// Resource directory relative to the working directory.
pub const DEFAULT_RESOURCE_DIR: &str = "flood_tool/resources";

const POSTCODES_FILE: &str = "postcodes.csv";
const RISK_ZONES_FILE: &str = "flood_probability.csv";
const PROPERTY_VALUES_FILE: &str = "property_value.csv";

/// Locations of the three CSV resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub postcodes: Utf8PathBuf,
    pub risk_zones: Utf8PathBuf,
    pub property_values: Utf8PathBuf,
}

impl DataSources {
    /// Standard file names inside `dir`.
    pub fn from_dir(dir: impl AsRef<Utf8Path>) -> Self {
        let dir = dir.as_ref();
        DataSources {
            postcodes: dir.join(POSTCODES_FILE),
            risk_zones: dir.join(RISK_ZONES_FILE),
            property_values: dir.join(PROPERTY_VALUES_FILE),
        }
    }

    /// Resource directory from `FLOOD_TOOL_RESOURCES`, or `<cwd>/flood_tool/resources`.
    ///
    /// Errors
    /// ------
    /// * [`FloodToolError::IoError`] if the working directory cannot be read or is not UTF-8.
    pub fn from_env() -> Result<Self, FloodToolError> {
        if let Ok(dir) = std::env::var(RESOURCES_ENV) {
            tracing::debug!(dir = %dir, "resource directory taken from the environment");
            return Ok(DataSources::from_dir(dir));
        }

        let cwd = Utf8PathBuf::try_from(std::env::current_dir()?)
            .map_err(|err| err.into_io_error())?;
        Ok(DataSources::from_dir(cwd.join(DEFAULT_RESOURCE_DIR)))
    }

    pub fn with_postcodes(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.postcodes = path.into();
        self
    }

    pub fn with_risk_zones(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.risk_zones = path.into();
        self
    }

    pub fn with_property_values(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.property_values = path.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FloodTool {
    postcodes: PostcodeTable,
    zones: RiskZoneTable,
}

impl FloodTool {
    /// Build a tool over tables already in memory.
    pub fn new(postcodes: PostcodeTable, zones: RiskZoneTable) -> Self {
        FloodTool { postcodes, zones }
    }

    /// Load the three CSV resources and build a tool over them.
    ///
    /// Arguments
    /// ---------
    /// * `sources`: paths of the postcode, property value and flood probability files.
    ///
    /// Return
    /// ------
    /// * A new [`FloodTool`], or the first loading error.
    ///
    /// See also
    /// --------
    /// * [`load_postcode_table`] / [`load_risk_zone_table`] – the underlying loaders.
    pub fn from_sources(sources: &DataSources) -> Result<Self, FloodToolError> {
        let postcodes = load_postcode_table(&sources.postcodes, &sources.property_values)?;
        let zones = load_risk_zone_table(&sources.risk_zones)?;

        tracing::info!(
            postcodes = postcodes.len(),
            zones = zones.len(),
            postcode_file = %sources.postcodes,
            risk_file = %sources.risk_zones,
            "flood tool tables loaded"
        );
        Ok(FloodTool::new(postcodes, zones))
    }

    pub fn postcodes(&self) -> &PostcodeTable {
        &self.postcodes
    }

    pub fn zones(&self) -> &RiskZoneTable {
        &self.zones
    }

    /// WGS84 latitude/longitude (degrees) of each postcode, `(NaN, NaN)` when unresolvable.
    pub fn lat_long<S: AsRef<str>>(&self, postcodes: &[S]) -> Vec<GeodeticCoord> {
        self.postcodes.resolve(postcodes)
    }

    /// OSGB36 easting/northing of each postcode, NaN when unresolvable.
    pub fn easting_northing<S: AsRef<str>>(&self, postcodes: &[S]) -> Vec<GridCoord> {
        self.lat_long(postcodes)
            .par_iter()
            .map(|c| lat_long_to_easting_northing(c.latitude, c.longitude, AngleUnit::Degrees))
            .collect()
    }

    /// Probability band at each (easting, northing) pair.
    ///
    /// Errors
    /// ------
    /// * [`FloodToolError::BatchLengthMismatch`] if the slices differ in length.
    pub fn easting_northing_flood_probability(
        &self,
        eastings: &[Meter],
        northings: &[Meter],
    ) -> Result<Vec<ProbabilityBand>, FloodToolError> {
        self.zones.classify_batch(eastings, northings)
    }

    /// Total property value of each postcode, `NaN` when unresolvable.
    pub fn flood_cost<S: AsRef<str>>(&self, postcodes: &[S]) -> Vec<Pound> {
        flood_cost(&self.postcodes, postcodes)
    }

    /// Annual flood risk of each postcode for the paired band.
    ///
    /// Errors
    /// ------
    /// * [`FloodToolError::BatchLengthMismatch`] if the slices differ in length.
    pub fn annual_flood_risk<S: AsRef<str>>(
        &self,
        postcodes: &[S],
        bands: &[ProbabilityBand],
    ) -> Result<Vec<Pound>, FloodToolError> {
        annual_risk(&self.postcodes, postcodes, bands)
    }

    /// Resolvable postcodes with their band, most severe first.
    pub fn sorted_flood_probability<S: AsRef<str>>(&self, postcodes: &[S]) -> ProbabilityReport {
        sorted_probabilities(&self.postcodes, &self.zones, postcodes)
    }

    /// Resolvable postcodes with their annual risk, highest first.
    pub fn sorted_annual_flood_risk<S: AsRef<str>>(&self, postcodes: &[S]) -> RiskReport {
        sorted_annual_risk(&self.postcodes, &self.zones, postcodes)
    }
}
