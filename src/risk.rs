//! # Flood cost and annual risk aggregation
//!
//! Combines the [`PostcodeTable`] (coordinates and property values) with the
//! [`RiskZoneTable`] (probability bands) into per-postcode cost, annual risk, and sorted
//! reports.
//!
//! ```text
//! annual risk = RISK_FACTOR × p(band) × total property value
//! ```
//!
//! Unresolvable postcodes carry a `NaN` cost through every arithmetic step; they are only
//! removed by the sorted reports.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::constants::{AngleUnit, Pound, RISK_FACTOR};
use crate::flood_tool_errors::{check_batch_lengths, FloodToolError};
use crate::postcode::{normalize, PostcodeRecord, PostcodeTable};
use crate::projection::lat_long_to_easting_northing;
use crate::report::{ProbabilityReport, ProbabilityRow, RiskReport, RiskRow};
use crate::risk_zone::{ProbabilityBand, RiskZoneTable};

/// Annual risk of a single property.
#[inline]
pub fn risk_value(cost: Pound, band: ProbabilityBand) -> Pound {
    RISK_FACTOR * band.annual_probability() * cost
}

/// Total property value for each postcode.
///
/// Arguments
/// ---------
/// * `table`: resolved postcodes with their property values.
/// * `postcodes`: raw postcode strings.
///
/// Returns
/// -------
/// * One value per input, in input order. `NaN` for unresolvable postcodes.
pub fn flood_cost<S: AsRef<str>>(table: &PostcodeTable, postcodes: &[S]) -> Vec<Pound> {
    table.total_values(postcodes)
}

/// Annual flood risk for each postcode given its probability band.
///
/// Arguments
/// ---------
/// * `table`: resolved postcodes with their property values.
/// * `postcodes`: raw postcode strings.
/// * `bands`: band of each postcode, paired by position.
///
/// Returns
/// -------
/// * `0.05 × p(band) × cost` per input. `NaN` costs stay `NaN`.
///
/// Errors
/// ------
/// * [`FloodToolError::BatchLengthMismatch`] if `postcodes` and `bands` differ in length.
pub fn annual_risk<S: AsRef<str>>(
    table: &PostcodeTable,
    postcodes: &[S],
    bands: &[ProbabilityBand],
) -> Result<Vec<Pound>, FloodToolError> {
    check_batch_lengths(postcodes.len(), bands.len())?;
    Ok(flood_cost(table, postcodes)
        .into_iter()
        .zip(bands)
        .map(|(cost, &band)| risk_value(cost, band))
        .collect())
}

/// Resolve, deduplicate and classify postcodes, keeping the records for later aggregation.
fn classified_records<'a, S: AsRef<str>>(
    postcodes: &'a PostcodeTable,
    zones: &RiskZoneTable,
    query: &[S],
) -> Vec<(&'a PostcodeRecord, ProbabilityBand)> {
    let records: Vec<&PostcodeRecord> = query
        .iter()
        .map(|pc| normalize(pc.as_ref()))
        .unique()
        .filter_map(|key| postcodes.record(&key))
        .collect();

    tracing::debug!(
        requested = query.len(),
        resolved = records.len(),
        "dropped unresolvable and duplicate postcodes"
    );

    records
        .into_par_iter()
        .map(|rec| {
            let grid =
                lat_long_to_easting_northing(rec.latitude, rec.longitude, AngleUnit::Degrees);
            (rec, zones.classify(grid.easting, grid.northing))
        })
        .collect()
}

/// Probability band of every resolvable postcode, most severe first.
///
/// Postcodes are normalised, unresolvable ones and duplicates are dropped, the rest are
/// projected onto the National Grid and classified. Rows are sorted by band severity
/// (High → Zero) then by postcode.
///
/// See also
/// --------
/// * [`sorted_annual_risk`] – the same postcodes ranked by annual risk.
pub fn sorted_probabilities<S: AsRef<str>>(
    postcodes: &PostcodeTable,
    zones: &RiskZoneTable,
    query: &[S],
) -> ProbabilityReport {
    let mut rows: Vec<ProbabilityRow> = classified_records(postcodes, zones, query)
        .into_iter()
        .map(|(rec, band)| ProbabilityRow {
            postcode: rec.postcode.clone(),
            band,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.band
            .cmp(&a.band)
            .then_with(|| a.postcode.cmp(&b.postcode))
    });

    ProbabilityReport::new(rows)
}

/// Annual flood risk of every resolvable postcode, highest first.
///
/// Built on the same resolution and classification as [`sorted_probabilities`]. Rows are
/// sorted by descending risk, ties broken by ascending postcode. A record whose property
/// value is `NaN` has a `NaN` risk and is placed after every numeric row.
pub fn sorted_annual_risk<S: AsRef<str>>(
    postcodes: &PostcodeTable,
    zones: &RiskZoneTable,
    query: &[S],
) -> RiskReport {
    let mut rows: Vec<RiskRow> = classified_records(postcodes, zones, query)
        .into_iter()
        .map(|(rec, band)| RiskRow {
            postcode: rec.postcode.clone(),
            risk: risk_value(rec.total_value, band),
        })
        .collect();

    // OrderedFloat ranks NaN above every number; NaN rows go last instead
    rows.sort_by(|a, b| {
        a.risk
            .is_nan()
            .cmp(&b.risk.is_nan())
            .then_with(|| OrderedFloat(b.risk).cmp(&OrderedFloat(a.risk)))
            .then_with(|| a.postcode.cmp(&b.postcode))
    });

    RiskReport::new(rows)
}
