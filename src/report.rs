//! # Sorted flood reports
//!
//! [`ProbabilityReport`] and [`RiskReport`] are the ordered, postcode-keyed tables produced by
//! [`sorted_probabilities`](crate::risk::sorted_probabilities) and
//! [`sorted_annual_risk`](crate::risk::sorted_annual_risk).
//!
//! Two renderings are offered:
//!
//! - **Terminal**: [`fmt::Display`] draws a `comfy-table` grid with the `UTF8_FULL` preset.
//! - **CSV**: `write_csv` serialises the rows through `csv` + `serde`, one header line followed by
//!   one line per postcode.
//!
//! | report              | headers                          |
//! |---------------------|----------------------------------|
//! | [`ProbabilityReport`] | `Postcode`, `Probability Band` |
//! | [`RiskReport`]        | `Postcode`, `Flood Risk`       |

use std::fmt;
use std::io::Write;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};
use serde::Serialize;

use crate::constants::Pound;
use crate::flood_tool_errors::FloodToolError;
use crate::risk_zone::ProbabilityBand;

const POSTCODE_HEADER: &str = "Postcode";
const BAND_HEADER: &str = "Probability Band";
const RISK_HEADER: &str = "Flood Risk";

/// One row of a [`ProbabilityReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbabilityRow {
    #[serde(rename = "Postcode")]
    pub postcode: String,
    #[serde(rename = "Probability Band")]
    pub band: ProbabilityBand,
}

/// One row of a [`RiskReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRow {
    #[serde(rename = "Postcode")]
    pub postcode: String,
    /// Annual flood risk, in pounds.
    #[serde(rename = "Flood Risk")]
    pub risk: Pound,
}

/// Postcodes with their probability band, most severe first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbabilityReport {
    rows: Vec<ProbabilityRow>,
}

impl ProbabilityReport {
    /// Wrap already-sorted rows.
    pub fn new(rows: Vec<ProbabilityRow>) -> Self {
        ProbabilityReport { rows }
    }

    pub fn rows(&self) -> &[ProbabilityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Band of a normalised postcode, if it is in the report.
    pub fn band(&self, postcode: &str) -> Option<ProbabilityBand> {
        self.rows
            .iter()
            .find(|row| row.postcode == postcode)
            .map(|row| row.band)
    }

    pub fn postcodes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.postcode.as_str())
    }

    /// Write the report as CSV, header included even when empty.
    ///
    /// Errors
    /// ------
    /// * [`FloodToolError::CsvError`] on serialisation failure.
    /// * [`FloodToolError::IoError`] if the final flush fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), FloodToolError> {
        write_rows(writer, &self.rows, [POSTCODE_HEADER, BAND_HEADER])
    }
}

impl fmt::Display for ProbabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = new_table([POSTCODE_HEADER, BAND_HEADER]);
        for row in &self.rows {
            table.add_row(Row::from(vec![
                Cell::new(&row.postcode),
                Cell::new(row.band.label()),
            ]));
        }
        write!(f, "{table}")
    }
}

/// Postcodes with their annual flood risk, highest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RiskReport {
    rows: Vec<RiskRow>,
}

impl RiskReport {
    /// Wrap already-sorted rows.
    pub fn new(rows: Vec<RiskRow>) -> Self {
        RiskReport { rows }
    }

    pub fn rows(&self) -> &[RiskRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Risk of a normalised postcode, if it is in the report.
    pub fn risk(&self, postcode: &str) -> Option<Pound> {
        self.rows
            .iter()
            .find(|row| row.postcode == postcode)
            .map(|row| row.risk)
    }

    pub fn postcodes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.postcode.as_str())
    }

    /// Sum of every row's risk.
    pub fn total(&self) -> Pound {
        self.rows.iter().map(|row| row.risk).sum()
    }

    /// Write the report as CSV, header included even when empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), FloodToolError> {
        write_rows(writer, &self.rows, [POSTCODE_HEADER, RISK_HEADER])
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = new_table([POSTCODE_HEADER, RISK_HEADER]);
        for row in &self.rows {
            table.add_row(Row::from(vec![
                Cell::new(&row.postcode),
                Cell::new(format!("{:.2}", row.risk)).set_alignment(CellAlignment::Right),
            ]));
        }
        write!(f, "{table}")
    }
}

fn new_table(headers: [&str; 2]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(Vec::from(headers.map(Cell::new)));
    table
}

fn write_rows<W: Write, R: Serialize>(
    writer: W,
    rows: &[R],
    headers: [&str; 2],
) -> Result<(), FloodToolError> {
    let mut wtr = csv::Writer::from_writer(writer);

    // serde only emits the header alongside the first record
    if rows.is_empty() {
        wtr.write_record(headers)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
