//! # CSV table loading
//!
//! Builds the in-memory [`PostcodeTable`] and [`RiskZoneTable`] from the three CSV resources
//! shipped with the tool.
//!
//! | file                     | columns used                              |
//! |--------------------------|-------------------------------------------|
//! | `postcodes.csv`          | `Postcode`, `Latitude`, `Longitude`       |
//! | `property_value.csv`     | `Postcode`, `Total Value`                 |
//! | `flood_probability.csv`  | `X`, `Y`, `radius`, `prob_4band`          |
//!
//! Columns are matched by header name, so extra columns (a leading unnamed index, `Lat`/`Long`
//! duplicates, ...) are ignored.
//!
//! ## Property values
//!
//! * rows with an empty postcode are dropped;
//! * postcodes longer than 7 characters have their spaces removed;
//! * values are joined onto the postcode table by normalised postcode, and postcodes without a
//!   value get `0.0`.
//!
//! ## Risk zones
//!
//! * a zone's identifier is its row position in the file;
//! * rows with an unknown `prob_4band` label are dropped with a warning;
//! * a negative radius is an error.

use std::fs::File;
use std::io::Read;

use ahash::AHashMap;
use camino::Utf8Path;
use serde::Deserialize;

use crate::constants::{Degree, Meter, Pound};
use crate::flood_tool_errors::FloodToolError;
use crate::postcode::{normalize, PostcodeRecord, PostcodeTable};
use crate::risk_zone::{ProbabilityBand, RiskZone, RiskZoneTable};

#[derive(Debug, Deserialize, PartialEq)]
struct PostcodeRow {
    #[serde(rename = "Postcode")]
    postcode: String,
    #[serde(rename = "Latitude")]
    latitude: Degree,
    #[serde(rename = "Longitude")]
    longitude: Degree,
}

#[derive(Debug, Deserialize, PartialEq)]
struct PropertyValueRow {
    #[serde(rename = "Postcode")]
    postcode: Option<String>,
    #[serde(rename = "Total Value")]
    total_value: Option<Pound>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct RiskZoneRow {
    #[serde(rename = "X")]
    easting: Meter,
    #[serde(rename = "Y")]
    northing: Meter,
    radius: Meter,
    prob_4band: String,
}

/// Open a resource file, reporting a missing file distinctly from other I/O failures.
fn open_resource(path: &Utf8Path) -> Result<File, FloodToolError> {
    if !path.exists() {
        return Err(FloodToolError::DataFileNotFound(path.to_string()));
    }
    Ok(File::open(path)?)
}

/// Parse the property value table into `normalised postcode → value`.
fn read_property_values<R: Read>(reader: R) -> Result<AHashMap<String, Pound>, FloodToolError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut values = AHashMap::new();
    let mut dropped = 0usize;

    for row in rdr.deserialize::<PropertyValueRow>() {
        let row = row?;
        let Some(postcode) = row.postcode.filter(|pc| !pc.trim().is_empty()) else {
            dropped += 1;
            continue;
        };

        let postcode = if postcode.chars().count() > 7 {
            postcode.replace(' ', "")
        } else {
            postcode
        };
        values.insert(normalize(&postcode), row.total_value.unwrap_or(0.0));
    }

    if dropped > 0 {
        tracing::warn!(dropped, "dropped property value rows without a postcode");
    }
    Ok(values)
}

/// Build a [`PostcodeTable`] from postcode and property value CSV readers.
///
/// Arguments
/// ---------
/// * `postcodes`: CSV with `Postcode`, `Latitude`, `Longitude` columns.
/// * `values`: CSV with `Postcode`, `Total Value` columns.
///
/// Returns
/// -------
/// * The joined table; postcodes without a property value get `0.0`.
///
/// Errors
/// ------
/// * [`FloodToolError::CsvError`] on malformed CSV or missing columns.
pub fn read_postcode_table<P: Read, V: Read>(
    postcodes: P,
    values: V,
) -> Result<PostcodeTable, FloodToolError> {
    let values = read_property_values(values)?;

    let mut rdr = csv::Reader::from_reader(postcodes);
    let records = rdr
        .deserialize::<PostcodeRow>()
        .map(|row| -> Result<PostcodeRecord, FloodToolError> {
            let row = row?;
            let total_value = values
                .get(&normalize(&row.postcode))
                .copied()
                .unwrap_or(0.0);
            Ok(PostcodeRecord::new(
                &row.postcode,
                row.latitude,
                row.longitude,
                total_value,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PostcodeTable::new(records))
}

/// Build a [`RiskZoneTable`] from a flood probability CSV reader.
///
/// Errors
/// ------
/// * [`FloodToolError::CsvError`] on malformed CSV or missing columns.
/// * [`FloodToolError::NegativeRadius`] if a zone has a negative radius.
pub fn read_risk_zone_table<R: Read>(reader: R) -> Result<RiskZoneTable, FloodToolError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut zones = Vec::new();

    for (id, row) in rdr.deserialize::<RiskZoneRow>().enumerate() {
        let row = row?;
        let band = match row.prob_4band.parse::<ProbabilityBand>() {
            Ok(ProbabilityBand::Zero) | Err(_) => {
                tracing::warn!(id, label = %row.prob_4band, "dropped risk zone with unknown band");
                continue;
            }
            Ok(band) => band,
        };
        zones.push(RiskZone::new(
            id,
            row.easting,
            row.northing,
            row.radius,
            band,
        )?);
    }

    Ok(RiskZoneTable::new(zones))
}

/// Load the postcode table from files on disk.
///
/// Errors
/// ------
/// * [`FloodToolError::DataFileNotFound`] if either file is missing.
pub fn load_postcode_table(
    postcodes: &Utf8Path,
    values: &Utf8Path,
) -> Result<PostcodeTable, FloodToolError> {
    read_postcode_table(open_resource(postcodes)?, open_resource(values)?)
}

/// Load the risk zone table from a file on disk.
pub fn load_risk_zone_table(path: &Utf8Path) -> Result<RiskZoneTable, FloodToolError> {
    read_risk_zone_table(open_resource(path)?)
}

#[cfg(test)]
mod table_reader_test {
    use super::*;

    const POSTCODES: &str = "\
Postcode,Latitude,Longitude
DA1 1PT,51.4466,0.2176
DA9 9NT,51.4484,0.2760
CT147PF,51.2225,1.3897
";

    const VALUES: &str = "\
Postcode,Total Value
DA1 1PT,1406250.17
,999.0
DA9  9NT,0.0
";

    const ZONES: &str = "\
,X,Y,radius,prob_4band
0,554200.0,174300.0,200.0,Medium
1,554000.0,174000.0,1000.0,Very Low
2,558000.0,174500.0,500.0,Low
3,600000.0,150000.0,50.0,Severe
";

    #[test]
    fn test_read_postcode_table() {
        let table = read_postcode_table(POSTCODES.as_bytes(), VALUES.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);

        let rec = table.record("da11pt").unwrap();
        assert_eq!(rec.latitude, 51.4466);
        assert_eq!(rec.total_value, 1_406_250.17);

        // "DA9  9NT" has 8 characters: its spaces are stripped before the join
        assert_eq!(table.record("DA9 9NT").unwrap().total_value, 0.0);
        // no property value row at all
        assert_eq!(table.record("CT14 7PF").unwrap().total_value, 0.0);
    }

    #[test]
    fn test_property_value_preprocessing() {
        let values = read_property_values(VALUES.as_bytes()).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("DA9 9NT"), Some(&0.0));

        let missing = read_property_values("Postcode,Total Value\nN1  6AA,\n".as_bytes()).unwrap();
        assert_eq!(missing.get("N1  6AA"), Some(&0.0));
    }

    #[test]
    fn test_read_risk_zone_table() {
        let zones = read_risk_zone_table(ZONES.as_bytes()).unwrap();
        assert_eq!(zones.len(), 3);
        assert_eq!(zones.max_radius(), 1000.0);
        assert_eq!(zones.classify(554_202.0, 174_289.0), ProbabilityBand::Medium);
        assert_eq!(zones.classify(558_253.0, 174_613.0), ProbabilityBand::Low);
        assert_eq!(zones.classify(600_000.0, 150_000.0), ProbabilityBand::Zero);
    }

    #[test]
    fn test_negative_radius_is_an_error() {
        let data = "X,Y,radius,prob_4band\n1.0,2.0,-3.0,High\n";
        assert_eq!(
            read_risk_zone_table(data.as_bytes()).unwrap_err(),
            FloodToolError::NegativeRadius(-3.0)
        );
    }

    #[test]
    fn test_missing_column_is_a_csv_error() {
        let data = "X,Y,prob_4band\n1.0,2.0,High\n";
        assert!(matches!(
            read_risk_zone_table(data.as_bytes()),
            Err(FloodToolError::CsvError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = Utf8Path::new("does/not/exist/postcodes.csv");
        assert_eq!(
            load_risk_zone_table(path).unwrap_err(),
            FloodToolError::DataFileNotFound("does/not/exist/postcodes.csv".into())
        );
    }
}
