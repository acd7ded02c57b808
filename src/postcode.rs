//! # Postcode normalisation and lookup
//!
//! Postcodes are keyed in their 7-character fixed-width form: the outward code is padded
//! with spaces so the inward code (digit + two letters) always starts at the 5th character.
//!
//! | raw          | key         |
//! |--------------|-------------|
//! | `"da99ty"`   | `"DA9 9TY"` |
//! | `"n16aa"`    | `"N1  6AA"` |
//! | `"cT14 7nW"` | `"CT147NW"` |
//! | `"DA1 1PT"`  | `"DA1 1PT"` |
//!
//! [`normalize`] never fails: malformed input still yields a key, which simply misses in the
//! [`PostcodeTable`]. Lookups on a miss return the NaN sentinel instead of an error, so batch
//! results always have one row per input.

use std::sync::LazyLock;

use ahash::AHashMap;
use regex::Regex;

use crate::cartesian::GeodeticCoord;
use crate::constants::{Degree, Pound};

/// UK postcode syntax on a normalised key: outward code, optional padding, inward code.
static POSTCODE_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(GIR 0AA|[A-Z]{1,2}[0-9][A-Z0-9]? {0,2}[0-9][A-Z]{2})$").unwrap()
});

/// Normalise a raw postcode string to its lookup key.
///
/// Steps, applied in order:
/// 1. uppercase;
/// 2. longer than 7 characters: remove every space;
/// 3. 5 characters: insert two spaces after the 2nd character;
/// 4. 6 characters and the 3rd character is not a space: insert one space after the 3rd.
///
/// The function is total and idempotent.
pub fn normalize(raw: &str) -> String {
    let mut chars: Vec<char> = raw.to_uppercase().chars().collect();

    if chars.len() > 7 {
        chars.retain(|c| *c != ' ');
    }

    match chars.len() {
        5 => {
            chars.insert(2, ' ');
            chars.insert(2, ' ');
        }
        6 if chars[2] != ' ' => {
            chars.insert(3, ' ');
        }
        _ => {}
    }

    chars.into_iter().collect()
}

/// True when a normalised key has valid UK postcode syntax.
///
/// Informational only: lookups are attempted for every key.
pub fn is_well_formed(normalized: &str) -> bool {
    POSTCODE_SYNTAX.is_match(normalized)
}

/// One row of the postcode table.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeRecord {
    pub postcode: String,
    pub latitude: Degree,
    pub longitude: Degree,
    /// Total property value at the postcode, `0.0` when unknown.
    pub total_value: Pound,
}

impl PostcodeRecord {
    pub fn new(postcode: &str, latitude: Degree, longitude: Degree, total_value: Pound) -> Self {
        PostcodeRecord {
            postcode: postcode.to_string(),
            latitude,
            longitude,
            total_value,
        }
    }

    pub fn coord(&self) -> GeodeticCoord {
        GeodeticCoord::new(self.latitude, self.longitude)
    }
}

/// Immutable postcode → record lookup.
#[derive(Debug, Clone, Default)]
pub struct PostcodeTable {
    records: AHashMap<String, PostcodeRecord>,
}

impl PostcodeTable {
    /// Build the table, keying every record by its normalised postcode.
    ///
    /// When two records share a key the last one is kept.
    pub fn new(records: impl IntoIterator<Item = PostcodeRecord>) -> Self {
        let records: AHashMap<String, PostcodeRecord> = records
            .into_iter()
            .map(|mut rec| {
                rec.postcode = normalize(&rec.postcode);
                (rec.postcode.clone(), rec)
            })
            .collect();

        tracing::debug!(postcodes = records.len(), "postcode table built");
        PostcodeTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a raw postcode, normalising it first.
    pub fn record(&self, postcode: &str) -> Option<&PostcodeRecord> {
        self.records.get(&normalize(postcode))
    }

    /// Resolve postcodes to WGS84 (latitude, longitude) in degrees.
    ///
    /// Arguments
    /// ---------
    /// * `postcodes`: raw postcode strings, normalised before lookup.
    ///
    /// Returns
    /// -------
    /// * One [`GeodeticCoord`] per input, in input order, duplicates included.
    ///   Unresolvable postcodes yield `(NaN, NaN)`.
    pub fn resolve<S: AsRef<str>>(&self, postcodes: &[S]) -> Vec<GeodeticCoord> {
        postcodes
            .iter()
            .map(|pc| {
                self.record(pc.as_ref())
                    .map_or_else(GeodeticCoord::nan, PostcodeRecord::coord)
            })
            .collect()
    }

    /// Total property value per postcode, `NaN` when unresolvable.
    pub fn total_values<S: AsRef<str>>(&self, postcodes: &[S]) -> Vec<Pound> {
        postcodes
            .iter()
            .map(|pc| {
                self.record(pc.as_ref())
                    .map_or(f64::NAN, |rec| rec.total_value)
            })
            .collect()
    }
}
