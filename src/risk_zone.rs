//! # Flood risk zones and probability bands
//!
//! A [`RiskZone`] is a circle on the National Grid tagged with a [`ProbabilityBand`].
//! [`RiskZoneTable::classify`] returns the most severe band among the zones containing a
//! point, or [`ProbabilityBand::Zero`] when none does. Severity, not proximity, resolves
//! overlaps.
//!
//! ## Candidate search
//!
//! Zones are kept sorted by easting. A query first selects the easting window
//! `[e − r_max, e + r_max]` by binary search, where `r_max` is the largest radius in the
//! table, then filters on northing with the same half-width. The exact containment test
//! `distance ≤ radius` against each zone's own radius is the only predicate that decides
//! membership.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::Meter;
use crate::flood_tool_errors::{check_batch_lengths, FloodToolError};

/// Ordered flood probability band.
///
/// The derived ordering follows severity: `Zero < VeryLow < Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum ProbabilityBand {
    /// Synthetic band for points outside every zone. Never stored in a zone table.
    #[default]
    Zero,
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
}

impl ProbabilityBand {
    /// Every band, most severe first.
    pub const BY_SEVERITY: [ProbabilityBand; 5] = [
        ProbabilityBand::High,
        ProbabilityBand::Medium,
        ProbabilityBand::Low,
        ProbabilityBand::VeryLow,
        ProbabilityBand::Zero,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProbabilityBand::High => "High",
            ProbabilityBand::Medium => "Medium",
            ProbabilityBand::Low => "Low",
            ProbabilityBand::VeryLow => "Very Low",
            ProbabilityBand::Zero => "Zero",
        }
    }

    /// Annual probability of a flood event in this band.
    pub fn annual_probability(&self) -> f64 {
        match self {
            ProbabilityBand::High => 0.1,
            ProbabilityBand::Medium => 0.02,
            ProbabilityBand::Low => 0.01,
            ProbabilityBand::VeryLow => 0.001,
            ProbabilityBand::Zero => 0.0,
        }
    }
}

impl fmt::Display for ProbabilityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProbabilityBand {
    type Err = FloodToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "High" => Ok(ProbabilityBand::High),
            "Medium" => Ok(ProbabilityBand::Medium),
            "Low" => Ok(ProbabilityBand::Low),
            "Very Low" => Ok(ProbabilityBand::VeryLow),
            "Zero" => Ok(ProbabilityBand::Zero),
            other => Err(FloodToolError::UnknownProbabilityBand(other.to_string())),
        }
    }
}

/// A circular risk zone on the National Grid.
///
/// Only [`RiskZone::new`] builds one, so a stored radius is never negative or NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskZone {
    id: usize,
    easting: Meter,
    northing: Meter,
    radius: Meter,
    band: ProbabilityBand,
}

impl RiskZone {
    /// Build a zone, rejecting negative (or NaN) radii.
    pub fn new(
        id: usize,
        easting: Meter,
        northing: Meter,
        radius: Meter,
        band: ProbabilityBand,
    ) -> Result<Self, FloodToolError> {
        if radius.is_nan() || radius < 0.0 {
            return Err(FloodToolError::NegativeRadius(radius));
        }
        Ok(RiskZone {
            id,
            easting,
            northing,
            radius,
            band,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn easting(&self) -> Meter {
        self.easting
    }

    pub fn northing(&self) -> Meter {
        self.northing
    }

    pub fn radius(&self) -> Meter {
        self.radius
    }

    pub fn band(&self) -> ProbabilityBand {
        self.band
    }

    /// Exact containment test, boundary included.
    #[inline]
    pub fn contains(&self, easting: Meter, northing: Meter) -> bool {
        let de = easting - self.easting;
        let dn = northing - self.northing;
        (de * de + dn * dn).sqrt() <= self.radius
    }
}

/// Read-only collection of risk zones.
#[derive(Debug, Clone, Default)]
pub struct RiskZoneTable {
    /// Sorted by easting.
    zones: Vec<RiskZone>,
    max_radius: Meter,
}

impl RiskZoneTable {
    pub fn new(zones: impl IntoIterator<Item = RiskZone>) -> Self {
        let mut zones: Vec<RiskZone> = zones.into_iter().collect();
        zones.sort_by(|a, b| a.easting.total_cmp(&b.easting));

        let max_radius = zones.iter().map(|z| z.radius).fold(0.0, f64::max);

        tracing::debug!(zones = zones.len(), max_radius, "risk zone table built");
        RiskZoneTable { zones, max_radius }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn max_radius(&self) -> Meter {
        self.max_radius
    }

    /// Zones whose bounding box (half-width `max_radius`) contains the point.
    fn candidates(&self, easting: Meter, northing: Meter) -> impl Iterator<Item = &RiskZone> {
        let r = self.max_radius;
        let lo = self.zones.partition_point(|z| z.easting < easting - r);
        let hi = self.zones.partition_point(|z| z.easting <= easting + r);

        self.zones[lo..hi.max(lo)]
            .iter()
            .filter(move |z| (z.northing - northing).abs() <= r)
    }

    /// All zones containing the point, in easting order.
    pub fn containing(&self, easting: Meter, northing: Meter) -> Vec<&RiskZone> {
        self.candidates(easting, northing)
            .filter(|z| z.contains(easting, northing))
            .collect()
    }

    /// Most severe band among the zones containing the point, `Zero` if none.
    pub fn classify(&self, easting: Meter, northing: Meter) -> ProbabilityBand {
        let mut band = ProbabilityBand::Zero;
        for zone in self.candidates(easting, northing) {
            if zone.band > band && zone.contains(easting, northing) {
                band = zone.band;
                if band == ProbabilityBand::High {
                    break;
                }
            }
        }
        band
    }

    /// Element-wise [`classify`](Self::classify), order preserved.
    ///
    /// Errors
    /// ------
    /// * [`FloodToolError::BatchLengthMismatch`] if the slices differ in length.
    pub fn classify_batch(
        &self,
        eastings: &[Meter],
        northings: &[Meter],
    ) -> Result<Vec<ProbabilityBand>, FloodToolError> {
        check_batch_lengths(eastings.len(), northings.len())?;
        Ok(eastings
            .par_iter()
            .zip(northings.par_iter())
            .map(|(&e, &n)| self.classify(e, n))
            .collect())
    }
}
