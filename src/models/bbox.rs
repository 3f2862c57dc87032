//! Bounding box acquisition and request normalization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a request could not be turned into a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BboxError {
    /// The combined string did not split into exactly four segments
    #[error("Invalid bbox format. Use: min_lon,min_lat,max_lon,max_lat")]
    InvalidFormat,
    /// A segment or discrete field is not a number
    #[error("BBox values must be numeric")]
    NonNumericValue,
    /// Neither the combined string nor all four discrete fields were given
    #[error("Provide bbox either as one parameter or four separate parameters.")]
    MissingBoundingBox,
}

/// Geographic extent as `[min_lon, min_lat, max_lon, max_lat]`.
///
/// Only arity and numeric parseability are checked; ordering and range
/// are taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Map center as `(lat, lon)`, anchored on the south-west corner
    pub fn center_hint(&self) -> (f64, f64) {
        (self.min_lat, self.min_lon)
    }

    /// Comma-joined form accepted by the `bbox` query parameter
    pub fn to_query_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.to_query_string())
    }
}

/// Parse one coordinate. `NaN` and infinities are not usable coordinates.
fn parse_value(raw: &str) -> Result<f64, BboxError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(BboxError::NonNumericValue)
}

fn present(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

/// Resolve a bounding box from either the combined string or the four
/// discrete fields. A non-empty combined string always wins.
pub fn normalize(
    bbox: Option<&str>,
    min_lon: Option<&str>,
    min_lat: Option<&str>,
    max_lon: Option<&str>,
    max_lat: Option<&str>,
) -> Result<BoundingBox, BboxError> {
    if let Some(s) = bbox.filter(|s| !s.is_empty()) {
        // Every segment is parsed before arity is checked
        let values = s
            .split(',')
            .map(parse_value)
            .collect::<Result<Vec<f64>, _>>()?;

        return match values.as_slice() {
            [a, b, c, d] => Ok(BoundingBox::new(*a, *b, *c, *d)),
            _ => Err(BboxError::InvalidFormat),
        };
    }

    match (
        present(min_lon),
        present(min_lat),
        present(max_lon),
        present(max_lat),
    ) {
        (Some(a), Some(b), Some(c), Some(d)) => Ok(BoundingBox::new(
            parse_value(a)?,
            parse_value(b)?,
            parse_value(c)?,
            parse_value(d)?,
        )),
        _ => Err(BboxError::MissingBoundingBox),
    }
}
