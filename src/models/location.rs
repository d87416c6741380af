use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ValidationError, ViolationKind};
use crate::validation::{check_range, round_coordinate, ObjectReader, LAT_RANGE, LON_RANGE};

const FIELDS: &[&str] = &["lat", "lon", "address"];

/// A geographic point. Coordinates are range-checked, then stored rounded
/// to six decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Location {
    lat: f64,
    lon: f64,
    address: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lon: f64, address: Option<String>) -> Result<Self, ValidationError> {
        let violations: Vec<_> = [check_range("lat", lat, LAT_RANGE), check_range("lon", lon, LON_RANGE)]
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(Self {
            lat: round_coordinate(lat),
            lon: round_coordinate(lon),
            address,
        })
    }

    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        Self::from_value_at(raw, "")
    }

    pub(crate) fn from_value_at(raw: &Value, prefix: &str) -> Result<Self, ValidationError> {
        let mut fields = ObjectReader::open(raw, prefix, FIELDS)?;

        let lat = fields.number("lat").and_then(|lat| {
            let path = fields.path("lat");
            fields.check(check_range(&path, lat, LAT_RANGE))
        });
        let lon = fields.number("lon").and_then(|lon| {
            let path = fields.path("lon");
            fields.check(check_range(&path, lon, LON_RANGE))
        });
        let address = fields.optional_string("address");

        fields.finish()?;
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(ValidationError::single(
                prefix,
                ViolationKind::Missing,
                "incomplete location",
            ));
        };

        Ok(Self {
            lat: round_coordinate(lat),
            lon: round_coordinate(lon),
            address,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

impl TryFrom<Value> for Location {
    type Error = ValidationError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::validate(&raw)
    }
}
