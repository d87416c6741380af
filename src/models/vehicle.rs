use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ValidationError, ViolationKind};
use crate::validation::{check_positive, ObjectReader};

const FIELDS: &[&str] = &["id", "type", "capacity_kg", "license_plate"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Vehicle {
    id: String,
    /// Free-text category such as bike, car or van.
    #[serde(rename = "type")]
    kind: String,
    capacity_kg: f64,
    license_plate: Option<String>,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        capacity_kg: f64,
        license_plate: Option<String>,
    ) -> Result<Self, ValidationError> {
        let capacity_kg = check_positive("capacity_kg", capacity_kg).map_err(|violation| ValidationError {
            violations: vec![violation],
        })?;

        Ok(Self {
            id: id.into(),
            kind: kind.into(),
            capacity_kg,
            license_plate,
        })
    }

    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        Self::from_value_at(raw, "")
    }

    pub(crate) fn from_value_at(raw: &Value, prefix: &str) -> Result<Self, ValidationError> {
        let mut fields = ObjectReader::open(raw, prefix, FIELDS)?;

        let id = fields.string("id");
        let kind = fields.string("type");
        let capacity_kg = fields.number("capacity_kg").and_then(|capacity| {
            let path = fields.path("capacity_kg");
            fields.check(check_positive(&path, capacity))
        });
        let license_plate = fields.optional_string("license_plate");

        fields.finish()?;
        let (Some(id), Some(kind), Some(capacity_kg)) = (id, kind, capacity_kg) else {
            return Err(ValidationError::single(prefix, ViolationKind::Missing, "incomplete vehicle"));
        };

        Ok(Self {
            id,
            kind,
            capacity_kg,
            license_plate,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn capacity_kg(&self) -> f64 {
        self.capacity_kg
    }

    pub fn license_plate(&self) -> Option<&str> {
        self.license_plate.as_deref()
    }
}

impl TryFrom<Value> for Vehicle {
    type Error = ValidationError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::validate(&raw)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn category_travels_as_type() {
        let vehicle = Vehicle::validate(&json!({
            "id": "v1",
            "type": "van",
            "capacity_kg": 800,
            "license_plate": "AB-123-CD"
        }))
        .unwrap();

        assert_eq!(vehicle.kind(), "van");
        assert_eq!(vehicle.capacity_kg(), 800.0);

        let wire = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(wire["type"], "van");
        assert!(wire.get("kind").is_none());
    }

    #[test]
    fn capacity_must_be_positive() {
        let err = Vehicle::validate(&json!({ "id": "v1", "type": "bike", "capacity_kg": 0 })).unwrap_err();
        assert!(err.has("capacity_kg", ViolationKind::NotPositive));

        assert!(Vehicle::new("v2", "car", -5.0, None).is_err());
        assert!(Vehicle::new("v2", "car", 5.0, None).is_ok());
        assert!(Vehicle::new("v2", "car", f64::INFINITY, None).is_err());
    }

    #[test]
    fn missing_and_extra_fields_are_reported_together() {
        let err = Vehicle::validate(&json!({ "capacity_kg": 10, "wheels": 4 })).unwrap_err();
        assert_eq!(err.len(), 3);
        assert!(err.has("wheels", ViolationKind::UnknownField));
        assert!(err.has("id", ViolationKind::Missing));
        assert!(err.has("type", ViolationKind::Missing));
    }
}
