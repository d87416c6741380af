use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ValidationError, ViolationKind};
use crate::models::location::Location;
use crate::models::vehicle::Vehicle;
use crate::validation::{normalize_phone, ObjectReader};

const FIELDS: &[&str] = &["id", "name", "phone", "email", "vehicle", "location", "active"];

/// A courier. Setters keep the guarantees of construction; `phone` is
/// normalized on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Agent {
    id: String,
    name: String,
    phone: String,
    email: Option<String>,
    vehicle: Option<Vehicle>,
    location: Location,
    active: bool,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phone: &str,
        location: Location,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: normalize_phone(phone),
            email: None,
            vehicle: None,
            location,
            active: true,
        }
    }

    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        Self::from_value_at(raw, "")
    }

    pub(crate) fn from_value_at(raw: &Value, prefix: &str) -> Result<Self, ValidationError> {
        let mut fields = ObjectReader::open(raw, prefix, FIELDS)?;

        let id = fields.string("id");
        let name = fields.string("name");
        let phone = fields.string("phone");
        let email = fields.optional_string("email");
        let vehicle = fields.optional_object("vehicle", Vehicle::from_value_at);
        let location = fields.object("location", Location::from_value_at);
        let active = fields.bool_or("active", true);

        fields.finish()?;
        let (Some(id), Some(name), Some(phone), Some(location)) = (id, name, phone, location) else {
            return Err(ValidationError::single(prefix, ViolationKind::Missing, "incomplete agent"));
        };

        Ok(Self {
            id,
            name,
            phone: normalize_phone(&phone),
            email,
            vehicle,
            location,
            active,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_phone(&mut self, phone: &str) {
        self.phone = normalize_phone(phone);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    pub fn set_vehicle(&mut self, vehicle: Option<Vehicle>) {
        self.vehicle = vehicle;
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl TryFrom<Value> for Agent {
    type Error = ValidationError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::validate(&raw)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload() -> Value {
        json!({
            "id": "agent_7",
            "name": "Camille",
            "phone": "+33 (1) 23-45-67",
            "location": { "lat": 48.8566, "lon": 2.3522 }
        })
    }

    #[test]
    fn phone_is_normalized_and_defaults_apply() {
        let agent = Agent::validate(&payload()).unwrap();

        assert_eq!(agent.phone(), "+331234567");
        assert!(agent.is_active());
        assert!(agent.vehicle().is_none());
        assert!(agent.email().is_none());
    }

    #[test]
    fn phone_is_normalized_again_on_reassignment() {
        let mut agent = Agent::validate(&payload()).unwrap();
        agent.set_phone(" (555) 010-0199 ");

        assert_eq!(agent.phone(), "5550100199");
    }

    #[test]
    fn constructor_and_validation_agree() {
        let location = Location::new(48.8566, 2.3522, None).unwrap();
        let built = Agent::new("agent_7", "Camille", "+33 (1) 23-45-67", location);

        assert_eq!(built, Agent::validate(&payload()).unwrap());
    }

    #[test]
    fn owns_its_vehicle() {
        let mut raw = payload();
        raw["vehicle"] = json!({ "id": "v1", "type": "bike", "capacity_kg": 15 });
        raw["active"] = json!(false);

        let mut agent = Agent::validate(&raw).unwrap();
        assert_eq!(agent.vehicle().map(Vehicle::kind), Some("bike"));
        assert!(!agent.is_active());

        agent.set_vehicle(None);
        assert!(agent.vehicle().is_none());
    }

    #[test]
    fn nested_violations_carry_their_path() {
        let mut raw = payload();
        raw["vehicle"] = json!({ "id": "v1", "type": "bike", "capacity_kg": -1 });
        raw["location"] = json!({ "lat": 120, "lon": 0 });
        raw["active"] = json!("yes");

        let err = Agent::validate(&raw).unwrap_err();
        assert_eq!(err.len(), 3);
        assert!(err.has("vehicle.capacity_kg", ViolationKind::NotPositive));
        assert!(err.has("location.lat", ViolationKind::OutOfRange));
        assert!(err.has("active", ViolationKind::WrongType));
    }

    #[test]
    fn location_is_required() {
        let mut raw = payload();
        raw.as_object_mut().unwrap().remove("location");

        let err = Agent::validate(&raw).unwrap_err();
        assert!(err.has("location", ViolationKind::Missing));
    }
}
