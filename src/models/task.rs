use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{MetricError, ValidationError, Violation, ViolationKind};
use crate::geo::{eta_minutes, haversine_km, DEFAULT_AVG_SPEED_KMPH};
use crate::models::location::Location;
use crate::validation::{check_future, check_positive, Clock, ObjectReader, SystemClock};

const FIELDS: &[&str] = &[
    "id",
    "pickup",
    "dropoff",
    "weight_kg",
    "assigned_to",
    "status",
    "created_at",
    "scheduled_for",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Assigned,
    EnRoute,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const LABELS: [&'static str; 5] = ["pending", "assigned", "en_route", "completed", "cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Assigned => "assigned",
            JobStatus::EnRoute => "en_route",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub const ALL: [JobStatus; 5] = [
        JobStatus::Pending,
        JobStatus::Assigned,
        JobStatus::EnRoute,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];

    /// Parses the wire label through the serde representation.
    pub fn from_label(label: &str) -> Option<Self> {
        serde_json::from_value(Value::String(label.to_string())).ok()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct DeliveryTask {
    id: String,
    pickup: Location,
    dropoff: Location,
    weight_kg: f64,
    /// Agent id. Not checked against any registry.
    assigned_to: Option<String>,
    status: JobStatus,
    created_at: DateTime<Utc>,
    scheduled_for: Option<DateTime<Utc>>,
}

impl DeliveryTask {
    pub fn new(
        id: impl Into<String>,
        pickup: Location,
        dropoff: Location,
        weight_kg: f64,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        let weight_kg = check_positive("weight_kg", weight_kg).map_err(|violation| ValidationError {
            violations: vec![violation],
        })?;

        Ok(Self {
            id: id.into(),
            pickup,
            dropoff,
            weight_kg,
            assigned_to: None,
            status: JobStatus::Pending,
            created_at: clock.now(),
            scheduled_for: None,
        })
    }

    /// Validates `raw` against the wall clock.
    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        Self::validate_with_clock(raw, &SystemClock)
    }

    /// `created_at` defaults to `clock.now()`, and `scheduled_for` must be
    /// strictly after it.
    pub fn validate_with_clock(raw: &Value, clock: &dyn Clock) -> Result<Self, ValidationError> {
        let result = Self::from_value_at(raw, "", clock);
        match &result {
            Ok(task) => debug!(task_id = %task.id, "delivery task validated"),
            Err(err) => debug!(violations = err.len(), "delivery task rejected"),
        }
        result
    }

    fn from_value_at(raw: &Value, prefix: &str, clock: &dyn Clock) -> Result<Self, ValidationError> {
        let now = clock.now();
        let mut fields = ObjectReader::open(raw, prefix, FIELDS)?;

        let id = fields.string("id");
        let pickup = fields.object("pickup", Location::from_value_at);
        let dropoff = fields.object("dropoff", Location::from_value_at);
        let weight_kg = fields.number("weight_kg").and_then(|weight| {
            let path = fields.path("weight_kg");
            fields.check(check_positive(&path, weight))
        });
        let assigned_to = fields.optional_string("assigned_to");
        let status = fields
            .label("status", &JobStatus::LABELS, JobStatus::from_label)
            .unwrap_or_default();
        let created_at = fields.timestamp_or("created_at", now);
        let scheduled_for = fields.optional_timestamp("scheduled_for").and_then(|at| {
            let path = fields.path("scheduled_for");
            fields.check(check_future(&path, at, now))
        });

        fields.finish()?;
        let (Some(id), Some(pickup), Some(dropoff), Some(weight_kg)) = (id, pickup, dropoff, weight_kg) else {
            return Err(ValidationError::single(prefix, ViolationKind::Missing, "incomplete delivery task"));
        };

        Ok(Self {
            id,
            pickup,
            dropoff,
            weight_kg,
            assigned_to,
            status,
            created_at,
            scheduled_for,
        })
    }

    /// Sets the schedule; `at` must be strictly after `clock.now()`.
    pub fn schedule_for(&mut self, at: DateTime<Utc>, clock: &dyn Clock) -> Result<(), ValidationError> {
        let at = check_future("scheduled_for", at, clock.now()).map_err(|violation: Violation| ValidationError {
            violations: vec![violation],
        })?;
        self.scheduled_for = Some(at);
        Ok(())
    }

    pub fn assign_to(&mut self, agent_id: impl Into<String>) {
        self.assigned_to = Some(agent_id.into());
    }

    pub fn unassign(&mut self) {
        self.assigned_to = None;
    }

    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    /// Great-circle distance from pickup to dropoff.
    pub fn distance_km(&self) -> f64 {
        haversine_km(&self.pickup, &self.dropoff)
    }

    pub fn estimated_time_minutes(&self, avg_speed_kmph: f64) -> Result<u64, MetricError> {
        eta_minutes(self.distance_km(), avg_speed_kmph)
    }

    pub fn default_eta_minutes(&self) -> u64 {
        // The default speed is positive, so only the floor can apply.
        eta_minutes(self.distance_km(), DEFAULT_AVG_SPEED_KMPH).unwrap_or(1)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pickup(&self) -> &Location {
        &self.pickup
    }

    pub fn dropoff(&self) -> &Location {
        &self.dropoff
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn scheduled_for(&self) -> Option<DateTime<Utc>> {
        self.scheduled_for
    }
}

impl TryFrom<Value> for DeliveryTask {
    type Error = ValidationError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::validate(&raw)
    }
}
