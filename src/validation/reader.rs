use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{ValidationError, Violation, ViolationKind};
use crate::validation::{field_path, parse_timestamp};

/// Pulls typed fields out of one JSON object while collecting every
/// violation instead of stopping at the first.
///
/// Each accessor returns `None` when the field could not be read; the
/// reason is recorded and surfaces from [`ObjectReader::finish`].
pub struct ObjectReader<'a> {
    prefix: String,
    object: &'a Map<String, Value>,
    violations: Vec<Violation>,
}

impl<'a> ObjectReader<'a> {
    /// Opens `value` as an object whose keys must all appear in `known`.
    pub fn open(value: &'a Value, prefix: &str, known: &[&str]) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or_else(|| {
            ValidationError::single(
                display_path(prefix),
                ViolationKind::WrongType,
                format!("expected an object, got {}", kind_of(value)),
            )
        })?;

        let violations = object
            .keys()
            .filter(|key| !known.contains(&key.as_str()))
            .map(|key| Violation {
                field: field_path(prefix, key),
                kind: ViolationKind::UnknownField,
                message: "unknown field".to_string(),
            })
            .collect();

        Ok(Self {
            prefix: prefix.to_string(),
            object,
            violations,
        })
    }

    pub fn path(&self, name: &str) -> String {
        field_path(&self.prefix, name)
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Keeps the value, or records why it was rejected.
    pub fn check<T>(&mut self, result: Result<T, Violation>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.violations.push(violation);
                None
            }
        }
    }

    pub fn string(&mut self, name: &str) -> Option<String> {
        let value = self.required(name)?;
        self.as_string(name, value)
    }

    pub fn optional_string(&mut self, name: &str) -> Option<String> {
        let value = self.optional(name)?;
        self.as_string(name, value)
    }

    pub fn number(&mut self, name: &str) -> Option<f64> {
        let value = self.required(name)?;
        match value.as_f64() {
            Some(number) => Some(number),
            None => self.wrong_type(name, "a number", value),
        }
    }

    pub fn bool_or(&mut self, name: &str, default: bool) -> bool {
        let Some(value) = self.object.get(name) else {
            return default;
        };
        match value.as_bool() {
            Some(flag) => flag,
            None => {
                self.wrong_type::<bool>(name, "a boolean", value);
                default
            }
        }
    }

    pub fn optional_timestamp(&mut self, name: &str) -> Option<DateTime<Utc>> {
        let raw = self.optional_string(name)?;
        let path = self.path(name);
        self.check(parse_timestamp(&path, &raw))
    }

    /// Like [`ObjectReader::bool_or`]: the default covers an absent key
    /// only, `null` is the wrong kind.
    pub fn timestamp_or(&mut self, name: &str, default: DateTime<Utc>) -> DateTime<Utc> {
        let Some(value) = self.object.get(name) else {
            return default;
        };
        let Some(raw) = value.as_str() else {
            self.wrong_type::<DateTime<Utc>>(name, "an RFC 3339 timestamp", value);
            return default;
        };
        let path = self.path(name);
        self.check(parse_timestamp(&path, raw)).unwrap_or(default)
    }

    /// Reads a string label through `parse`; `None` when absent or rejected.
    pub fn label<T>(&mut self, name: &str, allowed: &[&str], parse: fn(&str) -> Option<T>) -> Option<T> {
        let value = self.object.get(name)?;
        let Some(raw) = value.as_str() else {
            return self.wrong_type(name, "a string", value);
        };
        let parsed = parse(raw);
        if parsed.is_none() {
            let field = self.path(name);
            self.violations.push(Violation {
                field,
                kind: ViolationKind::InvalidEnum,
                message: format!("'{raw}' is not one of: {}", allowed.join(", ")),
            });
        }
        parsed
    }

    /// Validates a nested object with `parse`, merging its violations
    /// under this field's path.
    pub fn object<T>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&Value, &str) -> Result<T, ValidationError>,
    ) -> Option<T> {
        let value = self.required(name)?;
        self.nested(name, value, parse)
    }

    pub fn optional_object<T>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&Value, &str) -> Result<T, ValidationError>,
    ) -> Option<T> {
        let value = self.optional(name)?;
        self.nested(name, value, parse)
    }

    /// Fails with the full report if anything was recorded.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }

    fn nested<T>(
        &mut self,
        name: &str,
        value: &Value,
        parse: impl FnOnce(&Value, &str) -> Result<T, ValidationError>,
    ) -> Option<T> {
        let path = self.path(name);
        match parse(value, &path) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.violations.extend(err.violations);
                None
            }
        }
    }

    fn required(&mut self, name: &str) -> Option<&'a Value> {
        let value = self.object.get(name);
        if value.is_none() {
            let field = self.path(name);
            self.violations.push(Violation {
                field,
                kind: ViolationKind::Missing,
                message: "field required".to_string(),
            });
        }
        value
    }

    fn optional(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name).filter(|value| !value.is_null())
    }

    fn as_string(&mut self, name: &str, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(text) => Some(text.to_string()),
            None => self.wrong_type(name, "a string", value),
        }
    }

    fn wrong_type<T>(&mut self, name: &str, expected: &str, value: &Value) -> Option<T> {
        let field = self.path(name);
        self.violations.push(Violation {
            field,
            kind: ViolationKind::WrongType,
            message: format!("expected {expected}, got {}", kind_of(value)),
        });
        None
    }
}

fn display_path(prefix: &str) -> String {
    if prefix.is_empty() {
        "$".to_string()
    } else {
        prefix.to_string()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
