//! Field schemas and the [`Model`] trait.
//!
//! Every entity declares the shape of its wire representation as a static list of
//! [`Field`]s. Validation walks the whole list (recursing into nested objects) and
//! reports every failing field at once, so callers never see a partially checked
//! payload. Only after the schema accepts the payload is it handed to serde.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, FieldError, ValidationError};

/// Location used for errors about the payload itself.
pub const ROOT: &str = "__root__";

/// JSON type a field must carry.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// String
    Str,
    /// Signed integer
    Int,
    /// Non-negative integer
    UInt,
    /// Boolean
    Bool,
    /// `YYYY-MM-DD` string
    Date,
    /// Array of strings
    StrList,
    /// Open string-keyed object
    Map,
    /// Nested object with its own schema
    Object(&'static [Field]),
    /// Array of nested objects sharing one schema
    ObjectList(&'static [Field]),
}

/// Whether a field may be absent or null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-null
    Required,
    /// May be absent or null
    Nullable,
    /// May be absent (a default applies) but not null
    Defaulted,
}

/// One field of a model schema.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub presence: Presence,
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn nullable(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Nullable,
        }
    }

    pub const fn defaulted(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Defaulted,
        }
    }
}

/// A validated, serializable API entity.
pub trait Model: Sized + Serialize + DeserializeOwned {
    /// Wire schema of the entity
    const SCHEMA: &'static [Field];

    /// Validate an untyped mapping and build the entity.
    ///
    /// Fails with a [`ValidationError`] listing every field that failed; never
    /// returns a best-effort value.
    fn from_value(value: Value) -> Result<Self, ValidationError> {
        validate(Self::SCHEMA, &value)?;
        serde_json::from_value(value).map_err(|e| ValidationError::single(ROOT, e.to_string()))
    }

    /// Minimal wire payload for request bodies.
    fn to_payload(&self) -> Result<Value, ClientError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Check `value` against `schema`, collecting every failure.
pub fn validate(schema: &[Field], value: &Value) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    check_object(schema, value, "", &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

fn location(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn check_object(schema: &[Field], value: &Value, prefix: &str, errors: &mut Vec<FieldError>) {
    let Some(object) = value.as_object() else {
        let loc = if prefix.is_empty() { ROOT } else { prefix };
        errors.push(FieldError::new(loc, "value is not a valid dict"));
        return;
    };

    for field in schema {
        check_field(field, object, prefix, errors);
    }
}

fn check_field(
    field: &Field,
    object: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) {
    let loc = location(prefix, field.name);
    match (object.get(field.name), field.presence) {
        (None, Presence::Required) => errors.push(FieldError::new(loc, "field required")),
        (None, _) => {}
        (Some(Value::Null), Presence::Nullable) => {}
        (Some(Value::Null), _) => {
            errors.push(FieldError::new(loc, "none is not an allowed value"))
        }
        (Some(value), _) => check_kind(field.kind, value, &loc, errors),
    }
}

fn check_kind(kind: Kind, value: &Value, loc: &str, errors: &mut Vec<FieldError>) {
    let problem = match kind {
        Kind::Str => (!value.is_string()).then_some("str type expected"),
        Kind::Int => (!value.is_i64()).then_some("value is not a valid integer"),
        Kind::UInt => (!value.is_u64()).then_some("value is not a valid non-negative integer"),
        Kind::Bool => (!value.is_boolean()).then_some("value could not be parsed to a boolean"),
        Kind::Date => match value.as_str() {
            Some(text) if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok() => None,
            _ => Some("invalid date format, expected YYYY-MM-DD"),
        },
        Kind::Map => (!value.is_object()).then_some("value is not a valid dict"),
        Kind::StrList => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        errors.push(FieldError::new(
                            format!("{}.{}", loc, i),
                            "str type expected",
                        ));
                    }
                }
                None
            }
            None => Some("value is not a valid list"),
        },
        Kind::Object(schema) => {
            check_object(schema, value, loc, errors);
            None
        }
        Kind::ObjectList(schema) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_object(schema, item, &format!("{}.{}", loc, i), errors);
                }
                None
            }
            None => Some("value is not a valid list"),
        },
    };

    if let Some(msg) = problem {
        errors.push(FieldError::new(loc, msg));
    }
}

/// Deserialize a present value (including `null`) as `Some`, so that absent keys stay
/// `None` through `#[serde(default)]`. Used by tri-state update fields.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
