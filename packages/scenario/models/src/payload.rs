//! Field-level validation of loosely-typed JSON tree payloads.
//!
//! Numeric fields accept JSON numbers or numeric strings. Integer fields
//! accept integral numbers or integer strings. `null` is never accepted.

use serde_json::{Map, Value};

use crate::{NewTree, TreeUpdate};

/// A raw JSON object as received from a client.
pub type TreePayload = Map<String, Value>;

/// Species used when an add payload omits `species_id`.
pub const DEFAULT_SPECIES_ID: &str = "red_maple";

/// Diameter used when an add payload omits `dbh_in`.
pub const DEFAULT_DBH_IN: f64 = 2.0;

/// Planting year used when an add payload omits `planting_year`.
pub const DEFAULT_PLANTING_YEAR: i32 = 2026;

/// A single payload field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A required field is absent.
    Missing {
        /// Field name.
        field: &'static str,
    },
    /// A field is present but cannot be converted to its expected type.
    NotConvertible {
        /// Field name.
        field: &'static str,
        /// The received JSON value, rendered as text.
        value: String,
    },
    /// A field converted but is outside its allowed range.
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// What the field must satisfy.
        message: String,
    },
}

impl FieldError {
    /// Returns the name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::NotConvertible { field, .. }
            | Self::OutOfRange { field, .. } => *field,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "missing required field `{field}`"),
            Self::NotConvertible { field, value } => {
                write!(f, "field `{field}` has unconvertible value {value}")
            }
            Self::OutOfRange { field, message } => write!(f, "field `{field}` {message}"),
        }
    }
}

impl std::error::Error for FieldError {}

impl NewTree {
    /// Validates an add payload, applying defaults for optional fields.
    ///
    /// `lon` and `lat` are required; `species_id`, `dbh_in`, and
    /// `planting_year` fall back to [`DEFAULT_SPECIES_ID`],
    /// [`DEFAULT_DBH_IN`], and [`DEFAULT_PLANTING_YEAR`].
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError`] encountered, in the order `lon`,
    /// `lat`, `species_id`, `dbh_in`, `planting_year`.
    pub fn from_payload(payload: &TreePayload) -> Result<Self, FieldError> {
        let lon = coordinate(payload, "lon")?.ok_or(FieldError::Missing { field: "lon" })?;
        let lat = coordinate(payload, "lat")?.ok_or(FieldError::Missing { field: "lat" })?;
        let species_id = string_field(payload, "species_id")?
            .unwrap_or_else(|| DEFAULT_SPECIES_ID.to_string());
        let dbh_in = diameter(payload, "dbh_in")?.unwrap_or(DEFAULT_DBH_IN);
        let planting_year =
            integer_field(payload, "planting_year")?.unwrap_or(DEFAULT_PLANTING_YEAR);

        Ok(Self {
            lon,
            lat,
            species_id,
            dbh_in,
            planting_year,
        })
    }
}

impl TreeUpdate {
    /// Validates a partial-update payload. Absent fields stay `None`;
    /// unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError`] encountered.
    pub fn from_payload(payload: &TreePayload) -> Result<Self, FieldError> {
        Ok(Self {
            lon: coordinate(payload, "lon")?,
            lat: coordinate(payload, "lat")?,
            species_id: string_field(payload, "species_id")?,
            dbh_in: diameter(payload, "dbh_in")?,
            planting_year: integer_field(payload, "planting_year")?,
        })
    }
}

fn not_convertible(field: &'static str, value: &Value) -> FieldError {
    FieldError::NotConvertible {
        field,
        value: value.to_string(),
    }
}

fn number_field(payload: &TreePayload, field: &'static str) -> Result<Option<f64>, FieldError> {
    let Some(value) = payload.get(field) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .map(Some)
        .ok_or_else(|| not_convertible(field, value))
}

fn coordinate(payload: &TreePayload, field: &'static str) -> Result<Option<f64>, FieldError> {
    match number_field(payload, field)? {
        Some(v) if !v.is_finite() => Err(FieldError::OutOfRange {
            field,
            message: "must be a finite number of degrees".to_string(),
        }),
        other => Ok(other),
    }
}

fn diameter(payload: &TreePayload, field: &'static str) -> Result<Option<f64>, FieldError> {
    match number_field(payload, field)? {
        Some(v) if !v.is_finite() || v < 0.0 => Err(FieldError::OutOfRange {
            field,
            message: "must be a finite, non-negative number of inches".to_string(),
        }),
        other => Ok(other),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integer_field(payload: &TreePayload, field: &'static str) -> Result<Option<i32>, FieldError> {
    let Some(value) = payload.get(field) else {
        return Ok(None);
    };

    let wide = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| not_convertible(field, value))?;

    i32::try_from(wide)
        .map(Some)
        .map_err(|_| FieldError::OutOfRange {
            field,
            message: format!("{wide} does not fit in a 32-bit year"),
        })
}

fn string_field(payload: &TreePayload, field: &'static str) -> Result<Option<String>, FieldError> {
    match payload.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(not_convertible(field, other)),
    }
}
