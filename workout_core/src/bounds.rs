//! The (minimum, maximum, value) bound triple shared by steps and goals.
//!
//! Includes the resolver that pulls a triple out of a loosely keyed record
//! and the rules that collapse redundant bounds.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Long spelling of the lower bound key
pub const MINIMUM: &str = "minimum";
/// Short spelling of the lower bound key
pub const MIN: &str = "min";
/// Long spelling of the upper bound key
pub const MAXIMUM: &str = "maximum";
/// Short spelling of the upper bound key
pub const MAX: &str = "max";
pub const VALUE: &str = "value";

/// Numeric target with optional range
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub value: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl Bounds {
    /// Build a triple, swapping an inverted minimum/maximum pair
    pub fn new(value: Option<f64>, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        let (minimum, maximum) = match (minimum, maximum) {
            (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
            pair => pair,
        };
        Self {
            value,
            minimum,
            maximum,
        }
    }

    /// A bare target with no range
    pub fn value(value: f64) -> Self {
        Self::new(Some(value), None, None)
    }

    /// A range with no explicit target
    pub fn range(minimum: f64, maximum: f64) -> Self {
        Self::new(None, Some(minimum), Some(maximum))
    }

    /// Fill in a missing value from the bounds.
    ///
    /// With both bounds the midpoint is used. With a single bound, that bound
    /// becomes the value, whichever side it is on.
    pub fn with_derived_value(self) -> Self {
        if self.value.is_some() {
            return self;
        }
        let value = match (self.minimum, self.maximum) {
            (Some(lo), Some(hi)) => Some(lo + (hi - lo) / 2.0),
            (Some(bound), None) | (None, Some(bound)) => Some(bound),
            (None, None) => None,
        };
        Self { value, ..self }
    }

    /// All three components absent
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.minimum.is_none() && self.maximum.is_none()
    }

    /// True when at least one bound is redundant
    pub fn is_compressible(&self) -> bool {
        match (self.value, self.minimum, self.maximum) {
            (_, Some(lo), Some(hi)) => lo == hi,
            (Some(v), Some(lo), None) => v == lo,
            (Some(v), None, Some(hi)) => v == hi,
            _ => false,
        }
    }

    /// Drop redundant bounds
    ///
    /// - `minimum == maximum`: both bounds go; with no value the shared bound
    ///   becomes the value.
    /// - `minimum == value` with no maximum: minimum goes.
    /// - `maximum == value` with no minimum: maximum goes.
    pub fn compressed(self) -> Self {
        match (self.value, self.minimum, self.maximum) {
            (value, Some(lo), Some(hi)) if lo == hi => Self {
                value: value.or(Some(lo)),
                minimum: None,
                maximum: None,
            },
            (Some(v), Some(lo), None) if v == lo => Self {
                minimum: None,
                ..self
            },
            (Some(v), None, Some(hi)) if v == hi => Self {
                maximum: None,
                ..self
            },
            _ => self,
        }
    }
}

/// Read access to the fields of a loosely keyed record
pub trait Fields {
    /// The raw value stored under `key`, if any
    fn field(&self, key: &str) -> Option<&Value>;
}

impl Fields for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// Extract the bound triple from a record.
///
/// `minimum`/`min` and `maximum`/`max` are both accepted; when both spellings
/// are present the long one is used. `null` counts as absent. An inverted
/// pair is swapped rather than rejected.
pub fn resolve<R: Fields + ?Sized>(record: &R) -> Result<Bounds> {
    let minimum = first_number(record, MINIMUM, MIN)?;
    let maximum = first_number(record, MAXIMUM, MAX)?;
    let value = number(record, VALUE)?;
    Ok(Bounds::new(value, minimum, maximum))
}

fn first_number<R: Fields + ?Sized>(record: &R, long: &str, short: &str) -> Result<Option<f64>> {
    match number(record, long)? {
        Some(n) => Ok(Some(n)),
        None => number(record, short),
    }
}

fn number<R: Fields + ?Sized>(record: &R, key: &str) -> Result<Option<f64>> {
    match record.field(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_number(value).map(Some),
    }
}

/// Numbers are taken as-is; numeric strings such as `"600"` are parsed.
fn as_number(value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    };
    parsed.ok_or_else(|| Error::TypeMismatch {
        expected: "a number",
        found: value.to_string(),
    })
}
