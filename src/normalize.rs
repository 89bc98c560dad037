//! Per-operation reconciliation of provider shape irregularities.
//!
//! The provider returns some fields with a cardinality that depends on the
//! data: a list of one comes back as a bare value, a comma-delimited string
//! comes back as an array. The transforms here run on the decoded document,
//! only touch elements of an array-valued `data`, and leave everything else
//! untouched.

use serde_json::{Map, Value};

/// Field of `getTrackNumber` items mapping package identifiers to tracking numbers.
pub const TRACKING_NUMBER_LIST_FIELD: &str = "trackingnumberlist";
/// Field of `getCargoTrack` items holding the tracking events.
pub const DETAIL_FIELD: &str = "Detail";

/// Reconciliation applied to an operation's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Response is passed through unchanged
    #[default]
    None,
    /// Join array-valued tracking numbers into comma-delimited strings
    FlattenTrackingNumbers,
    /// Wrap a single `Detail` object into a one-element array
    CoerceDetailArray,
}

impl Normalization {
    /// Apply this reconciliation to a decoded response document.
    pub fn apply(self, mut document: Value) -> Value {
        let transform: fn(&mut Map<String, Value>) = match self {
            Self::None => return document,
            Self::FlattenTrackingNumbers => flatten_tracking_numbers,
            Self::CoerceDetailArray => coerce_detail_array,
        };

        if let Some(Value::Array(items)) = document.get_mut("data") {
            for item in items.iter_mut() {
                if let Value::Object(record) = item {
                    transform(record);
                }
            }
        }
        document
    }
}

/// Join array values of the tracking-number map with `,`.
pub fn flatten_tracking_numbers(item: &mut Map<String, Value>) {
    let Some(Value::Object(numbers)) = item.get_mut(TRACKING_NUMBER_LIST_FIELD) else {
        return;
    };

    for value in numbers.values_mut() {
        if let Value::Array(parts) = value {
            let joined = parts.iter().map(join_part).collect::<Vec<_>>().join(",");
            *value = Value::String(joined);
        }
    }
}

fn join_part(part: &Value) -> String {
    match part {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Guarantee `Detail` is an array whenever it is present.
pub fn coerce_detail_array(item: &mut Map<String, Value>) {
    if let Some(detail) = item.get_mut(DETAIL_FIELD) {
        if !detail.is_array() && !detail.is_null() {
            let single = detail.take();
            *detail = Value::Array(vec![single]);
        }
    }
}
