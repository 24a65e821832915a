//! Forgiving decoders for fields that completion services tend to mangle.
//!
//! Each decoder has a schema stand-in, used through `#[schemars(with = ...)]`,
//! so payload validation accepts exactly what the decoder accepts.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::trip::Location;

/// A location as a full object, a bare label, or `null`.
#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
pub(crate) enum LocationField {
    Full(Location),
    Label(String),
}

/// Generated plans frequently collapse locations to `"Amber Fort, Jaipur"`.
pub(crate) fn lenient_location<'de, D>(deserializer: D) -> std::result::Result<Location, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LocationField>::deserialize(deserializer)? {
        Some(LocationField::Full(location)) => location,
        Some(LocationField::Label(label)) => Location::named(label),
        None => Location::default(),
    })
}

/// A money amount as a number, a string, or `null`.
#[derive(JsonSchema)]
#[serde(untagged)]
#[allow(dead_code)]
pub(crate) enum AmountField {
    Number(f64),
    Text(String),
}

/// Numbers sometimes come back as strings ("4500") or placeholders ("calculated_cost").
/// Anything that is not a number becomes 0.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
