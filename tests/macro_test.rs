use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use plansmith::{types::decode_structured, CompletionSchema, PlannerError};

/// Items to pack for the trip
#[plansmith::completion_schema]
#[derive(Debug, Deserialize, JsonSchema)]
struct PackingList {
    /// Things every traveler needs
    essentials: Vec<String>,
    #[serde(default, rename = "weather_gear")]
    /// Rain or sun protection
    gear: Vec<String>,
}

#[plansmith::completion_schema(name = "day_notes", description = "Free-form notes per day")]
#[derive(Debug, Deserialize, JsonSchema)]
struct DayNotes {
    notes: Vec<String>,
}

#[test]
fn schema_name_defaults_to_struct_name() {
    let schema = PackingList::schema();
    assert_eq!(schema.schema_name(), "PackingList");
    assert_eq!(schema.type_name(), "PackingList");
    assert_eq!(schema.required_fields(), vec!["essentials"]);
}

#[test]
fn doc_comments_become_descriptions() {
    let schema = PackingList::schema().schema_json();
    assert_eq!(schema["description"], "Items to pack for the trip");
    assert_eq!(
        schema["properties"]["essentials"]["description"],
        "Things every traveler needs"
    );
    assert_eq!(
        schema["properties"]["weather_gear"]["description"],
        "Rain or sun protection"
    );
}

#[test]
fn explicit_arguments_override_defaults() {
    let schema = DayNotes::schema();
    assert_eq!(schema.schema_name(), "day_notes");
    assert_eq!(schema.schema_json()["description"], "Free-form notes per day");
}

#[test]
fn schema_handle_is_cached() {
    assert!(std::ptr::eq(PackingList::schema(), PackingList::schema()));
}

#[test]
fn payloads_are_validated_before_decoding() {
    let list: PackingList = decode_structured(&json!({
        "essentials": ["passport", "charger"],
        "weather_gear": ["umbrella"]
    }))
    .unwrap();
    assert_eq!(list.essentials.len(), 2);
    assert_eq!(list.gear, vec!["umbrella"]);

    let err = decode_structured::<PackingList>(&json!({"weather_gear": []})).unwrap_err();
    assert!(matches!(err, PlannerError::MalformedGeneration(_)));
}
