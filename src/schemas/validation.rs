use crate::{error::PlannerError, schemas::SchemaHandle};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a structured payload against a schema
pub(crate) fn validate_structured_payload(
    schema: &SchemaHandle,
    payload: &Value,
) -> std::result::Result<(), PlannerError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            PlannerError::Config(format!(
                "`{}` schema does not compile: {}",
                schema.schema_name(),
                err
            ))
        })?;

    let result = validator.validate(payload);
    let Err(errors) = result else {
        return Ok(());
    };

    let mut details: Vec<String> = Vec::new();
    let mut truncated = false;
    for (idx, error) in errors.enumerate() {
        if idx == MAX_SCHEMA_ERRORS {
            truncated = true;
            break;
        }
        let path = error.instance_path.to_string();
        let path = if path.is_empty() { "<root>".to_string() } else { path };
        details.push(format!("{path}: {error}"));
    }

    let mut detail = if details.is_empty() {
        "payload failed schema validation".to_string()
    } else {
        details.join("; ")
    };
    if truncated {
        detail.push_str("; additional errors truncated");
    }

    debug!(
        target: "plansmith::schema",
        schema = schema.schema_name(),
        error = %detail,
        payload = %payload
    );

    Err(PlannerError::MalformedGeneration(format!(
        "response does not match `{}` schema: {}",
        schema.schema_name(),
        detail
    )))
}
