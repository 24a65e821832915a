use schemars::schema::{RootSchema, Schema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{any::TypeId, sync::Arc};

/// Cached JSON schema for a payload the completion service is asked to return.
///
/// The same schema validates the reply and, through [`SchemaHandle::prompt_contract`],
/// tells the service what to produce.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema<T: 'static>(
        schema_name: &'static str,
        type_name: &'static str,
        root: RootSchema,
    ) -> Self {
        // RootSchema is plain data; serializing it cannot fail in practice.
        let schema_json = serde_json::to_value(root).unwrap_or(Value::Null);

        Self {
            schema_name,
            type_name,
            type_id: TypeId::of::<T>(),
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Top-level keys the payload must carry.
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema_json
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Output instructions for a prompt: the required keys and the full schema.
    pub fn prompt_contract(&self) -> String {
        let schema = serde_json::to_string_pretty(self.schema_json()).unwrap_or_default();
        format!(
            "Return ONLY a JSON object with the keys [{required}] that validates against this JSON schema:\n{schema}",
            required = self.required_fields().join(", "),
        )
    }
}

/// A payload type the text-completion service can be asked to produce.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Copies the doc comments captured by `#[completion_schema]` into the schema.
///
/// Descriptions schemars already derived are left alone.
pub fn apply_doc_comments(
    root: &mut RootSchema,
    title: &'static str,
    description: Option<&'static str>,
    field_docs: &[(&'static str, &'static str)],
) {
    let metadata = root.schema.metadata();
    metadata.title.get_or_insert_with(|| title.to_string());
    if let Some(description) = description {
        metadata
            .description
            .get_or_insert_with(|| description.to_string());
    }

    let Some(object) = root.schema.object.as_mut() else {
        return;
    };
    for (field, doc) in field_docs {
        if let Some(Schema::Object(property)) = object.properties.get_mut(*field) {
            property
                .metadata()
                .description
                .get_or_insert_with(|| (*doc).to_string());
        }
    }
}
