use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::completion::TextCompletion;
use crate::{
    config::EngineConfig,
    error::{PlannerError, Result},
};

const SYSTEM_PROMPT: &str =
    "You are an expert travel planner. Answer with a single JSON object and no other text.";
const TEMPERATURE: f32 = 0.7;

/// Chat-completions client for OpenAI-compatible endpoints (OpenAI, OpenRouter, local gateways).
#[derive(Clone, Debug)]
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: Option<u32>,
    json_mode: bool,
}

impl OpenAiCompatibleClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            max_tokens: None,
            json_mode: true,
        })
    }

    /// Fails with `Config` when no API key is configured.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            PlannerError::Config(
                "PLANSMITH_API_KEY or OPENAI_API_KEY must be set to enable generation".to_string(),
            )
        })?;

        Ok(Self::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            config.generation_timeout,
        )?
        .with_max_tokens(config.max_tokens))
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Some gateways reject `response_format`; turn it off for those.
    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut request = ChatCompletionRequest::new(
            self.model.clone(),
            vec![
                json!({ "role": "system", "content": SYSTEM_PROMPT }),
                json!({ "role": "user", "content": prompt }),
            ],
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(TEMPERATURE);
        if self.json_mode {
            request = request.with_response_format(json!({ "type": "json_object" }));
        }
        request.into_value()
    }

    async fn chat_completion(&self, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(build_chat_url(&self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", "plansmith")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                PlannerError::GenerationUnavailable(format!("HTTP request failed: {err}"))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|err| {
            PlannerError::GenerationUnavailable(format!("Failed to read response: {err}"))
        })?;

        let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
            PlannerError::GenerationUnavailable(format!(
                "HTTP {status} with non-JSON body: {err}"
            ))
        })?;

        if let Some(error) = response_json.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(PlannerError::GenerationUnavailable(format!(
                "HTTP {status} API error: {message}"
            )));
        }

        if !status.is_success() {
            return Err(PlannerError::GenerationUnavailable(format!(
                "HTTP {status} error: {response_text}"
            )));
        }

        Ok(response_json)
    }
}

#[async_trait]
impl TextCompletion for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(target: "plansmith::client", model = %self.model, prompt_chars = prompt.len());
        let response = self.chat_completion(&self.request_body(prompt)).await?;
        extract_message_content(&response)
    }
}

fn extract_message_content(response: &Value) -> Result<String> {
    let content = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PlannerError::GenerationUnavailable(
                "completion response has no choices[0].message.content".to_string(),
            )
        })?;

    if content.trim().is_empty() {
        return Err(PlannerError::GenerationUnavailable(
            "completion response content is empty".to_string(),
        ));
    }
    Ok(content.to_string())
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            response_format: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}
