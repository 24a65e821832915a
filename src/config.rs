use std::time::Duration;

use crate::error::{PlannerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// How many candidates of each kind are embedded in a generation prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleLimits {
    pub activities: usize,
    pub accommodations: usize,
    pub flights: usize,
    pub restaurants: usize,
    pub events: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            activities: 5,
            accommodations: 3,
            flights: 3,
            restaurants: 5,
            events: 5,
        }
    }
}

/// Settings for the text-completion client and the generative planner.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub generation_timeout: Duration,
    pub sample_limits: SampleLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            generation_timeout: DEFAULT_TIMEOUT,
            sample_limits: SampleLimits::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_sample_limits(mut self, limits: SampleLimits) -> Self {
        self.sample_limits = limits;
        self
    }

    /// Reads settings from the process environment (after loading `.env`).
    ///
    /// A missing API key is not an error here: the engine then runs on the
    /// fallback path only.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup("PLANSMITH_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if let Some(base_url) = lookup("OPENAI_BASE_URL").or_else(|| lookup("OPENROUTER_BASE_URL")) {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("PLANSMITH_MODEL") {
            config.model = model;
        }
        if let Some(raw) = lookup("PLANSMITH_TIMEOUT_SECS") {
            let secs: u64 = parse_setting("PLANSMITH_TIMEOUT_SECS", &raw)?;
            config.generation_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("PLANSMITH_MAX_TOKENS") {
            config.max_tokens = Some(parse_setting("PLANSMITH_MAX_TOKENS", &raw)?);
        }

        Ok(config)
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| PlannerError::Config(format!("{key} must be a positive integer, got `{raw}`")))
}
