use thiserror::Error;

/// Main error type for the synthesis engine
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Trip dates, traveler counts or preferences are unusable; never retried.
    #[error("Invalid trip request: {0}")]
    InvalidRequest(String),

    /// The text-completion service is absent, unreachable, erroring or timed out.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// The completion text does not contain a decodable structured payload.
    #[error("Malformed generation: {0}")]
    MalformedGeneration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Itinerary not found: {0}")]
    NotFound(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// True for the two failures the assembler absorbs by falling back.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            PlannerError::GenerationUnavailable(_) | PlannerError::MalformedGeneration(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::InvalidRequest(_) => "INVALID_REQUEST",
            PlannerError::GenerationUnavailable(_) => "GENERATION_UNAVAILABLE",
            PlannerError::MalformedGeneration(_) => "MALFORMED_GENERATION",
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        })
    }
}
