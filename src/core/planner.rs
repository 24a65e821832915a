use std::{sync::Arc, time::Duration};

use tokio::time::timeout;
use tracing::{debug, warn};

use super::{
    context::GenerationContext,
    parser::{extract_json_object, parse_plan, ParsedPlan},
};
use crate::{
    config::{EngineConfig, SampleLimits, DEFAULT_TIMEOUT},
    error::{PlannerError, Result},
    schemas::CompletionSchema,
    services::{prompts::itinerary_prompt, TextCompletion},
    types::decode_structured,
};

/// Asks a text-completion service for a plan and parses the answer.
///
/// Each call makes exactly one completion request, bounded by the timeout.
#[derive(Debug, Clone)]
pub struct GenerativePlanner {
    service: Arc<dyn TextCompletion>,
    timeout: Duration,
    limits: SampleLimits,
}

impl GenerativePlanner {
    pub fn new(service: Arc<dyn TextCompletion>) -> Self {
        Self {
            service,
            timeout: DEFAULT_TIMEOUT,
            limits: SampleLimits::default(),
        }
    }

    pub fn from_config(service: Arc<dyn TextCompletion>, config: &EngineConfig) -> Self {
        Self::new(service)
            .with_timeout(config.generation_timeout)
            .with_sample_limits(config.sample_limits)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sample_limits(mut self, limits: SampleLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn build_prompt(&self, context: &GenerationContext) -> Result<String> {
        itinerary_prompt(context, &self.limits)
    }

    /// One bounded completion round trip. A timeout is reported as
    /// `GenerationUnavailable`, the same as a service failure.
    pub async fn invoke(&self, prompt: &str) -> Result<String> {
        timeout(self.timeout, self.service.complete(prompt))
            .await
            .map_err(|_| {
                warn!(target: "plansmith::planner", timeout = ?self.timeout, "completion timed out");
                PlannerError::GenerationUnavailable(format!(
                    "completion did not finish within {:?}",
                    self.timeout
                ))
            })?
    }

    /// One bounded completion whose answer must validate against `T`'s schema.
    pub async fn complete_structured<T: CompletionSchema>(&self, prompt: &str) -> Result<T> {
        let text = self.invoke(prompt).await?;
        let payload = extract_json_object(&text)?;
        decode_structured::<T>(&payload)
    }

    /// Generates and parses a plan for `context`.
    pub async fn generate(&self, context: &GenerationContext) -> Result<ParsedPlan> {
        let prompt = self.build_prompt(context)?;
        debug!(
            target: "plansmith::planner",
            destination = %context.trip_request.destination.name,
            days = context.duration_days,
            prompt_chars = prompt.len(),
            "requesting generated plan"
        );
        let text = self.invoke(&prompt).await?;
        parse_plan(&text, &context.trip_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::context::build_context,
        types::{BudgetLevel, CandidatePools, Location, Preferences, TravelTheme, TripRequest},
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingService {
        calls: AtomicUsize,
        reply: String,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl TextCompletion for CountingService {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.reply.clone())
        }
    }

    fn context() -> GenerationContext {
        let trip = TripRequest {
            origin: Location::named("Pune"),
            destination: Location::new("Goa", "Panaji", "Goa", "India"),
            start_date: "2025-12-01".parse().unwrap(),
            end_date: "2025-12-02".parse().unwrap(),
            travelers_count: 2,
            preferences: Preferences::new(vec![TravelTheme::Relaxation], BudgetLevel::Budget, 15_000.0),
            special_requirements: None,
        };
        build_context(trip, None, None, CandidatePools::default()).unwrap()
    }

    #[tokio::test]
    async fn calls_the_service_exactly_once() {
        let service = Arc::new(CountingService {
            reply: r#"{"summary": "Beach days", "days": [{"date": "2025-12-01"}]}"#.to_string(),
            ..CountingService::default()
        });
        let planner = GenerativePlanner::new(service.clone());

        let parsed = planner.generate(&context()).await.unwrap();
        assert_eq!(parsed.plan.summary, "Beach days");
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let service = Arc::new(CountingService {
            reply: "{}".to_string(),
            delay: Some(Duration::from_millis(500)),
            ..CountingService::default()
        });
        let planner = GenerativePlanner::new(service).with_timeout(Duration::from_millis(20));

        let err = planner.generate(&context()).await.unwrap_err();
        assert!(matches!(err, PlannerError::GenerationUnavailable(_)));
    }
}
