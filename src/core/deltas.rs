//! Suggestion and real-time-update generation for existing itineraries.
//!
//! Neither generator has a fallback: when the completion service is absent,
//! fails or answers with something undecodable, the error goes to the caller.

use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use super::planner::GenerativePlanner;
use crate::{
    config::EngineConfig,
    error::{PlannerError, Result},
    schemas::CompletionSchema,
    services::{
        prompts::{suggestion_prompt, update_prompt},
        TextCompletion,
    },
    types::{
        AlternativeSuggestions, Itinerary, RealTimeUpdates, SuggestionBatch, TrafficUpdate,
        UpdateBatch, WeatherAlert,
    },
};

/// Number of alternatives a suggestion request asks for.
pub const SUGGESTION_COUNT: usize = 3;

async fn complete_with<T: CompletionSchema>(
    planner: Option<&GenerativePlanner>,
    prompt: &str,
) -> Result<T> {
    let planner = planner.ok_or_else(|| {
        PlannerError::GenerationUnavailable("no text-completion service configured".to_string())
    })?;
    planner.complete_structured(prompt).await
}

/// Proposes modifications that answer free-text traveler feedback.
#[derive(Debug, Clone)]
pub struct AlternativeSuggestionGenerator {
    planner: Option<GenerativePlanner>,
}

impl AlternativeSuggestionGenerator {
    pub fn new(service: Option<Arc<dyn TextCompletion>>) -> Self {
        Self {
            planner: service.map(GenerativePlanner::new),
        }
    }

    pub fn from_config(service: Option<Arc<dyn TextCompletion>>, config: &EngineConfig) -> Self {
        Self::new(service).with_timeout(config.generation_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.planner = self.planner.map(|planner| planner.with_timeout(timeout));
        self
    }

    pub async fn suggest(&self, itinerary: &Itinerary, feedback: &str) -> Result<AlternativeSuggestions> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(PlannerError::InvalidRequest("feedback must not be empty".to_string()));
        }

        let prompt = suggestion_prompt(itinerary, feedback)?;
        let batch: SuggestionBatch = complete_with(self.planner.as_ref(), &prompt).await?;

        let mut suggestions = batch.suggestions;
        if suggestions.len() != SUGGESTION_COUNT {
            warn!(
                target: "plansmith::deltas",
                itinerary_id = %itinerary.id,
                received = suggestions.len(),
                "unexpected number of suggestions"
            );
        }
        suggestions.truncate(SUGGESTION_COUNT);

        debug!(target: "plansmith::deltas", itinerary_id = %itinerary.id, count = suggestions.len());
        Ok(AlternativeSuggestions {
            itinerary_id: itinerary.id.clone(),
            feedback: feedback.to_string(),
            suggestions,
        })
    }
}

/// Adjusts an itinerary for live weather alerts and traffic conditions.
#[derive(Debug, Clone)]
pub struct RealTimeUpdateGenerator {
    planner: Option<GenerativePlanner>,
}

impl RealTimeUpdateGenerator {
    pub fn new(service: Option<Arc<dyn TextCompletion>>) -> Self {
        Self {
            planner: service.map(GenerativePlanner::new),
        }
    }

    pub fn from_config(service: Option<Arc<dyn TextCompletion>>, config: &EngineConfig) -> Self {
        Self::new(service).with_timeout(config.generation_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.planner = self.planner.map(|planner| planner.with_timeout(timeout));
        self
    }

    pub async fn updates(
        &self,
        itinerary: &Itinerary,
        weather_alerts: &[WeatherAlert],
        traffic_updates: &[TrafficUpdate],
    ) -> Result<RealTimeUpdates> {
        let prompt = update_prompt(itinerary, weather_alerts, traffic_updates)?;
        let batch: UpdateBatch = complete_with(self.planner.as_ref(), &prompt).await?;

        let off_plan = batch
            .updates
            .iter()
            .filter(|update| itinerary.day(update.affected_date).is_none())
            .count();
        if off_plan > 0 {
            warn!(
                target: "plansmith::deltas",
                itinerary_id = %itinerary.id,
                off_plan,
                "updates reference dates outside the itinerary"
            );
        }

        Ok(RealTimeUpdates {
            itinerary_id: itinerary.id.clone(),
            updates: batch.updates,
            general_recommendations: batch.general_recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::fallback::synthesize_fallback,
        types::{BudgetLevel, CandidatePools, Location, Preferences, TravelTheme, TripRequest},
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct CannedService(String);

    #[async_trait]
    impl TextCompletion for CannedService {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn itinerary() -> Itinerary {
        let trip = TripRequest {
            origin: Location::named("Bengaluru"),
            destination: Location::new("Mysuru", "Mysuru", "Karnataka", "India"),
            start_date: "2025-10-02".parse().unwrap(),
            end_date: "2025-10-04".parse().unwrap(),
            travelers_count: 3,
            preferences: Preferences::new(vec![TravelTheme::Family], BudgetLevel::MidRange, 45_000.0),
            special_requirements: None,
        };
        synthesize_fallback(&trip, &CandidatePools::default())
    }

    #[derive(Debug)]
    struct FailingService;

    #[async_trait]
    impl TextCompletion for FailingService {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(PlannerError::GenerationUnavailable("quota exhausted".to_string()))
        }
    }

    #[derive(Debug)]
    struct SlowService;

    #[async_trait]
    impl TextCompletion for SlowService {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(r#"{"suggestions": [], "updates": []}"#.to_string())
        }
    }

    fn canned(text: &str) -> Option<Arc<dyn TextCompletion>> {
        Some(Arc::new(CannedService(text.to_string())))
    }

    #[tokio::test]
    async fn absent_service_is_unavailable() {
        let err = AlternativeSuggestionGenerator::new(None)
            .suggest(&itinerary(), "more museums")
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::GenerationUnavailable(_)));
    }

    #[tokio::test]
    async fn extra_suggestions_are_truncated() {
        let one = r#"{"title": "Palace at night", "description": "See the lights", "changes": {"modified_days": [1], "cost_impact": 200}, "reasoning": "Evening plans"}"#;
        let reply = format!("{{\"suggestions\": [{one}, {one}, {one}, {one}]}}");
        let itinerary = itinerary();

        let result = AlternativeSuggestionGenerator::new(canned(&reply))
            .suggest(&itinerary, "  want evening plans ")
            .await
            .unwrap();
        assert_eq!(result.suggestions.len(), SUGGESTION_COUNT);
        assert_eq!(result.itinerary_id, itinerary.id);
        assert_eq!(result.feedback, "want evening plans");
        assert_eq!(result.suggestions[0].rationale, "Evening plans");
        assert_eq!(result.total_cost_impact(), 600.0);
    }

    #[tokio::test]
    async fn schema_violations_are_malformed() {
        let err = AlternativeSuggestionGenerator::new(canned(r#"{"suggestions": [{"title": 5}]}"#))
            .suggest(&itinerary(), "cheaper food")
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::MalformedGeneration(_)));
    }

    #[tokio::test]
    async fn updates_are_stamped_with_itinerary() {
        let reply = r#"Sure! {"updates": [{"type": "weather", "affected_date": "2025-10-03", "original_activity": "Chamundi Hills", "suggested_alternative": "Mysore Palace museum", "reason": "Thunderstorms", "booking_required": true}], "general_recommendations": ["Carry umbrellas"]}"#;
        let itinerary = itinerary();

        let result = RealTimeUpdateGenerator::new(canned(reply))
            .updates(&itinerary, &[], &[])
            .await
            .unwrap();
        assert_eq!(result.itinerary_id, itinerary.id);
        assert_eq!(result.updates.len(), 1);
        assert!(result.requires_rebooking());
        assert_eq!(result.general_recommendations, vec!["Carry umbrellas"]);
    }

    #[tokio::test]
    async fn empty_feedback_is_rejected() {
        let err = AlternativeSuggestionGenerator::new(canned("{}"))
            .suggest(&itinerary(), "   ")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn update_without_service_is_unavailable() {
        let err = RealTimeUpdateGenerator::new(None)
            .updates(&itinerary(), &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::GenerationUnavailable(_)));
    }

    #[tokio::test]
    async fn update_service_failure_is_passed_through() {
        let err = RealTimeUpdateGenerator::new(Some(Arc::new(FailingService)))
            .updates(&itinerary(), &[], &[])
            .await
            .unwrap_err();
        match err {
            PlannerError::GenerationUnavailable(message) => assert_eq!(message, "quota exhausted"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_text_without_braces_is_malformed() {
        let err = RealTimeUpdateGenerator::new(canned("No changes needed, enjoy the trip."))
            .updates(&itinerary(), &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::MalformedGeneration(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out_for_both_generators() {
        let slow: Option<Arc<dyn TextCompletion>> = Some(Arc::new(SlowService));
        let limit = Duration::from_millis(20);

        let err = AlternativeSuggestionGenerator::new(slow.clone())
            .with_timeout(limit)
            .suggest(&itinerary(), "more museums")
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::GenerationUnavailable(_)));

        let err = RealTimeUpdateGenerator::new(slow)
            .with_timeout(limit)
            .updates(&itinerary(), &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::GenerationUnavailable(_)));
    }

    #[tokio::test]
    async fn updates_can_be_grouped_by_date() {
        let reply = r#"{"updates": [
            {"type": "traffic", "affected_date": "2025-10-02", "original_activity": "Drive in", "suggested_alternative": "Leave at 6am", "reason": "Highway works"},
            {"type": "weather", "affected_date": "2025-10-03", "original_activity": "Chamundi Hills", "suggested_alternative": "Palace museum", "reason": "Rain", "cost_impact": "150"}
        ]}"#;
        let result = RealTimeUpdateGenerator::new(canned(reply))
            .updates(&itinerary(), &[], &[])
            .await
            .unwrap();

        let day_two: Vec<_> = result.for_date("2025-10-03".parse().unwrap()).collect();
        assert_eq!(day_two.len(), 1);
        assert_eq!(day_two[0].cost_impact, 150.0);
        assert!(!result.requires_rebooking());
    }
}
