use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use plansmith::{
    services::{CandidateProvider, SignalProvider},
    synthesize_fallback,
    types::{
        Accommodation, Activity, BudgetLevel, CandidatePools, Flight, GenerationSource,
        LocalEvent, Location, Preferences, Restaurant, TravelTheme, WeatherSnapshot,
    },
    GenerativePlanner, Itinerary, ItineraryAssembler, PlannerError, StaticCandidateProvider,
    StaticSignalProvider, TextCompletion, TripRequest,
};

#[derive(Debug)]
enum Behavior {
    Reply(String),
    Fail,
    Slow(Duration),
}

#[derive(Debug)]
struct ScriptedService(Behavior);

#[async_trait]
impl TextCompletion for ScriptedService {
    async fn complete(&self, _prompt: &str) -> plansmith::Result<String> {
        match &self.0 {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail => Err(PlannerError::GenerationUnavailable(
                "HTTP 503 Service Unavailable".to_string(),
            )),
            Behavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("{}".to_string())
            }
        }
    }
}

#[derive(Debug)]
struct BrokenCatalogue;

#[async_trait]
impl CandidateProvider for BrokenCatalogue {
    async fn activities(&self, _: &Preferences) -> plansmith::Result<Vec<Activity>> {
        Err(PlannerError::Config("catalogue offline".to_string()))
    }
    async fn accommodations(&self, _: &Preferences) -> plansmith::Result<Vec<Accommodation>> {
        Ok(vec![stay(2000.0)])
    }
    async fn flights(&self, _: &Preferences) -> plansmith::Result<Vec<Flight>> {
        Err(PlannerError::Config("catalogue offline".to_string()))
    }
    async fn restaurants(&self, _: &Preferences) -> plansmith::Result<Vec<Restaurant>> {
        Ok(Vec::new())
    }
}

#[derive(Debug)]
struct BrokenSignals;

#[async_trait]
impl SignalProvider for BrokenSignals {
    async fn weather(&self, _: &str, _: &str) -> plansmith::Result<WeatherSnapshot> {
        Err(PlannerError::Config("weather feed offline".to_string()))
    }
    async fn events(
        &self,
        _: &str,
        _: &str,
        _: NaiveDate,
        _: NaiveDate,
    ) -> plansmith::Result<Vec<LocalEvent>> {
        Err(PlannerError::Config("events feed offline".to_string()))
    }
}

fn date(text: &str) -> NaiveDate {
    text.parse().unwrap()
}

fn trip(start: &str, end: &str) -> TripRequest {
    TripRequest {
        origin: Location::new("Mumbai", "Mumbai", "Maharashtra", "India"),
        destination: Location::new("Jaipur", "Jaipur", "Rajasthan", "India"),
        start_date: date(start),
        end_date: date(end),
        travelers_count: 2,
        preferences: Preferences::new(
            vec![TravelTheme::Heritage, TravelTheme::Food],
            BudgetLevel::MidRange,
            60_000.0,
        ),
        special_requirements: None,
    }
}

fn stay(per_night: f64) -> Accommodation {
    serde_json::from_value(json!({"name": "Pink City Haveli", "cost_per_night": per_night})).unwrap()
}

fn pools() -> CandidatePools {
    serde_json::from_value(json!({
        "activities": [
            {"name": "Amber Fort", "cost_per_person": 500, "rating": 4.8},
            {"name": "City Palace", "cost_per_person": 700, "rating": 4.6},
            {"name": "Hawa Mahal", "cost_per_person": 200, "rating": 4.5}
        ],
        "accommodations": [
            {"name": "Pink City Haveli", "cost_per_night": 2000},
            {"name": "Rambagh Palace", "cost_per_night": 30000}
        ],
        "flights": [
            {"airline": "IndiGo", "from_location": "BOM", "to_location": "JAI", "price": 5000},
            {"airline": "Air India", "from_location": "BOM", "to_location": "JAI", "price": 6200},
            {"airline": "Vistara", "from_location": "BOM", "to_location": "JAI", "price": 7100}
        ],
        "restaurants": [
            {"name": "Laxmi Mishthan Bhandar", "average_cost_per_person": 300},
            {"name": "Suvarna Mahal", "average_cost_per_person": 2500}
        ]
    }))
    .unwrap()
}

fn planner(behavior: Behavior) -> GenerativePlanner {
    GenerativePlanner::new(Arc::new(ScriptedService(behavior)))
}

fn assert_dates_contiguous(itinerary: &Itinerary, start: &str, days: usize) {
    assert_eq!(itinerary.days.len(), days);
    for (offset, day) in itinerary.days.iter().enumerate() {
        assert_eq!(day.date, date(start) + chrono::Duration::days(offset as i64));
    }
}

fn assert_same_selections(left: &Itinerary, right: &Itinerary) {
    assert_eq!(left.days, right.days);
    assert_eq!(left.accommodation, right.accommodation);
    assert_eq!(left.transportation, right.transportation);
    assert_eq!(left.total_cost, right.total_cost);
    assert_eq!(left.budget_breakdown, right.budget_breakdown);
}

const GENERATED_PLAN: &str = r#"Here is your plan:
{
  "summary": "Forts by day, food by night",
  "days": [
    {"date": "2025-09-21", "activities": [{"name": "Amber Fort", "cost_per_person": 500, "time_slot": "09:00-12:00"}], "meals": [{"name": "Laxmi Mishthan Bhandar", "average_cost_per_person": 300}], "total_daily_cost": 1},
    {"date": "2025-09-22", "activities": [{"name": "City Palace", "cost_per_person": 700}], "meals": [], "total_daily_cost": "calculated_cost"}
  ],
  "accommodation": [{"name": "Pink City Haveli", "cost_per_night": 2000}],
  "transportation": [{"airline": "IndiGo", "price": 5000}],
  "total_cost": 1,
  "cultural_insights": ["Cover your head inside gurudwaras"]
}
Have a great trip!"#;

#[tokio::test]
async fn empty_pools_give_empty_zero_cost_days() {
    let itinerary = ItineraryAssembler::new()
        .assemble(trip("2025-09-21", "2025-09-24"))
        .await
        .unwrap();

    assert_dates_contiguous(&itinerary, "2025-09-21", 3);
    assert!(itinerary.days.iter().all(|day| day.activities.is_empty() && day.meals.is_empty()));
    assert_eq!(itinerary.total_cost, 0.0);
    assert!(!itinerary.cultural_insights.is_empty());
    assert!(!itinerary.safety_tips.is_empty());
    assert!(!itinerary.local_recommendations.is_empty());
    assert_eq!(itinerary.generated_by, GenerationSource::Fallback);
}

#[tokio::test]
async fn fallback_total_includes_stay_and_fare() {
    let pools = CandidatePools {
        accommodations: vec![stay(2000.0)],
        flights: vec![Flight::new("IndiGo", "BOM", "JAI", 5000.0)],
        ..pools()
    };
    let itinerary = ItineraryAssembler::new()
        .assemble_with(trip("2025-09-21", "2025-09-23"), None, None, pools)
        .await
        .unwrap();

    let daily_sum: f64 = itinerary.days.iter().map(|day| day.total_daily_cost).sum();
    assert_eq!(itinerary.total_cost, daily_sum + 2000.0 * 2.0 + 5000.0);
    assert_eq!(itinerary.budget_breakdown.accommodation, 4000.0);
    assert_eq!(itinerary.budget_breakdown.transportation, 5000.0);
    assert_eq!(itinerary.budget_breakdown.activities, daily_sum);
    assert!(itinerary.inconsistencies().is_empty());
}

#[tokio::test]
async fn fallback_is_deterministic() {
    let assembler = ItineraryAssembler::new();
    let first = assembler
        .assemble_with(trip("2025-09-21", "2025-09-25"), None, None, pools())
        .await
        .unwrap();
    let second = assembler
        .assemble_with(trip("2025-09-21", "2025-09-25"), None, None, pools())
        .await
        .unwrap();

    assert_same_selections(&first, &second);
    assert_ne!(first.id, second.id);
    assert_eq!(first.accommodation.len(), 2);
    assert_eq!(first.transportation.len(), 2);
}

#[tokio::test]
async fn unavailable_service_matches_pure_fallback() {
    let request = trip("2025-09-21", "2025-09-24");
    let itinerary = ItineraryAssembler::new()
        .with_planner(planner(Behavior::Fail))
        .assemble_with(request.clone(), None, None, pools())
        .await
        .unwrap();

    let expected = synthesize_fallback(&request, &pools());
    assert_same_selections(&itinerary, &expected);
    assert_eq!(itinerary.summary, expected.summary);
    assert_eq!(itinerary.generated_by, GenerationSource::Fallback);
}

#[tokio::test]
async fn text_without_json_falls_back() {
    let itinerary = ItineraryAssembler::new()
        .with_planner(planner(Behavior::Reply(
            "I'm sorry, I can't plan trips right now.".to_string(),
        )))
        .assemble_with(trip("2025-09-21", "2025-09-24"), None, None, pools())
        .await
        .unwrap();

    assert_eq!(itinerary.generated_by, GenerationSource::Fallback);
    assert_dates_contiguous(&itinerary, "2025-09-21", 3);
}

#[tokio::test]
async fn slow_service_times_out_into_fallback() {
    let slow = planner(Behavior::Slow(Duration::from_secs(5))).with_timeout(Duration::from_millis(50));
    let itinerary = ItineraryAssembler::new()
        .with_planner(slow)
        .assemble_with(trip("2025-09-21", "2025-09-23"), None, None, pools())
        .await
        .unwrap();

    assert_eq!(itinerary.generated_by, GenerationSource::Fallback);
}

#[tokio::test]
async fn generated_plan_costs_are_recomputed() {
    let weather: WeatherSnapshot = serde_json::from_value(json!({
        "city": "Jaipur, Rajasthan",
        "forecast": [{"date": "2025-09-22", "high": 34, "low": 24, "condition": "Thunderstorms", "precipitation_chance": 80}]
    }))
    .unwrap();

    let itinerary = ItineraryAssembler::new()
        .with_planner(planner(Behavior::Reply(GENERATED_PLAN.to_string())))
        .assemble_with(trip("2025-09-21", "2025-09-23"), Some(weather), None, pools())
        .await
        .unwrap();

    assert_eq!(itinerary.generated_by, GenerationSource::Generative);
    assert_eq!(itinerary.summary, "Forts by day, food by night");
    assert_eq!(itinerary.days[0].total_daily_cost, 800.0);
    assert_eq!(itinerary.days[1].total_daily_cost, 700.0);
    assert_eq!(itinerary.total_cost, 1500.0 + 2000.0 * 2.0 + 5000.0);
    assert_eq!(itinerary.days[0].activities[0].time_slot.as_deref(), Some("09:00-12:00"));
    assert_eq!(itinerary.cultural_insights, vec!["Cover your head inside gurudwaras"]);
    assert!(!itinerary.safety_tips.is_empty());
    assert!(itinerary.inconsistencies().is_empty());

    assert!(itinerary.days[0].weather_forecast.is_none());
    let forecast = itinerary.days[1].weather_forecast.as_ref().unwrap();
    assert!(forecast.is_wet());
}

#[tokio::test]
async fn generated_plan_with_wrong_day_count_falls_back() {
    // three-day trip, but the plan only covers two days
    let itinerary = ItineraryAssembler::new()
        .with_planner(planner(Behavior::Reply(GENERATED_PLAN.to_string())))
        .assemble_with(trip("2025-09-21", "2025-09-24"), None, None, pools())
        .await
        .unwrap();

    assert_eq!(itinerary.generated_by, GenerationSource::Fallback);
    assert_dates_contiguous(&itinerary, "2025-09-21", 3);
}

#[tokio::test]
async fn invalid_request_is_not_absorbed() {
    let err = ItineraryAssembler::new()
        .with_planner(planner(Behavior::Fail))
        .assemble(trip("2025-09-24", "2025-09-21"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidRequest(_)));

    let err = ItineraryAssembler::new()
        .assemble(trip("2025-09-21", "2025-09-21"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_REQUEST");
}

#[tokio::test]
async fn provider_failures_degrade_to_empty_data() {
    let itinerary = ItineraryAssembler::new()
        .with_candidate_provider(Arc::new(BrokenCatalogue))
        .with_signal_provider(Arc::new(BrokenSignals))
        .assemble(trip("2025-09-21", "2025-09-23"))
        .await
        .unwrap();

    assert_eq!(itinerary.days.len(), 2);
    assert!(itinerary.transportation.is_empty());
    assert_eq!(itinerary.accommodation.len(), 1);
    assert_eq!(itinerary.total_cost, 4000.0);
    assert!(itinerary.days.iter().all(|day| day.weather_forecast.is_none()));
}

#[tokio::test]
async fn static_providers_feed_the_fallback() {
    let weather: WeatherSnapshot = serde_json::from_value(json!({
        "forecast": [{"date": "2025-09-21", "high": 33, "low": 25, "condition": "Sunny"}]
    }))
    .unwrap();
    let itinerary = ItineraryAssembler::new()
        .with_candidate_provider(Arc::new(StaticCandidateProvider::new(pools())))
        .with_signal_provider(Arc::new(StaticSignalProvider::new(weather, Vec::new())))
        .assemble(trip("2025-09-21", "2025-09-23"))
        .await
        .unwrap();

    // pools are re-ranked by rating before the fallback windows are taken
    let first_day: Vec<&str> = itinerary.days[0]
        .activities
        .iter()
        .map(|activity| activity.name.as_str())
        .collect();
    assert_eq!(first_day, vec!["Amber Fort", "City Palace"]);
    assert_eq!(
        itinerary.days[0].weather_forecast.as_ref().map(|f| f.condition.as_str()),
        Some("Sunny")
    );
}
