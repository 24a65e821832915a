//! Prompt text for the itinerary, suggestion and update requests.

use serde::Serialize;

use crate::{
    config::SampleLimits,
    core::context::GenerationContext,
    error::Result,
    schemas::CompletionSchema,
    types::{Itinerary, SuggestionBatch, TrafficUpdate, UpdateBatch, WeatherAlert},
};

const ITINERARY_SHAPE: &str = r#"{
  "summary": "Brief trip overview",
  "days": [
    {
      "date": "YYYY-MM-DD",
      "activities": [selected activities, each with a "time_slot"],
      "meals": [selected restaurants],
      "transportation": [],
      "total_daily_cost": 0
    }
  ],
  "accommodation": [selected accommodations],
  "transportation": [selected flights],
  "total_cost": 0,
  "cultural_insights": ["tip1", "tip2", "tip3"],
  "safety_tips": ["tip1", "tip2", "tip3"],
  "local_recommendations": ["tip1", "tip2", "tip3"]
}"#;

/// The first `limit` entries of `items`, pretty-printed.
fn sample<T: Serialize>(items: &[T], limit: usize) -> Result<String> {
    let end = items.len().min(limit);
    Ok(serde_json::to_string_pretty(&items[..end])?)
}

fn bullet_list(lines: &[String], empty: &str) -> String {
    if lines.is_empty() {
        format!("- {empty}")
    } else {
        lines
            .iter()
            .map(|line| format!("- {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Prompt for a complete day-by-day plan built from the context's candidates.
pub fn itinerary_prompt(context: &GenerationContext, limits: &SampleLimits) -> Result<String> {
    let trip = &context.trip_request;
    let prefs = &trip.preferences;
    let days = context.duration_days;

    let themes = if prefs.themes.is_empty() {
        "none specified".to_string()
    } else {
        prefs.theme_labels().join(", ")
    };
    let mut extra_needs: Vec<String> = Vec::new();
    if !prefs.dietary_restrictions.is_empty() {
        extra_needs.push(format!("Dietary: {}", prefs.dietary_restrictions.join(", ")));
    }
    if !prefs.accessibility_needs.is_empty() {
        extra_needs.push(format!("Accessibility: {}", prefs.accessibility_needs.join(", ")));
    }
    if !prefs.interests.is_empty() {
        extra_needs.push(format!("Interests: {}", prefs.interests.join(", ")));
    }
    if let Some(requirements) = trip.special_requirements.as_deref() {
        extra_needs.push(format!("Special requirements: {requirements}"));
    }

    let events: Vec<String> = context
        .events
        .iter()
        .take(limits.events)
        .map(|event| {
            if event.venue.is_empty() {
                format!("{} on {}", event.name, event.date)
            } else {
                format!("{} on {} at {}", event.name, event.date, event.venue)
            }
        })
        .collect();

    Ok(format!(
        "You are an expert travel planner. Create a personalized itinerary using the provided data.

TRIP DETAILS:
- Origin: {origin}
- Destination: {destination}
- Duration: {days} days
- Travelers: {travelers}
- Dates: {start} to {end}

PREFERENCES:
- Themes: {themes}
- Budget level: {budget_level}
- Max budget: {max_budget}
- Travel style: {style}
{needs}

WEATHER:
{weather}

LOCAL EVENTS:
{events}

AVAILABLE DATA:
Activities: {activities}
Accommodations: {accommodations}
Flights: {flights}
Restaurants: {restaurants}

Create a {days}-day itinerary by selecting and organizing the available activities, restaurants and accommodations.
Use exactly {days} entries in \"days\", one per date starting at {start}, with consecutive dates.
Distribute activities across days, pick restaurants for meals, and include the best accommodation and flight options.

Return ONLY a JSON object in this format:
{shape}",
        origin = trip.origin.display_label(),
        destination = trip.destination.display_label(),
        travelers = trip.travelers_count,
        start = trip.start_date,
        end = trip.end_date,
        budget_level = prefs.budget_level.as_str(),
        max_budget = prefs.max_budget,
        style = prefs.travel_style,
        needs = bullet_list(&extra_needs, "No additional requirements"),
        weather = bullet_list(&context.weather.summary_lines(), "No forecast available"),
        events = bullet_list(&events, "No local events found"),
        activities = sample(&context.pools.activities, limits.activities)?,
        accommodations = sample(&context.pools.accommodations, limits.accommodations)?,
        flights = sample(&context.pools.flights, limits.flights)?,
        restaurants = sample(&context.pools.restaurants, limits.restaurants)?,
        shape = ITINERARY_SHAPE,
    ))
}

/// Prompt asking for three modifications that answer the traveler's feedback.
pub fn suggestion_prompt(itinerary: &Itinerary, feedback: &str) -> Result<String> {
    Ok(format!(
        "The traveler has given feedback on their itinerary: \"{feedback}\"

Current itinerary: {itinerary}

Suggest exactly 3 alternative modifications that address the feedback while keeping the overall trip structure and budget.
Day numbers in \"modified_days\" are 1-based. \"cost_impact\" is the signed change to the total cost.
Entries in \"new_activities\" and \"removed_activities\" may be activity names or full activity objects.

{contract}",
        itinerary = serde_json::to_string_pretty(itinerary)?,
        contract = SuggestionBatch::schema().prompt_contract(),
    ))
}

/// Prompt asking for adjustments to live weather alerts and traffic conditions.
pub fn update_prompt(
    itinerary: &Itinerary,
    weather_alerts: &[WeatherAlert],
    traffic_updates: &[TrafficUpdate],
) -> Result<String> {
    Ok(format!(
        "Based on real-time conditions, suggest updates to this itinerary.

Current itinerary: {itinerary}
Weather alerts: {alerts}
Traffic updates: {traffic}

Provide smart adjustments such as:
- Indoor alternatives for bad weather
- Route changes for traffic
- Time adjustments for delays
- Backup plans for cancellations

Only reference dates that appear in the itinerary.

{contract}",
        itinerary = serde_json::to_string_pretty(itinerary)?,
        alerts = serde_json::to_string_pretty(weather_alerts)?,
        traffic = serde_json::to_string_pretty(traffic_updates)?,
        contract = UpdateBatch::schema().prompt_contract(),
    ))
}
