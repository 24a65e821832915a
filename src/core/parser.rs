//! Turns raw completion text into a typed plan.
//!
//! Completion services often wrap the JSON in prose or code fences, so the
//! payload is taken to be everything from the first `{` to the last `}`.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{PlannerError, Result},
    types::{
        itinerary::{static_advice, CULTURAL_INSIGHTS, LOCAL_RECOMMENDATIONS, SAFETY_TIPS},
        lenient::lenient_amount,
        Accommodation, Activity, DayPlan, Flight, GenerationSource, Itinerary, ItineraryDraft,
        Restaurant, TransportLeg, TripRequest,
    },
};

/// Top-level fields that are filled in when a generated plan leaves them out.
const REPAIRED_FIELDS: [&str; 5] = ["summary", "days", "accommodation", "transportation", "total_cost"];

fn repaired_default(field: &str) -> Value {
    match field {
        "summary" => Value::String(String::new()),
        "total_cost" => Value::from(0),
        _ => Value::Array(Vec::new()),
    }
}

/// Slice of `text` from the first `{` to the last `}` inclusive.
pub(crate) fn extract_json_region(text: &str) -> Result<&str> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(PlannerError::MalformedGeneration(
            "completion text contains no JSON object".to_string(),
        )),
    }
}

/// Extracts and decodes the JSON object embedded in `text`.
pub(crate) fn extract_json_object(text: &str) -> Result<Value> {
    let region = extract_json_region(text)?;
    let value: Value = serde_json::from_str(region).map_err(|err| {
        PlannerError::MalformedGeneration(format!("embedded JSON does not parse: {err}"))
    })?;
    if !value.is_object() {
        return Err(PlannerError::MalformedGeneration(
            "embedded JSON is not an object".to_string(),
        ));
    }
    Ok(value)
}

/// One day as the completion service described it.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub meals: Vec<Restaurant>,
    #[serde(default)]
    pub transportation: Vec<TransportLeg>,
    /// Reported by the service; recomputed before use
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_daily_cost: f64,
}

/// A plan as the completion service described it, after top-level repair.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedPlan {
    pub summary: String,
    pub days: Vec<GeneratedDay>,
    pub accommodation: Vec<Accommodation>,
    pub transportation: Vec<Flight>,
    #[serde(deserialize_with = "lenient_amount")]
    pub total_cost: f64,
    #[serde(default)]
    pub cultural_insights: Vec<String>,
    #[serde(default)]
    pub safety_tips: Vec<String>,
    #[serde(default)]
    pub local_recommendations: Vec<String>,
}

/// A decoded plan stamped with the request it answers.
#[derive(Debug, Clone)]
pub struct ParsedPlan {
    pub trip_request: TripRequest,
    pub plan: GeneratedPlan,
    pub source: GenerationSource,
}

/// Absent and `null` top-level fields get neutral defaults.
fn repair_missing_fields(object: &mut Map<String, Value>) -> Vec<&'static str> {
    let mut repaired = Vec::new();
    for field in REPAIRED_FIELDS {
        if object.get(field).map_or(true, Value::is_null) {
            object.insert(field.to_string(), repaired_default(field));
            repaired.push(field);
        }
    }
    repaired
}

/// Parses completion text into a [`ParsedPlan`] for `trip_request`.
///
/// Fails with `MalformedGeneration` when no JSON object can be located or
/// when the repaired object does not decode into a plan.
pub fn parse_plan(text: &str, trip_request: &TripRequest) -> Result<ParsedPlan> {
    let mut value = extract_json_object(text)?;
    if let Value::Object(object) = &mut value {
        let repaired = repair_missing_fields(object);
        if !repaired.is_empty() {
            debug!(target: "plansmith::planner", ?repaired, "filled missing plan fields");
        }
    }

    let plan: GeneratedPlan = serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        PlannerError::MalformedGeneration(format!(
            "generated plan does not decode at `{path}`: {}",
            err.into_inner()
        ))
    })?;

    Ok(ParsedPlan {
        trip_request: trip_request.clone(),
        plan,
        source: GenerationSource::Generative,
    })
}

fn or_static(lines: Vec<String>, fallback: &[&str]) -> Vec<String> {
    if lines.is_empty() {
        static_advice(fallback)
    } else {
        lines
    }
}

impl ParsedPlan {
    /// Selections of the plan. Empty advice lists are replaced by the static ones.
    pub fn into_draft(self) -> ItineraryDraft {
        let plan = self.plan;
        let days = plan
            .days
            .into_iter()
            .map(|day| {
                DayPlan::new(day.date, day.activities, day.meals)
                    .with_transportation(day.transportation)
            })
            .collect();

        ItineraryDraft {
            summary: plan.summary,
            days,
            accommodation: plan.accommodation,
            transportation: plan.transportation,
            cultural_insights: or_static(plan.cultural_insights, &CULTURAL_INSIGHTS),
            safety_tips: or_static(plan.safety_tips, &SAFETY_TIPS),
            local_recommendations: or_static(plan.local_recommendations, &LOCAL_RECOMMENDATIONS),
        }
    }

    /// Builds the itinerary, with every cost recomputed from the selections.
    pub fn into_itinerary(self) -> Itinerary {
        let trip_request = self.trip_request.clone();
        let source = self.source;
        Itinerary::from_draft(trip_request, self.into_draft(), source)
    }
}
