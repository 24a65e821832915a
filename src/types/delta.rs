//! Proposed, unapplied changes to an existing itinerary.
//!
//! The `*Batch` structs are what the text-completion service is asked to
//! return; they carry a `CompletionSchema` so responses are validated before
//! decoding. The outer structs stamp the batch with the itinerary it targets.

use crate::completion_schema;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    candidates::Activity,
    lenient::{lenient_amount, AmountField},
};

/// An activity mentioned in a change, either by name or in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ActivityRef {
    Named(String),
    Detailed(Activity),
}

impl ActivityRef {
    pub fn name(&self) -> &str {
        match self {
            ActivityRef::Named(name) => name,
            ActivityRef::Detailed(activity) => &activity.name,
        }
    }
}

/// Structural edits proposed by one suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionChanges {
    /// 1-based day numbers the suggestion touches
    #[serde(default)]
    pub modified_days: Vec<u32>,
    #[serde(default)]
    pub new_activities: Vec<ActivityRef>,
    #[serde(default)]
    pub removed_activities: Vec<ActivityRef>,
    /// Signed change to the total trip cost
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<AmountField>")]
    pub cost_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionDelta {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub changes: SuggestionChanges,
    #[serde(default, alias = "reasoning")]
    pub rationale: String,
}

/// Alternative modifications that address the traveler's feedback.
#[completion_schema]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionBatch {
    /// Exactly three proposed modifications
    pub suggestions: Vec<SuggestionDelta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Weather,
    Traffic,
    Cancellation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateDelta {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub affected_date: NaiveDate,
    pub original_activity: String,
    pub suggested_alternative: String,
    pub reason: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<AmountField>")]
    pub cost_impact: f64,
    #[serde(default)]
    pub booking_required: bool,
}

/// Adjustments for live weather and traffic conditions.
#[completion_schema]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateBatch {
    /// One entry per affected activity
    pub updates: Vec<UpdateDelta>,
    /// Advice that applies to the whole trip under current conditions
    #[serde(default)]
    pub general_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSuggestions {
    pub itinerary_id: String,
    pub feedback: String,
    pub suggestions: Vec<SuggestionDelta>,
}

impl AlternativeSuggestions {
    pub fn total_cost_impact(&self) -> f64 {
        self.suggestions.iter().map(|s| s.changes.cost_impact).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeUpdates {
    pub itinerary_id: String,
    pub updates: Vec<UpdateDelta>,
    pub general_recommendations: Vec<String>,
}

impl RealTimeUpdates {
    pub fn requires_rebooking(&self) -> bool {
        self.updates.iter().any(|update| update.booking_required)
    }

    pub fn for_date(&self, date: NaiveDate) -> impl Iterator<Item = &UpdateDelta> {
        self.updates.iter().filter(move |update| update.affected_date == date)
    }
}
