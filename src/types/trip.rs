use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const MIN_TRAVELERS: u32 = 1;
pub const MAX_TRAVELERS: u32 = 10;

/// A named place. Coordinates and the external place id are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
            ..Self::default()
        }
    }

    /// A location known only by a free-text label.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            name: label.into(),
            ..Self::default()
        }
    }

    /// "City, State" when both are known, otherwise the best available label.
    pub fn display_label(&self) -> String {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TravelTheme {
    Heritage,
    Nightlife,
    Adventure,
    Relaxation,
    Cultural,
    Food,
    Shopping,
    Nature,
    Family,
    Romantic,
}

impl TravelTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelTheme::Heritage => "heritage",
            TravelTheme::Nightlife => "nightlife",
            TravelTheme::Adventure => "adventure",
            TravelTheme::Relaxation => "relaxation",
            TravelTheme::Cultural => "cultural",
            TravelTheme::Food => "food",
            TravelTheme::Shopping => "shopping",
            TravelTheme::Nature => "nature",
            TravelTheme::Family => "family",
            TravelTheme::Romantic => "romantic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Budget,
    MidRange,
    Luxury,
}

impl BudgetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Budget => "budget",
            BudgetLevel::MidRange => "mid_range",
            BudgetLevel::Luxury => "luxury",
        }
    }
}

fn default_languages() -> Vec<String> {
    vec!["English".to_string()]
}

fn default_travel_style() -> String {
    "balanced".to_string()
}

fn default_travelers() -> u32 {
    1
}

/// Structured traveler preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Preferences {
    pub themes: Vec<TravelTheme>,
    pub budget_level: BudgetLevel,
    /// Upper spending limit for the whole trip, currency-agnostic
    pub max_budget: f64,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub accessibility_needs: Vec<String>,
    #[serde(default = "default_languages")]
    pub languages_spoken: Vec<String>,
    #[serde(default = "default_travel_style")]
    pub travel_style: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default = "default_travelers")]
    pub travelers_count: u32,
}

impl Preferences {
    pub fn new(themes: Vec<TravelTheme>, budget_level: BudgetLevel, max_budget: f64) -> Self {
        Self {
            themes,
            budget_level,
            max_budget,
            dietary_restrictions: Vec::new(),
            accessibility_needs: Vec::new(),
            languages_spoken: default_languages(),
            travel_style: default_travel_style(),
            interests: Vec::new(),
            travelers_count: default_travelers(),
        }
    }

    pub fn theme_labels(&self) -> Vec<&'static str> {
        self.themes.iter().map(TravelTheme::as_str).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_budget.is_finite() || self.max_budget <= 0.0 {
            return Err(PlannerError::InvalidRequest(format!(
                "max_budget must be a positive amount, got {}",
                self.max_budget
            )));
        }
        check_traveler_count("preferences.travelers_count", self.travelers_count)
    }
}

/// One trip-planning request. Consumed once by the assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripRequest {
    pub origin: Location,
    pub destination: Location,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers_count: u32,
    pub preferences: Preferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
}

impl TripRequest {
    /// Calendar days between start and end; negative when the dates are reversed.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Boundary checks applied before any synthesis work starts.
    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(PlannerError::InvalidRequest(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        if self.destination.name.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "destination name must not be empty".to_string(),
            ));
        }
        check_traveler_count("travelers_count", self.travelers_count)?;
        self.preferences.validate()
    }
}

fn check_traveler_count(field: &str, count: u32) -> Result<()> {
    if (MIN_TRAVELERS..=MAX_TRAVELERS).contains(&count) {
        Ok(())
    } else {
        Err(PlannerError::InvalidRequest(format!(
            "{field} must be between {MIN_TRAVELERS} and {MAX_TRAVELERS}, got {count}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(start: &str, end: &str) -> TripRequest {
        TripRequest {
            origin: Location::new("Mumbai", "Mumbai", "Maharashtra", "India"),
            destination: Location::new("Jaipur", "Jaipur", "Rajasthan", "India"),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            travelers_count: 2,
            preferences: Preferences::new(vec![TravelTheme::Heritage], BudgetLevel::MidRange, 50_000.0),
            special_requirements: None,
        }
    }

    #[test]
    fn duration_counts_nights() {
        assert_eq!(request("2025-09-21", "2025-09-24").duration_days(), 3);
    }

    #[test]
    fn reversed_dates_are_rejected() {
        let err = request("2025-09-24", "2025-09-21").validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[test]
    fn traveler_count_is_bounded() {
        let mut trip = request("2025-09-21", "2025-09-24");
        trip.travelers_count = 11;
        assert!(trip.validate().is_err());
        trip.travelers_count = 10;
        assert!(trip.validate().is_ok());
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let mut trip = request("2025-09-21", "2025-09-24");
        trip.preferences.max_budget = 0.0;
        assert!(trip.validate().is_err());
    }

    #[test]
    fn preference_defaults_fill_in() {
        let prefs: Preferences = serde_json::from_value(json!({
            "themes": ["heritage", "food"],
            "budget_level": "mid_range",
            "max_budget": 40000
        }))
        .unwrap();
        assert_eq!(prefs.languages_spoken, vec!["English"]);
        assert_eq!(prefs.travel_style, "balanced");
        assert_eq!(prefs.travelers_count, 1);
        assert_eq!(prefs.theme_labels(), vec!["heritage", "food"]);
    }

    #[test]
    fn unknown_theme_fails_to_decode() {
        let decoded = serde_json::from_value::<Preferences>(json!({
            "themes": ["spelunking"],
            "budget_level": "budget",
            "max_budget": 100
        }));
        assert!(decoded.is_err());
    }

    #[test]
    fn display_label_prefers_city_and_state() {
        assert_eq!(
            Location::new("Hawa Mahal", "Jaipur", "Rajasthan", "India").display_label(),
            "Jaipur, Rajasthan"
        );
        assert_eq!(Location::named("Old Town").display_label(), "Old Town");
    }
}
