//! Candidate items supplied by a [`CandidateProvider`](crate::services::providers::CandidateProvider).
//!
//! All four kinds are read-only inputs to the engine. Their decoders are
//! lenient (most fields default) because the same shapes come back inside
//! generated plans.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    lenient::{lenient_location, LocationField},
    trip::{BudgetLevel, Location, TravelTheme},
};

/// Accessors shared by every candidate kind.
pub trait CandidateItem {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Per-person, per-night or per-ticket cost depending on the kind.
    fn unit_cost(&self) -> f64;
    fn rating(&self) -> Option<f64>;
    fn location(&self) -> &Location;
    fn budget_level(&self) -> Option<BudgetLevel> {
        None
    }
    fn themes(&self) -> &[TravelTheme] {
        &[]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Activity {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_location")]
    #[schemars(with = "Option<LocationField>")]
    pub location: Location,
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default)]
    pub cost_per_person: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Suggested slot, e.g. "09:00-11:00", when a plan assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<BudgetLevel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<TravelTheme>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    Hotel,
    Hostel,
    Resort,
    Homestay,
    VacationRental,
}

fn default_accommodation_type() -> AccommodationType {
    AccommodationType::Hotel
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Accommodation {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_accommodation_type")]
    pub kind: AccommodationType,
    #[serde(default, deserialize_with = "lenient_location")]
    #[schemars(with = "Option<LocationField>")]
    pub location: Location,
    #[serde(default)]
    pub cost_per_night: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<BudgetLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Flight {
    #[serde(default)]
    pub id: String,
    pub airline: String,
    #[serde(default)]
    pub from_location: String,
    #[serde(default)]
    pub to_location: String,
    /// Local departure time as printed on the ticket
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub duration: String,
    /// Round-trip fare for the party
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<BudgetLevel>,
    /// Arrival airport or city
    #[serde(default, deserialize_with = "lenient_location")]
    #[schemars(with = "Option<LocationField>")]
    pub location: Location,
}

impl Flight {
    pub fn new(
        airline: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: String::new(),
            airline: airline.into(),
            from_location: from.into(),
            to_location: to.into(),
            departure_time: String::new(),
            arrival_time: String::new(),
            duration: String::new(),
            price,
            rating: None,
            budget_level: None,
            location: Location::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Restaurant {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub price_range: String,
    #[serde(default, alias = "cost_per_person")]
    pub average_cost_per_person: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_location")]
    #[schemars(with = "Option<LocationField>")]
    pub location: Location,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<BudgetLevel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<TravelTheme>,
}

impl CandidateItem for Activity {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn unit_cost(&self) -> f64 {
        self.cost_per_person
    }
    fn rating(&self) -> Option<f64> {
        self.rating
    }
    fn location(&self) -> &Location {
        &self.location
    }
    fn budget_level(&self) -> Option<BudgetLevel> {
        self.budget_level
    }
    fn themes(&self) -> &[TravelTheme] {
        &self.themes
    }
}

impl CandidateItem for Accommodation {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn unit_cost(&self) -> f64 {
        self.cost_per_night
    }
    fn rating(&self) -> Option<f64> {
        self.rating
    }
    fn location(&self) -> &Location {
        &self.location
    }
    fn budget_level(&self) -> Option<BudgetLevel> {
        self.budget_level
    }
}

impl CandidateItem for Flight {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.airline
    }
    fn unit_cost(&self) -> f64 {
        self.price
    }
    fn rating(&self) -> Option<f64> {
        self.rating
    }
    fn location(&self) -> &Location {
        &self.location
    }
    fn budget_level(&self) -> Option<BudgetLevel> {
        self.budget_level
    }
}

impl CandidateItem for Restaurant {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn unit_cost(&self) -> f64 {
        self.average_cost_per_person
    }
    fn rating(&self) -> Option<f64> {
        self.rating
    }
    fn location(&self) -> &Location {
        &self.location
    }
    fn budget_level(&self) -> Option<BudgetLevel> {
        self.budget_level
    }
    fn themes(&self) -> &[TravelTheme] {
        &self.themes
    }
}

/// A single candidate of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Candidate {
    Activity(Activity),
    Accommodation(Accommodation),
    Flight(Flight),
    Restaurant(Restaurant),
}

impl Candidate {
    pub fn item(&self) -> &dyn CandidateItem {
        match self {
            Candidate::Activity(item) => item,
            Candidate::Accommodation(item) => item,
            Candidate::Flight(item) => item,
            Candidate::Restaurant(item) => item,
        }
    }
}

/// The four pools handed to the engine. Empty pools are valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePools {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub accommodations: Vec<Accommodation>,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
}

impl CandidatePools {
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
            && self.accommodations.is_empty()
            && self.flights.is_empty()
            && self.restaurants.is_empty()
    }

    /// Splits a mixed list into per-kind pools, preserving order within each kind.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut pools = Self::default();
        for candidate in candidates {
            match candidate {
                Candidate::Activity(item) => pools.activities.push(item),
                Candidate::Accommodation(item) => pools.accommodations.push(item),
                Candidate::Flight(item) => pools.flights.push(item),
                Candidate::Restaurant(item) => pools.restaurants.push(item),
            }
        }
        pools
    }
}
