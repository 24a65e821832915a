use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    candidates::{Accommodation, Activity, Flight, Restaurant},
    signals::ForecastDay,
    trip::{Location, TripRequest},
};

/// Absolute tolerance used when comparing monetary sums.
pub const COST_TOLERANCE: f64 = 0.01;

pub const CULTURAL_INSIGHTS: [&str; 3] = [
    "Respect local customs and traditions",
    "Dress modestly when visiting religious sites",
    "Try local cuisine and street food",
];

pub const SAFETY_TIPS: [&str; 3] = [
    "Keep emergency contacts handy",
    "Stay hydrated and use sunscreen",
    "Be cautious with street food if you have a sensitive stomach",
];

pub const LOCAL_RECOMMENDATIONS: [&str; 3] = [
    "Visit during early morning or late evening for better weather",
    "Bargain at local markets",
    "Ask locals for their favourite neighbourhood eateries",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportationMode {
    Flight,
    Train,
    Bus,
    CarRental,
    Taxi,
    LocalTransport,
}

/// A single transfer within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportLeg {
    pub mode: TransportationMode,
    #[serde(default, deserialize_with = "super::lenient::lenient_location")]
    pub from_location: Location,
    #[serde(default, deserialize_with = "super::lenient::lenient_location")]
    pub to_location: Location,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Informational; not part of the daily total
    #[serde(default)]
    pub cost_per_person: f64,
}

/// Plan for one calendar day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Activities in visiting order
    pub activities: Vec<Activity>,
    /// Restaurants in meal order
    pub meals: Vec<Restaurant>,
    #[serde(default)]
    pub transportation: Vec<TransportLeg>,
    /// Always `sum(activity costs) + sum(meal costs)`
    pub total_daily_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_forecast: Option<ForecastDay>,
}

impl DayPlan {
    /// Builds a day and computes its total from the selections.
    pub fn new(date: NaiveDate, activities: Vec<Activity>, meals: Vec<Restaurant>) -> Self {
        let mut day = Self {
            date,
            activities,
            meals,
            transportation: Vec::new(),
            total_daily_cost: 0.0,
            weather_forecast: None,
        };
        day.recompute_cost();
        day
    }

    pub fn with_transportation(mut self, legs: Vec<TransportLeg>) -> Self {
        self.transportation = legs;
        self
    }

    pub fn activity_cost(&self) -> f64 {
        self.activities.iter().map(|a| a.cost_per_person).sum()
    }

    pub fn meal_cost(&self) -> f64 {
        self.meals.iter().map(|m| m.average_cost_per_person).sum()
    }

    pub fn recompute_cost(&mut self) {
        self.total_daily_cost = self.activity_cost() + self.meal_cost();
    }
}

/// Spend per category. Meals stay at zero: meal costs are already inside the
/// daily totals counted under `activities`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub accommodation: f64,
    pub transportation: f64,
    pub activities: f64,
    pub meals: f64,
}

impl BudgetBreakdown {
    pub fn total(&self) -> f64 {
        self.accommodation + self.transportation + self.activities + self.meals
    }
}

/// Which path produced an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    Generative,
    Fallback,
}

/// Lodging cost for the stay: first selected accommodation, every night.
pub fn accommodation_total(accommodations: &[Accommodation], nights: usize) -> f64 {
    accommodations
        .first()
        .map(|stay| stay.cost_per_night * nights as f64)
        .unwrap_or(0.0)
}

/// Transport cost for the trip: the first selected fare.
pub fn transportation_total(flights: &[Flight]) -> f64 {
    flights.first().map(|flight| flight.price).unwrap_or(0.0)
}

/// A complete, cost-annotated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: String,
    pub trip_request: TripRequest,
    pub days: Vec<DayPlan>,
    pub accommodation: Vec<Accommodation>,
    pub transportation: Vec<Flight>,
    pub summary: String,
    pub total_cost: f64,
    pub budget_breakdown: BudgetBreakdown,
    pub cultural_insights: Vec<String>,
    pub safety_tips: Vec<String>,
    pub local_recommendations: Vec<String>,
    pub generated_by: GenerationSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

/// Selections an itinerary is assembled from, before costs are derived.
#[derive(Debug, Clone)]
pub struct ItineraryDraft {
    pub summary: String,
    pub days: Vec<DayPlan>,
    pub accommodation: Vec<Accommodation>,
    pub transportation: Vec<Flight>,
    pub cultural_insights: Vec<String>,
    pub safety_tips: Vec<String>,
    pub local_recommendations: Vec<String>,
}

impl Itinerary {
    /// Derives every cost field from the draft's selections so the cost
    /// invariants hold regardless of where the selections came from.
    pub fn from_draft(
        trip_request: TripRequest,
        draft: ItineraryDraft,
        generated_by: GenerationSource,
    ) -> Self {
        let mut days = draft.days;
        days.iter_mut().for_each(DayPlan::recompute_cost);

        let nights = days.len();
        let daily_sum: f64 = days.iter().map(|day| day.total_daily_cost).sum();
        let breakdown = BudgetBreakdown {
            accommodation: accommodation_total(&draft.accommodation, nights),
            transportation: transportation_total(&draft.transportation),
            activities: daily_sum,
            meals: 0.0,
        };

        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            trip_request,
            days,
            accommodation: draft.accommodation,
            transportation: draft.transportation,
            summary: draft.summary,
            total_cost: breakdown.total(),
            budget_breakdown: breakdown,
            cultural_insights: draft.cultural_insights,
            safety_tips: draft.safety_tips,
            local_recommendations: draft.local_recommendations,
            generated_by,
            created_at: now,
            updated_at: now,
            is_booked: false,
            booking_id: None,
        }
    }

    pub fn accommodation_cost(&self) -> f64 {
        accommodation_total(&self.accommodation, self.days.len())
    }

    pub fn transportation_cost(&self) -> f64 {
        transportation_total(&self.transportation)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn mark_booked(&mut self, booking_id: impl Into<String>) {
        self.is_booked = true;
        self.booking_id = Some(booking_id.into());
        self.updated_at = Utc::now();
    }

    /// Lists every violated invariant; an empty list means the itinerary is consistent.
    pub fn inconsistencies(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let expected_days = self.trip_request.duration_days().max(0) as usize;

        if self.days.len() != expected_days {
            problems.push(format!(
                "expected {expected_days} day plans, found {}",
                self.days.len()
            ));
        }

        for (offset, day) in self.days.iter().enumerate() {
            let expected_date = self.trip_request.start_date + Duration::days(offset as i64);
            if day.date != expected_date {
                problems.push(format!(
                    "day {} is dated {}, expected {expected_date}",
                    offset + 1,
                    day.date
                ));
            }
            let computed = day.activity_cost() + day.meal_cost();
            if (day.total_daily_cost - computed).abs() > COST_TOLERANCE {
                problems.push(format!(
                    "day {} total {} does not match selections {computed}",
                    day.date, day.total_daily_cost
                ));
            }
        }

        let daily_sum: f64 = self.days.iter().map(|day| day.total_daily_cost).sum();
        let expected_total = daily_sum + self.accommodation_cost() + self.transportation_cost();
        if (self.total_cost - expected_total).abs() > COST_TOLERANCE {
            problems.push(format!(
                "total_cost {} does not match computed {expected_total}",
                self.total_cost
            ));
        }
        if (self.budget_breakdown.total() - self.total_cost).abs() > COST_TOLERANCE {
            problems.push(format!(
                "budget breakdown sums to {}, total_cost is {}",
                self.budget_breakdown.total(),
                self.total_cost
            ));
        }

        problems
    }
}

pub(crate) fn static_advice(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}
