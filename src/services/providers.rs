//! Boundary traits for the candidate and context-signal collaborators, plus
//! catalogue-backed implementations for offline use and tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::{
    error::Result,
    types::{
        Accommodation, Activity, BudgetLevel, CandidateItem, CandidatePools, Flight, LocalEvent,
        Preferences, Restaurant, WeatherSnapshot,
    },
};

/// Supplies preference-filtered, ranked candidate pools. Empty lists are valid.
#[async_trait]
pub trait CandidateProvider: Send + Sync + std::fmt::Debug {
    async fn activities(&self, preferences: &Preferences) -> Result<Vec<Activity>>;
    async fn accommodations(&self, preferences: &Preferences) -> Result<Vec<Accommodation>>;
    async fn flights(&self, preferences: &Preferences) -> Result<Vec<Flight>>;
    async fn restaurants(&self, preferences: &Preferences) -> Result<Vec<Restaurant>>;

    /// All four pools at once. A failing pool is an error for the whole call;
    /// the assembler fetches pools individually when it needs per-pool isolation.
    async fn fetch_candidates(&self, preferences: &Preferences) -> Result<CandidatePools> {
        let (activities, accommodations, flights, restaurants) = futures::try_join!(
            self.activities(preferences),
            self.accommodations(preferences),
            self.flights(preferences),
            self.restaurants(preferences),
        )?;
        Ok(CandidatePools {
            activities,
            accommodations,
            flights,
            restaurants,
        })
    }
}

/// Supplies weather and local events for a destination.
#[async_trait]
pub trait SignalProvider: Send + Sync + std::fmt::Debug {
    async fn weather(&self, city: &str, state: &str) -> Result<WeatherSnapshot>;

    async fn events(
        &self,
        city: &str,
        state: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LocalEvent>>;
}

/// Filters and ranks a fixed catalogue against the traveler's preferences.
///
/// An item passes when it has no budget tag or its tag matches, and when it
/// has no theme tags or shares one with the preferences. Survivors are sorted
/// by rating, highest first; ties keep catalogue order.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateProvider {
    catalogue: CandidatePools,
}

impl StaticCandidateProvider {
    pub fn new(catalogue: CandidatePools) -> Self {
        Self { catalogue }
    }
}

fn matches_preferences(item: &dyn CandidateItem, preferences: &Preferences) -> bool {
    let budget_ok = item
        .budget_level()
        .map_or(true, |level: BudgetLevel| level == preferences.budget_level);
    let themes = item.themes();
    let themes_ok = themes.is_empty() || themes.iter().any(|t| preferences.themes.contains(t));
    budget_ok && themes_ok
}

fn rank<T: CandidateItem + Clone>(pool: &[T], preferences: &Preferences) -> Vec<T> {
    let mut selected: Vec<T> = pool
        .iter()
        .filter(|item| matches_preferences(*item, preferences))
        .cloned()
        .collect();
    // sort_by is stable, so equal ratings keep catalogue order
    selected.sort_by(|a, b| {
        let a = a.rating().unwrap_or(0.0);
        let b = b.rating().unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });
    debug!(
        target: "plansmith::providers",
        offered = pool.len(),
        selected = selected.len(),
        "ranked candidate pool"
    );
    selected
}

#[async_trait]
impl CandidateProvider for StaticCandidateProvider {
    async fn activities(&self, preferences: &Preferences) -> Result<Vec<Activity>> {
        Ok(rank(&self.catalogue.activities, preferences))
    }

    async fn accommodations(&self, preferences: &Preferences) -> Result<Vec<Accommodation>> {
        Ok(rank(&self.catalogue.accommodations, preferences))
    }

    async fn flights(&self, preferences: &Preferences) -> Result<Vec<Flight>> {
        Ok(rank(&self.catalogue.flights, preferences))
    }

    async fn restaurants(&self, preferences: &Preferences) -> Result<Vec<Restaurant>> {
        Ok(rank(&self.catalogue.restaurants, preferences))
    }
}

/// Serves a fixed weather snapshot and event list.
#[derive(Debug, Clone, Default)]
pub struct StaticSignalProvider {
    weather: WeatherSnapshot,
    events: Vec<LocalEvent>,
}

impl StaticSignalProvider {
    pub fn new(weather: WeatherSnapshot, events: Vec<LocalEvent>) -> Self {
        Self { weather, events }
    }
}

#[async_trait]
impl SignalProvider for StaticSignalProvider {
    async fn weather(&self, city: &str, state: &str) -> Result<WeatherSnapshot> {
        let mut snapshot = self.weather.clone();
        if snapshot.city.is_empty() {
            snapshot.city = format!("{city}, {state}");
        }
        Ok(snapshot)
    }

    /// Events dated inside `[start, end]`.
    async fn events(
        &self,
        _city: &str,
        _state: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LocalEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.date >= start && event.date <= end)
            .cloned()
            .collect())
    }
}
