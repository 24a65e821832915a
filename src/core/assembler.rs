//! The public entry point for turning a trip request into an itinerary.

use std::{future::Future, sync::Arc};

use tracing::{debug, info, warn};

use super::{
    context::{build_context, GenerationContext},
    fallback::synthesize_fallback,
    planner::GenerativePlanner,
};
use crate::{
    error::{PlannerError, Result},
    services::{CandidateProvider, ItineraryStore, SignalProvider},
    types::{CandidatePools, Itinerary, LocalEvent, TripRequest, WeatherSnapshot},
};

/// Orchestrates context gathering, generation and fallback.
///
/// Every collaborator is optional. Without providers the pools and signals
/// are empty; without a planner every itinerary comes from the fallback path.
#[derive(Debug, Clone, Default)]
pub struct ItineraryAssembler {
    candidates: Option<Arc<dyn CandidateProvider>>,
    signals: Option<Arc<dyn SignalProvider>>,
    planner: Option<GenerativePlanner>,
    store: Option<Arc<dyn ItineraryStore>>,
}

/// Runs `fetch` if the provider exists; errors are logged and become `None`.
async fn absorb<T, F>(source: &'static str, fetch: Option<F>) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match fetch?.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                target: "plansmith::providers",
                source,
                code = err.error_code(),
                error = %err,
                "provider fetch failed, continuing without it"
            );
            None
        }
    }
}

impl ItineraryAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidate_provider(mut self, provider: Arc<dyn CandidateProvider>) -> Self {
        self.candidates = Some(provider);
        self
    }

    pub fn with_signal_provider(mut self, provider: Arc<dyn SignalProvider>) -> Self {
        self.signals = Some(provider);
        self
    }

    pub fn with_planner(mut self, planner: GenerativePlanner) -> Self {
        self.planner = Some(planner);
        self
    }

    /// Finished itineraries are saved here before being returned.
    pub fn with_store(mut self, store: Arc<dyn ItineraryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds an itinerary for `request` using the configured providers.
    ///
    /// Only `InvalidRequest` (and store failures) reach the caller; every
    /// generation problem is absorbed by falling back.
    pub async fn assemble(&self, request: TripRequest) -> Result<Itinerary> {
        request.validate()?;
        let (weather, events, pools) = self.gather(&request).await;
        self.assemble_with(request, weather, events, pools).await
    }

    /// Builds an itinerary from signals and pools the caller already holds.
    pub async fn assemble_with(
        &self,
        request: TripRequest,
        weather: Option<WeatherSnapshot>,
        events: Option<Vec<LocalEvent>>,
        pools: CandidatePools,
    ) -> Result<Itinerary> {
        request.validate()?;
        let context = build_context(request, weather, events, pools)?;

        let mut itinerary = match self.generate(&context).await {
            Ok(itinerary) => itinerary,
            Err(err) => {
                warn!(
                    target: "plansmith::assembler",
                    code = err.error_code(),
                    error = %err,
                    "generative path failed, using fallback"
                );
                synthesize_fallback(&context.trip_request, &context.pools)
            }
        };
        attach_forecasts(&mut itinerary, &context.weather);

        if let Some(store) = &self.store {
            store.save(&itinerary).await?;
        }

        info!(
            target: "plansmith::assembler",
            itinerary_id = %itinerary.id,
            source = ?itinerary.generated_by,
            days = itinerary.days.len(),
            total_cost = itinerary.total_cost,
            "itinerary assembled"
        );
        Ok(itinerary)
    }

    /// Fetches weather, events and the four candidate pools concurrently.
    async fn gather(
        &self,
        request: &TripRequest,
    ) -> (Option<WeatherSnapshot>, Option<Vec<LocalEvent>>, CandidatePools) {
        let destination = &request.destination;
        let city = if destination.city.is_empty() {
            destination.name.as_str()
        } else {
            destination.city.as_str()
        };
        let state = destination.state.as_str();
        let preferences = &request.preferences;
        let signals = self.signals.as_ref();
        let candidates = self.candidates.as_ref();

        let (weather, events, activities, accommodations, flights, restaurants) = futures::join!(
            absorb("weather", signals.map(|p| p.weather(city, state))),
            absorb(
                "events",
                signals.map(|p| p.events(city, state, request.start_date, request.end_date)),
            ),
            absorb("activities", candidates.map(|p| p.activities(preferences))),
            absorb("accommodations", candidates.map(|p| p.accommodations(preferences))),
            absorb("flights", candidates.map(|p| p.flights(preferences))),
            absorb("restaurants", candidates.map(|p| p.restaurants(preferences))),
        );

        let pools = CandidatePools {
            activities: activities.unwrap_or_default(),
            accommodations: accommodations.unwrap_or_default(),
            flights: flights.unwrap_or_default(),
            restaurants: restaurants.unwrap_or_default(),
        };
        debug!(
            target: "plansmith::assembler",
            activities = pools.activities.len(),
            accommodations = pools.accommodations.len(),
            flights = pools.flights.len(),
            restaurants = pools.restaurants.len(),
            has_weather = weather.is_some(),
            "context gathered"
        );
        (weather, events, pools)
    }

    /// The generative path. Any error here means "use the fallback".
    async fn generate(&self, context: &GenerationContext) -> Result<Itinerary> {
        let planner = self.planner.as_ref().ok_or_else(|| {
            PlannerError::GenerationUnavailable("no text-completion service configured".to_string())
        })?;

        let itinerary = planner.generate(context).await?.into_itinerary();
        let problems = itinerary.inconsistencies();
        if !problems.is_empty() {
            return Err(PlannerError::MalformedGeneration(format!(
                "generated plan is inconsistent: {}",
                problems.join("; ")
            )));
        }
        Ok(itinerary)
    }
}

fn attach_forecasts(itinerary: &mut Itinerary, weather: &WeatherSnapshot) {
    for day in &mut itinerary.days {
        day.weather_forecast = weather.forecast_for(day.date).cloned();
    }
}
