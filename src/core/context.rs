use crate::{
    error::{PlannerError, Result},
    types::{CandidatePools, LocalEvent, TripRequest, WeatherSnapshot},
};

/// Everything one synthesis pass needs, gathered before any planning starts.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub trip_request: TripRequest,
    /// Number of day plans the itinerary must contain; always at least 1
    pub duration_days: u32,
    /// Neutral (empty) when weather was unavailable
    pub weather: WeatherSnapshot,
    pub events: Vec<LocalEvent>,
    pub pools: CandidatePools,
}

/// Normalizes the gathered inputs into a [`GenerationContext`].
///
/// Missing weather or events become neutral empty values. Fails with
/// `InvalidRequest` when the trip spans less than one day.
pub fn build_context(
    trip_request: TripRequest,
    weather: Option<WeatherSnapshot>,
    events: Option<Vec<LocalEvent>>,
    pools: CandidatePools,
) -> Result<GenerationContext> {
    let days = trip_request.duration_days();
    if days < 1 {
        return Err(PlannerError::InvalidRequest(format!(
            "trip must span at least one day, got {days} ({} to {})",
            trip_request.start_date, trip_request.end_date
        )));
    }
    let duration_days = u32::try_from(days).map_err(|_| {
        PlannerError::InvalidRequest(format!("trip duration of {days} days is too long"))
    })?;

    Ok(GenerationContext {
        trip_request,
        duration_days,
        weather: weather.unwrap_or_default(),
        events: events.unwrap_or_default(),
        pools,
    })
}
