use chrono::Duration;
use tracing::info;

use crate::types::{
    itinerary::{static_advice, CULTURAL_INSIGHTS, LOCAL_RECOMMENDATIONS, SAFETY_TIPS},
    CandidatePools, DayPlan, GenerationSource, Itinerary, ItineraryDraft, TripRequest,
};

const ACTIVITIES_PER_DAY: usize = 2;
const MEALS_PER_DAY: usize = 2;
const TOP_OPTIONS: usize = 2;

/// Window of `pool` for day `offset`, falling back to the head of the pool
/// once `offset` runs past the end.
fn day_window<T: Clone>(pool: &[T], offset: usize, width: usize) -> Vec<T> {
    let start = if offset < pool.len() { offset } else { 0 };
    let end = (start + width).min(pool.len());
    pool[start..end].to_vec()
}

fn top<T: Clone>(pool: &[T]) -> Vec<T> {
    pool.iter().take(TOP_OPTIONS).cloned().collect()
}

/// Builds a complete itinerary from the candidate pools alone.
///
/// Deterministic and infallible: day `i` takes activities `[2i, 2i+2)` and
/// restaurants `[i, i+2)`, wrapping to the first two once a pool is
/// exhausted. Empty pools give empty, zero-cost days.
pub fn synthesize_fallback(trip_request: &TripRequest, pools: &CandidatePools) -> Itinerary {
    let duration_days = trip_request.duration_days().max(0);

    let days: Vec<DayPlan> = (0..duration_days)
        .map(|i| {
            let index = i as usize;
            DayPlan::new(
                trip_request.start_date + Duration::days(i),
                day_window(&pools.activities, index * ACTIVITIES_PER_DAY, ACTIVITIES_PER_DAY),
                day_window(&pools.restaurants, index, MEALS_PER_DAY),
            )
        })
        .collect();

    let draft = ItineraryDraft {
        summary: format!(
            "Personalized {duration_days}-day trip to {}",
            trip_request.destination.name
        ),
        days,
        accommodation: top(&pools.accommodations),
        transportation: top(&pools.flights),
        cultural_insights: static_advice(&CULTURAL_INSIGHTS),
        safety_tips: static_advice(&SAFETY_TIPS),
        local_recommendations: static_advice(&LOCAL_RECOMMENDATIONS),
    };

    let itinerary = Itinerary::from_draft(trip_request.clone(), draft, GenerationSource::Fallback);
    info!(
        target: "plansmith::assembler",
        itinerary_id = %itinerary.id,
        days = itinerary.days.len(),
        total_cost = itinerary.total_cost,
        "synthesized fallback itinerary"
    );
    itinerary
}
