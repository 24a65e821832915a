pub mod candidates;
pub mod delta;
pub mod itinerary;
pub(crate) mod lenient;
pub mod response;
pub mod signals;
pub mod trip;

pub use candidates::{
    Accommodation, AccommodationType, Activity, Candidate, CandidateItem, CandidatePools, Flight,
    Restaurant,
};
pub use delta::{
    ActivityRef, AlternativeSuggestions, RealTimeUpdates, SuggestionBatch, SuggestionChanges,
    SuggestionDelta, UpdateBatch, UpdateDelta, UpdateKind,
};
pub use itinerary::{
    BudgetBreakdown, DayPlan, GenerationSource, Itinerary, ItineraryDraft, TransportLeg,
    TransportationMode,
};
pub use response::{decode_structured, deserialize_structured_response};
pub use signals::{
    CurrentConditions, ForecastDay, LocalEvent, TrafficUpdate, WeatherAlert, WeatherSnapshot,
};
pub use trip::{BudgetLevel, Location, Preferences, TravelTheme, TripRequest};
