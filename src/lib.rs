//! plansmith: itinerary synthesis for trip requests.
//!
//! A request plus candidate pools (activities, stays, flights, restaurants)
//! and context signals (weather, local events) become a day-by-day,
//! cost-annotated [`Itinerary`]. A text-completion service drafts the plan
//! when one is configured; otherwise, or whenever it fails, a deterministic
//! fallback builds it from the pools alone.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plansmith::{
//!     EngineConfig, GenerativePlanner, ItineraryAssembler, OpenAiCompatibleClient,
//!     StaticCandidateProvider, TripRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::from_env()?;
//!     let client = Arc::new(OpenAiCompatibleClient::from_config(&config)?);
//!
//!     let assembler = ItineraryAssembler::new()
//!         .with_candidate_provider(Arc::new(StaticCandidateProvider::default()))
//!         .with_planner(GenerativePlanner::from_config(client, &config));
//!
//!     let request: TripRequest = serde_json::from_str(&std::fs::read_to_string("trip.json")?)?;
//!     let itinerary = assembler.assemble(request).await?;
//!     println!("{}", serde_json::to_string_pretty(&itinerary)?);
//!     Ok(())
//! }
//! ```

extern crate self as plansmith;

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::{EngineConfig, SampleLimits};
pub use core::{
    build_context, parse_plan, synthesize_fallback, AlternativeSuggestionGenerator,
    GenerationContext, GenerativePlanner, ItineraryAssembler, ParsedPlan, RealTimeUpdateGenerator,
};
pub use error::{PlannerError, Result};
pub use plansmith_macros::completion_schema;
pub use schemas::{CompletionSchema, SchemaHandle};
pub use services::{
    CandidateProvider, InMemoryItineraryStore, ItineraryStore, OpenAiCompatibleClient,
    SignalProvider, StaticCandidateProvider, StaticSignalProvider, TextCompletion,
};
pub use types::{
    AlternativeSuggestions, CandidatePools, DayPlan, Itinerary, RealTimeUpdates, TripRequest,
};

#[cfg(feature = "cli")]
pub mod cli;
