use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    error::{PlannerError, Result},
    types::Itinerary,
};

/// Persistence for finished itineraries, keyed by itinerary id.
#[async_trait]
pub trait ItineraryStore: Send + Sync + std::fmt::Debug {
    /// Stores (or replaces) the itinerary and returns its id.
    async fn save(&self, itinerary: &Itinerary) -> Result<String>;

    async fn get(&self, id: &str) -> Result<Option<Itinerary>>;

    /// Flags a stored itinerary as booked. `NotFound` when the id is unknown.
    async fn mark_booked(&self, id: &str, booking_id: &str) -> Result<Itinerary>;
}

/// Process-local store for tests and single-shot CLI runs.
#[derive(Debug, Default)]
pub struct InMemoryItineraryStore {
    itineraries: RwLock<HashMap<String, Itinerary>>,
}

impl InMemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.itineraries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.itineraries.read().await.is_empty()
    }
}

#[async_trait]
impl ItineraryStore for InMemoryItineraryStore {
    async fn save(&self, itinerary: &Itinerary) -> Result<String> {
        let id = itinerary.id.clone();
        self.itineraries
            .write()
            .await
            .insert(id.clone(), itinerary.clone());
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Itinerary>> {
        Ok(self.itineraries.read().await.get(id).cloned())
    }

    async fn mark_booked(&self, id: &str, booking_id: &str) -> Result<Itinerary> {
        let mut itineraries = self.itineraries.write().await;
        let itinerary = itineraries
            .get_mut(id)
            .ok_or_else(|| PlannerError::NotFound(id.to_string()))?;
        itinerary.mark_booked(booking_id);
        info!(target: "plansmith::store", itinerary_id = id, booking_id, "itinerary booked");
        Ok(itinerary.clone())
    }
}
