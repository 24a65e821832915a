pub mod completion;
pub mod openai_client;
pub mod prompts;
pub mod providers;
pub mod store;

pub use completion::TextCompletion;
pub use openai_client::{ChatCompletionRequest, OpenAiCompatibleClient};
pub use providers::{CandidateProvider, SignalProvider, StaticCandidateProvider, StaticSignalProvider};
pub use store::{InMemoryItineraryStore, ItineraryStore};
