pub mod assembler;
pub mod context;
pub mod deltas;
pub mod fallback;
pub mod parser;
pub mod planner;

pub use assembler::ItineraryAssembler;
pub use context::{build_context, GenerationContext};
pub use deltas::{AlternativeSuggestionGenerator, RealTimeUpdateGenerator, SUGGESTION_COUNT};
pub use fallback::synthesize_fallback;
pub use parser::{parse_plan, GeneratedDay, GeneratedPlan, ParsedPlan};
pub use planner::GenerativePlanner;
