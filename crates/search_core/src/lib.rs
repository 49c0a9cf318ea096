//! Search core: pure aggregation state machine and view-model helpers.
mod config;
mod effect;
mod msg;
mod result;
mod state;
mod update;
mod view_model;

pub use config::{SearchConfig, SourceSpec, DEFAULT_DEBOUNCE, DEFAULT_RECENT_LIMIT};
pub use effect::{DispatchRequest, Effect};
pub use msg::Msg;
pub use result::{ApartmentHit, Generation, LocationHit, SourceBatch, UnifiedResult};
pub use state::{SearchPhase, SearchState};
pub use update::update;
pub use view_model::SearchViewModel;
