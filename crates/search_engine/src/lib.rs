//! Search engine: debounce timer, data sources, dispatch and effect execution.
mod auth;
mod cache;
mod debounce;
mod dispatch;
mod engine;
mod persist;
mod source;
mod types;

pub use auth::{EnvToken, NoToken, StaticToken, TokenProvider};
pub use cache::{CachedSource, TtlCache};
pub use debounce::Debouncer;
pub use dispatch::{
    BatchSink, ChannelBatchSink, DispatchSettings, Dispatcher, PendingBatch,
    DEFAULT_SOURCE_TIMEOUT,
};
pub use engine::{EngineError, EngineHandle};
pub use persist::{PersistError, StateFiles};
pub use source::{decode_hits, HttpSource, HttpSourceSettings, SearchSource, SAVE_HISTORY_PARAM};
pub use types::{EngineEvent, FailureKind, FetchError, HitKind, SourceRequest};
