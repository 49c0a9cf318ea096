use std::time::Duration;

use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// (Re)start the debounce timer for `text`, cancelling any pending fire.
    Debounce { text: String, delay: Duration },
    CancelDebounce,
    Dispatch(DispatchRequest),
}

/// Everything the engine needs to query the eligible sources for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub generation: Generation,
    pub query: String,
    /// Eligible source names, in priority order.
    pub sources: Vec<String>,
    pub save_history: bool,
}
