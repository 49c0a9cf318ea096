use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Search parameters for one source. The fetch itself lives in the engine and
/// is matched to this spec by `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    pub min_query_len: usize,
    /// `None` keeps every result.
    pub result_limit: Option<usize>,
    /// Lower merges first; ties keep declaration order.
    pub priority: i32,
    pub enabled: bool,
    pub records_history: bool,
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, min_query_len: usize) -> Self {
        Self {
            name: name.into(),
            min_query_len,
            result_limit: None,
            priority: 0,
            enabled: true,
            records_history: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.result_limit = Some(limit);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn recording_history(mut self) -> Self {
        self.records_history = true;
        self
    }

    pub(crate) fn accepts(&self, query_len: usize) -> bool {
        self.enabled && query_len >= self.min_query_len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub sources: Vec<SourceSpec>,
    pub save_history: bool,
    pub recent_limit: usize,
}

impl SearchConfig {
    pub fn new(sources: Vec<SourceSpec>) -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            sources,
            save_history: false,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn has_source(&self, name: &str) -> bool {
        self.sources.iter().any(|spec| spec.name == name)
    }
}

impl Default for SearchConfig {
    /// Region matches (1+ chars, capped at 2) ahead of apartment matches (2+ chars).
    fn default() -> Self {
        Self::new(vec![
            SourceSpec::new("locations", 1).with_limit(2).with_priority(0),
            SourceSpec::new("apartments", 2)
                .with_priority(1)
                .recording_history(),
        ])
    }
}
