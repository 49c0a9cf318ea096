use std::collections::{BTreeMap, VecDeque};

use crate::view_model::SearchViewModel;
use crate::{Generation, SearchConfig, SourceBatch, SourceSpec, UnifiedResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Waiting for the input to settle.
    Debouncing,
    /// Requests issued, nothing resolved yet.
    Dispatching,
    /// At least one source resolved, others still pending.
    Aggregating,
}

/// Per-generation bookkeeping. Exists only while a dispatch is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Aggregation {
    generation: Generation,
    query: String,
    pending: Vec<String>,
    received: BTreeMap<String, Vec<UnifiedResult>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    config: SearchConfig,
    input: String,
    phase: SearchPhase,
    generation: Generation,
    active: Option<Aggregation>,
    results: Vec<UnifiedResult>,
    published: Option<Generation>,
    is_searching: bool,
    recent: VecDeque<String>,
    dirty: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchState {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            input: String::new(),
            phase: SearchPhase::Idle,
            generation: 0,
            active: None,
            results: Vec::new(),
            published: None,
            is_searching: false,
            recent: VecDeque::new(),
            dirty: false,
        }
    }

    pub fn view(&self) -> SearchViewModel {
        SearchViewModel {
            results: self.results.clone(),
            is_searching: self.is_searching,
            phase: self.phase,
            generation: self.generation,
            published_generation: self.published,
            recent_queries: self.recent.iter().cloned().collect(),
            dirty: self.dirty,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn recent_queries(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Records a keystroke. Any in-flight aggregation is abandoned; its late
    /// batches will no longer match an active generation.
    pub(crate) fn record_input(&mut self, text: String) {
        self.input = text;
        self.active = None;
        self.phase = SearchPhase::Debouncing;
    }

    /// Names of the sources that accept `query`, in merge order.
    pub(crate) fn plan(&self, query: &str) -> Vec<String> {
        let len = query.chars().count();
        self.ordered_specs()
            .into_iter()
            .filter(|spec| spec.accepts(len))
            .map(|spec| spec.name.clone())
            .collect()
    }

    pub(crate) fn next_generation(&mut self) -> Generation {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn begin_aggregation(
        &mut self,
        generation: Generation,
        query: String,
        sources: Vec<String>,
    ) {
        self.active = Some(Aggregation {
            generation,
            query,
            pending: sources,
            received: BTreeMap::new(),
        });
        self.is_searching = true;
        self.phase = SearchPhase::Dispatching;
        self.mark_dirty();
    }

    /// Publishes an empty list for `generation` without dispatching anything.
    pub(crate) fn publish_empty(&mut self, generation: Generation) {
        self.active = None;
        self.results.clear();
        self.published = Some(generation);
        self.is_searching = false;
        self.phase = SearchPhase::Idle;
        self.mark_dirty();
    }

    /// Returns `true` when the batch completed its generation and results were published.
    pub(crate) fn apply_batch(&mut self, batch: SourceBatch) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.generation != batch.generation {
            return false;
        }
        let Some(index) = active.pending.iter().position(|name| *name == batch.source) else {
            return false;
        };

        active.pending.swap_remove(index);
        active.received.insert(batch.source, batch.results);
        if !active.pending.is_empty() {
            self.phase = SearchPhase::Aggregating;
            return false;
        }

        if let Some(done) = self.active.take() {
            self.publish(done);
        }
        true
    }

    pub(crate) fn set_source_enabled(&mut self, source: &str, enabled: bool) -> bool {
        match self.config.sources.iter_mut().find(|spec| spec.name == source) {
            Some(spec) => {
                spec.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_save_history(&mut self, save_history: bool) {
        self.config.save_history = save_history;
    }

    pub(crate) fn restore_recent(&mut self, queries: Vec<String>) {
        self.recent.clear();
        for query in queries {
            if !query.trim().is_empty() && !self.recent.contains(&query) {
                self.recent.push_back(query);
            }
        }
        self.recent.truncate(self.config.recent_limit);
        self.mark_dirty();
    }

    pub(crate) fn reset(&mut self) {
        self.input.clear();
        self.active = None;
        self.results.clear();
        self.published = None;
        self.is_searching = false;
        self.phase = SearchPhase::Idle;
        self.mark_dirty();
    }

    fn publish(&mut self, mut done: Aggregation) {
        let mut merged = Vec::new();
        // A source switched off mid-flight drops out of the published list.
        for spec in self.ordered_specs().into_iter().filter(|spec| spec.enabled) {
            if let Some(results) = done.received.remove(&spec.name) {
                let limit = spec.result_limit.unwrap_or(usize::MAX);
                merged.extend(results.into_iter().take(limit));
            }
        }

        if self.config.save_history && !merged.is_empty() {
            self.remember(done.query);
        }
        self.results = merged;
        self.published = Some(done.generation);
        self.is_searching = false;
        self.phase = SearchPhase::Idle;
        self.mark_dirty();
    }

    fn remember(&mut self, query: String) {
        if self.config.recent_limit == 0 {
            return;
        }
        self.recent.retain(|existing| *existing != query);
        self.recent.push_front(query);
        self.recent.truncate(self.config.recent_limit);
    }

    fn ordered_specs(&self) -> Vec<&SourceSpec> {
        let mut specs: Vec<&SourceSpec> = self.config.sources.iter().collect();
        // Stable sort keeps declaration order for equal priorities.
        specs.sort_by_key(|spec| spec.priority);
        specs
    }
}
