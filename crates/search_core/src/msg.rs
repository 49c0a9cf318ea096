#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search box (raw, every keystroke).
    InputChanged(String),
    /// Debounce timer fired for this input value.
    InputSettled(String),
    /// Engine resolved one source for one generation.
    BatchReceived(crate::SourceBatch),
    /// Include or exclude a source from future searches.
    SourceToggled { source: String, enabled: bool },
    /// Ask sources to record settled queries as search history.
    HistoryToggled(bool),
    /// Restore recent queries from persisted state.
    RestoreRecentQueries(Vec<String>),
    /// Consuming view went away; drop all in-flight work.
    Reset,
}
