use crate::{Generation, SearchPhase, UnifiedResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    pub results: Vec<UnifiedResult>,
    pub is_searching: bool,
    pub phase: SearchPhase,
    /// Latest generation handed out, published or not.
    pub generation: Generation,
    /// Generation the visible `results` belong to.
    pub published_generation: Option<Generation>,
    pub recent_queries: Vec<String>,
    pub dirty: bool,
}
