use serde::{Deserialize, Serialize};

/// Per-instance search generation. Strictly increasing.
pub type Generation = u64;

/// Region match returned by a location source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationHit {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Apartment complex match returned by an apartment source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApartmentHit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub households: Option<u32>,
}

/// One entry of the merged list shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum UnifiedResult {
    Location(LocationHit),
    Apartment(ApartmentHit),
}

impl UnifiedResult {
    pub fn kind(&self) -> &'static str {
        match self {
            UnifiedResult::Location(_) => "location",
            UnifiedResult::Apartment(_) => "apartment",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            UnifiedResult::Location(hit) => hit.full_name.as_deref().unwrap_or(&hit.name),
            UnifiedResult::Apartment(hit) => &hit.name,
        }
    }
}

/// Ordered results from one source for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBatch {
    pub source: String,
    pub generation: Generation,
    pub results: Vec<UnifiedResult>,
}

impl SourceBatch {
    pub fn empty(source: impl Into<String>, generation: Generation) -> Self {
        Self {
            source: source.into(),
            generation,
            results: Vec::new(),
        }
    }
}
