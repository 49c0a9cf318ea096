//! RON configuration for the terminal driver.
//!
//! A missing file is not an error: the built-in defaults describe the two
//! listing API endpoints on `localhost:8080`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use search_core::{SearchConfig, SourceSpec, DEFAULT_RECENT_LIMIT};
use search_engine::{
    CachedSource, DispatchSettings, Dispatcher, EnvToken, FetchError, HitKind, HttpSource,
    HttpSourceSettings, NoToken, SearchSource, TokenProvider,
};
use search_logging::search_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("source {name}: {source}")]
    Source { name: String, source: FetchError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub debounce_ms: u64,
    pub source_timeout_ms: Option<u64>,
    pub save_history: bool,
    pub recent_limit: usize,
    /// Environment variable holding the bearer token; `None` searches anonymously.
    pub token_env: Option<String>,
    pub state_dir: PathBuf,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: HitKind,
    pub endpoint: String,
    #[serde(default = "default_query_param")]
    pub query_param: String,
    #[serde(default)]
    pub min_query_len: usize,
    #[serde(default)]
    pub result_limit: Option<usize>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub records_history: bool,
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
}

fn default_query_param() -> String {
    "q".to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            source_timeout_ms: Some(5_000),
            save_history: false,
            recent_limit: DEFAULT_RECENT_LIMIT,
            token_env: Some("SEARCH_AUTH_TOKEN".to_string()),
            state_dir: PathBuf::from(".search_state"),
            sources: vec![
                SourceConfig {
                    name: "locations".to_string(),
                    kind: HitKind::Location,
                    endpoint: "http://localhost:8080/api/regions/search".to_string(),
                    query_param: default_query_param(),
                    min_query_len: 1,
                    result_limit: Some(2),
                    priority: 0,
                    enabled: true,
                    records_history: false,
                    cache_ttl_secs: Some(300),
                },
                SourceConfig {
                    name: "apartments".to_string(),
                    kind: HitKind::Apartment,
                    endpoint: "http://localhost:8080/api/apartments/search".to_string(),
                    query_param: default_query_param(),
                    min_query_len: 2,
                    result_limit: None,
                    priority: 1,
                    enabled: true,
                    records_history: true,
                    cache_ttl_secs: None,
                },
            ],
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                search_info!("No config at {:?}; using built-in defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        search_info!(
            "Loaded config from {:?} with {} sources",
            path,
            config.sources.len()
        );
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid("debounce_ms must be positive".into()));
        }
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("at least one source is required".into()));
        }
        let mut names = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Invalid("source name must not be empty".into()));
            }
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source name {}",
                    source.name
                )));
            }
        }
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        let sources = self
            .sources
            .iter()
            .map(|source| SourceSpec {
                name: source.name.clone(),
                min_query_len: source.min_query_len,
                result_limit: source.result_limit,
                priority: source.priority,
                enabled: source.enabled,
                records_history: source.records_history,
            })
            .collect();
        SearchConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            sources,
            save_history: self.save_history,
            recent_limit: self.recent_limit,
        }
    }

    pub fn build_dispatcher(&self) -> Result<Dispatcher, ConfigError> {
        let mut sources: Vec<Arc<dyn SearchSource>> = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let mut settings =
                HttpSourceSettings::new(&source.name, &source.endpoint, source.kind);
            settings.query_param = source.query_param.clone();
            settings.records_history = source.records_history;

            let http = HttpSource::new(settings).map_err(|err| ConfigError::Source {
                name: source.name.clone(),
                source: err,
            })?;
            match source.cache_ttl_secs {
                Some(ttl) if ttl > 0 => sources.push(Arc::new(CachedSource::new(
                    http,
                    Duration::from_secs(ttl),
                ))),
                _ => sources.push(Arc::new(http)),
            }
        }

        let tokens: Arc<dyn TokenProvider> = match &self.token_env {
            Some(var) => Arc::new(EnvToken::new(var)),
            None => Arc::new(NoToken),
        };
        let settings = DispatchSettings {
            source_timeout: self.source_timeout_ms.map(Duration::from_millis),
        };
        Ok(Dispatcher::new(sources, tokens, settings))
    }
}
