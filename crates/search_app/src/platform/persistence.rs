use std::path::PathBuf;

use search_engine::StateFiles;
use search_logging::{search_error, search_info, search_warn};
use serde::{Deserialize, Serialize};

const HISTORY_FILENAME: &str = ".search_history.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedHistory {
    recent: Vec<String>,
}

/// Recent queries kept between runs.
pub(crate) struct HistoryStore {
    files: StateFiles,
}

impl HistoryStore {
    pub(crate) fn new(state_dir: PathBuf) -> Self {
        Self {
            files: StateFiles::new(state_dir),
        }
    }

    pub(crate) fn load(&self) -> Vec<String> {
        let content = match self.files.read(HISTORY_FILENAME) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(err) => {
                search_warn!(
                    "Failed to read search history from {:?}: {}",
                    self.files.dir(),
                    err
                );
                return Vec::new();
            }
        };

        match ron::from_str::<PersistedHistory>(&content) {
            Ok(history) => {
                search_info!(
                    "Loaded {} recent queries from {:?}",
                    history.recent.len(),
                    self.files.dir()
                );
                history.recent
            }
            Err(err) => {
                search_warn!("Failed to parse search history: {}", err);
                Vec::new()
            }
        }
    }

    pub(crate) fn save(&self, recent: &[String]) {
        let history = PersistedHistory {
            recent: recent.to_vec(),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&history, pretty) {
            Ok(text) => text,
            Err(err) => {
                search_error!("Failed to serialize search history: {}", err);
                return;
            }
        };

        if let Err(err) = self.files.write(HISTORY_FILENAME, &content) {
            search_error!(
                "Failed to write search history to {:?}: {}",
                self.files.dir(),
                err
            );
        }
    }
}
