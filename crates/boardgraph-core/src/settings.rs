use crate::{ExplorationMode, NodeId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Companies visible on start-up and after every reset.
    pub seed_companies: Vec<NodeId>,
    pub suggestion_limit: usize,
    pub suggestion_debounce_ms: u64,
    /// Auto-clear delay for transient notices.
    pub notice_duration_ms: u64,
    /// Consistency warnings shown before the "...and N more" line.
    pub warning_display_limit: usize,
    pub focus_scale: f32,
    pub focus_animation_ms: u64,
    pub initial_mode: ExplorationMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seed_companies: vec![
                NodeId::from("Singtel"),
                NodeId::from("UOL"),
                NodeId::from("Seatrium"),
            ],
            suggestion_limit: 10,
            suggestion_debounce_ms: 150,
            notice_duration_ms: 2500,
            warning_display_limit: 5,
            focus_scale: 1.5,
            focus_animation_ms: 1000,
            initial_mode: ExplorationMode::Visual,
        }
    }
}

impl EngineSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, crate::DatasetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| crate::DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    pub fn focus_animation(&self) -> Duration {
        Duration::from_millis(self.focus_animation_ms)
    }
}
