//! Best score tracking
//!
//! A single integer persisted under a fixed key; the max over all finished runs.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Best score across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub value: u64,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "driving_best";

    pub fn new(value: u64) -> Self {
        Self { value }
    }

    /// Record a finished run's score. Returns true if it beat the best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    /// Load from storage; missing or unreadable values count as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<u64>(text.trim()) {
                Ok(value) => {
                    log::info!("Loaded best score {}", value);
                    Self { value }
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable best score {:?}: {}", text, e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read best score: {}", e);
                Self::default()
            }
        }
    }

    /// Write to storage as a plain decimal integer
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(&self.value) {
            Ok(text) => match store.set(Self::STORAGE_KEY, &text) {
                Ok(()) => log::info!("Best score saved ({})", self.value),
                Err(e) => log::warn!("Could not save best score: {}", e),
            },
            Err(e) => log::warn!("Could not encode best score: {}", e),
        }
    }
}
