//! Local policy state
//!
//! Keeps the identifier, last observed policy and freshness token of the
//! managed policy between runs, so the next read can be conditional and
//! `plan` can show drift against what was last applied.
//!
//! The reconciler never touches this file; commands load it before calling
//! into the core and save what the core hands back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StateConfig;
use crate::error::StateError;
use crate::policy::{ObservedPolicy, PolicyId};

/// State file name
const STATE_FILE_NAME: &str = "state.json";

/// What is remembered about the managed policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyState {
    /// Identifier of the managed policy
    pub id: PolicyId,

    /// Last observed policy, including its freshness token
    pub observed: ObservedPolicy,

    /// When the observation was made
    pub refreshed_at: DateTime<Utc>,
}

impl PolicyState {
    /// Record an observation made now
    pub fn new(id: PolicyId, observed: ObservedPolicy) -> Self {
        Self {
            id,
            observed,
            refreshed_at: Utc::now(),
        }
    }
}

/// Reads and writes the state file
#[derive(Debug, Clone)]
pub struct StateStore {
    state_dir: PathBuf,
}

impl StateStore {
    /// Create a store for the given project root and configuration
    pub fn new(project_root: &Path, config: &StateConfig) -> Self {
        Self {
            state_dir: Self::resolve_state_dir(project_root, &config.directory),
        }
    }

    /// Resolve the state directory path
    fn resolve_state_dir(project_root: &Path, directory: &str) -> PathBuf {
        let path = Path::new(directory);

        if path.is_absolute() {
            path.to_path_buf()
        } else if directory.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                home.join(directory.trim_start_matches('~').trim_start_matches('/'))
            } else {
                project_root.join(directory)
            }
        } else {
            project_root.join(directory)
        }
    }

    /// Path of the state file
    pub fn path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE_NAME)
    }

    /// Load the stored state. Missing or unreadable files count as no state.
    pub fn load(&self) -> Option<PolicyState> {
        let state_file = self.path();

        if !state_file.exists() {
            tracing::debug!("No state file found at {}", state_file.display());
            return None;
        }

        match fs::read_to_string(&state_file) {
            Ok(content) => match serde_json::from_str::<PolicyState>(&content) {
                Ok(state) => {
                    tracing::debug!(
                        "Loaded state for {} from {}",
                        state.id,
                        state_file.display()
                    );
                    Some(state)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse state file: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read state file: {}", e);
                None
            }
        }
    }

    /// Load the stored state only if it belongs to `org`
    pub fn load_for(&self, org: &str) -> Option<PolicyState> {
        self.load().filter(|state| {
            let matches = state.id.organization() == org;
            if !matches {
                tracing::debug!(
                    "Ignoring state for {} while managing {}",
                    state.id.organization(),
                    org
                );
            }
            matches
        })
    }

    /// Save state to disk
    pub fn save(&self, state: &PolicyState) -> Result<(), StateError> {
        fs::create_dir_all(&self.state_dir).map_err(|e| StateError::DirectoryCreate {
            path: self.state_dir.display().to_string(),
            source: e,
        })?;

        let state_file = self.path();
        let content = serde_json::to_string_pretty(state)?;

        fs::write(&state_file, content).map_err(|e| StateError::FileWrite {
            path: state_file.display().to_string(),
            source: e,
        })?;

        tracing::debug!("Saved state for {} to {}", state.id, state_file.display());
        Ok(())
    }
}
