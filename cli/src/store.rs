//! # Local State File
//!
//! The CLI has no node to talk to, so it keeps the whole deployment (the
//! election registry plus the ledger that custodies every balance) in one
//! JSON file. Each invocation loads it, applies one operation, and writes it
//! back. Writes go to a sibling temp file first and are renamed into place,
//! so a crash never leaves a half-written state behind.
//!
//! The file also remembers the latest instant any invocation ran at. Time
//! never moves backwards across invocations, even when `--at` pins it.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_contracts::ElectionRegistry;
use tally_protocol::{Identity, InMemoryLedger};

/// Everything a local deployment consists of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    pub registry: ElectionRegistry,
    pub ledger: InMemoryLedger,
    /// Latest instant seen by any invocation.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl LocalState {
    /// A fresh deployment whose registry was deployed by `deployer`.
    pub fn genesis(deployer: Identity) -> Self {
        Self {
            registry: ElectionRegistry::new(deployer),
            ledger: InMemoryLedger::new(),
            last_seen: None,
        }
    }

    /// Records `now` as the current instant.
    ///
    /// # Errors
    ///
    /// Fails if `now` is earlier than an instant already seen.
    pub fn observe(&mut self, now: DateTime<Utc>) -> Result<()> {
        if let Some(last) = self.last_seen {
            if now < last {
                bail!(
                    "clock moved backwards: {} is before {}",
                    now.to_rfc3339(),
                    last.to_rfc3339()
                );
            }
        }
        self.last_seen = Some(now);
        Ok(())
    }

    /// Loads the state at `path`, or starts a fresh deployment if the file
    /// does not exist yet.
    pub fn load_or_genesis(path: &Path, deployer: Identity) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), deployer = %deployer, "no state file, starting fresh deployment");
            return Ok(Self::genesis(deployer));
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read state file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse state file {}", path.display()))
    }

    /// Persists the state to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize state")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("failed to write state file {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("failed to move state file into {}", path.display()))?;
        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_protocol::Ledger;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn missing_file_yields_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = LocalState::load_or_genesis(&path, id("alice")).unwrap();
        assert!(state.registry.is_empty());
        assert_eq!(state.registry.deployer(), &id("alice"));
    }

    #[test]
    fn save_then_load_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = LocalState::genesis(id("alice"));
        state.registry.create_voting(&id("alice"));
        state.ledger.deposit(&id("bob"), 500).unwrap();
        state.save(&path).unwrap();

        let loaded = LocalState::load_or_genesis(&path, id("someone-else")).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.ledger.balance_of(&id("bob")), 500);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn observed_time_never_goes_backwards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let t0 = "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();

        let mut state = LocalState::genesis(id("alice"));
        state.observe(t0).unwrap();
        state.save(&path).unwrap();

        let mut loaded = LocalState::load_or_genesis(&path, id("alice")).unwrap();
        assert_eq!(loaded.last_seen, Some(t0));
        let earlier = t0 - chrono::Duration::seconds(1);
        let err = loaded.observe(earlier).unwrap_err();
        assert!(err.to_string().contains("clock moved backwards"));
        assert_eq!(loaded.last_seen, Some(t0));

        loaded.observe(t0).unwrap();
        loaded.observe(t0 + chrono::Duration::seconds(5)).unwrap();
    }

    #[test]
    fn state_without_last_seen_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = LocalState::genesis(id("alice"));
        state.observe(Utc::now()).unwrap();
        let mut json: serde_json::Value = serde_json::to_value(&state).unwrap();
        json.as_object_mut().unwrap().remove("last_seen");
        fs::write(&path, json.to_string()).unwrap();

        let loaded = LocalState::load_or_genesis(&path, id("alice")).unwrap();
        assert_eq!(loaded.last_seen, None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        let err = LocalState::load_or_genesis(&path, id("alice")).unwrap_err();
        assert!(err.to_string().contains("failed to parse state file"));
    }
}
