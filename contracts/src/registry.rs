//! # Election Registry
//!
//! The factory side of the system. Anyone can ask the registry for a new
//! election; the caller becomes that election's owner, independently of
//! whoever deployed the registry itself. Elections live in an append-only
//! arena and are addressed by their index ([`ElectionId`]), so creation order
//! is enumeration order and handles never dangle.
//!
//! Each election also receives its own ledger account, derived from the
//! creator and the registry's deployment nonce (see
//! [`Identity::derive_contract`]).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tally_protocol::Identity;
use thiserror::Error;
use tracing::info;

use crate::access::Ownable;
use crate::election::{Election, ElectionError, ElectionId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No election exists under this handle.
    #[error("election not found: {0}")]
    ElectionNotFound(ElectionId),

    /// An operation on an election failed.
    #[error(transparent)]
    Election(#[from] ElectionError),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of the registry's enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Registry handle.
    pub id: ElectionId,
    /// The election's escrow account.
    pub account: Identity,
    /// Who created (and therefore owns) the election.
    pub creator: Identity,
}

/// The election factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionRegistry {
    /// Identity that deployed the registry. Has no special rights over the
    /// elections it hosts.
    deployer: Identity,
    /// Incremented on every creation; feeds account derivation.
    nonce: u64,
    elections: Vec<Election>,
}

impl ElectionRegistry {
    /// Creates an empty registry deployed by `deployer`.
    pub fn new(deployer: Identity) -> Self {
        Self {
            deployer,
            nonce: 0,
            elections: Vec::new(),
        }
    }

    /// Creates a new election owned by `caller` and returns its handle.
    /// Always succeeds.
    pub fn create_voting(&mut self, caller: &Identity) -> ElectionId {
        let id = ElectionId(self.elections.len() as u64);
        let account = Identity::derive_contract(caller, self.nonce);
        self.nonce += 1;

        info!(election = %id, owner = %caller, %account, "election created");
        self.elections
            .push(Election::new(id, account, caller.clone(), Utc::now()));
        id
    }

    /// All handles in creation order.
    pub fn deployed_votings(&self) -> Vec<ElectionId> {
        self.elections.iter().map(Election::id).collect()
    }

    /// All elections with their accounts and creators, in creation order.
    pub fn deployments(&self) -> Vec<Deployment> {
        self.elections
            .iter()
            .map(|e| Deployment {
                id: e.id(),
                account: e.account().clone(),
                creator: e.owner().clone(),
            })
            .collect()
    }

    /// The most recently created election, if any.
    pub fn latest(&self) -> Option<ElectionId> {
        self.elections.last().map(Election::id)
    }

    /// Handles of every election owned by `identity`.
    pub fn elections_owned_by(&self, identity: &Identity) -> Vec<ElectionId> {
        self.elections
            .iter()
            .filter(|e| e.is_owner(identity))
            .map(Election::id)
            .collect()
    }

    /// # Errors
    ///
    /// [`RegistryError::ElectionNotFound`] for unknown handles.
    pub fn election(&self, id: ElectionId) -> Result<&Election, RegistryError> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.elections.get(i))
            .ok_or(RegistryError::ElectionNotFound(id))
    }

    /// # Errors
    ///
    /// [`RegistryError::ElectionNotFound`] for unknown handles.
    pub fn election_mut(&mut self, id: ElectionId) -> Result<&mut Election, RegistryError> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.elections.get_mut(i))
            .ok_or(RegistryError::ElectionNotFound(id))
    }

    /// Finds the election whose escrow lives at `account`.
    pub fn by_account(&self, account: &Identity) -> Option<&Election> {
        self.elections.iter().find(|e| e.account() == account)
    }

    pub fn deployer(&self) -> &Identity {
        &self.deployer
    }

    pub fn len(&self) -> usize {
        self.elections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Election> {
        self.elections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn handles_follow_creation_order() {
        let mut registry = ElectionRegistry::new(id("deployer"));
        let a = registry.create_voting(&id("alice"));
        let b = registry.create_voting(&id("bob"));
        assert_eq!(registry.deployed_votings(), vec![a, b]);
        assert_eq!((a, b), (ElectionId(0), ElectionId(1)));
        assert_eq!(registry.latest(), Some(b));
    }

    #[test]
    fn accounts_are_unique_per_election() {
        let mut registry = ElectionRegistry::new(id("deployer"));
        let a = registry.create_voting(&id("alice"));
        let b = registry.create_voting(&id("alice"));
        let acc_a = registry.election(a).unwrap().account().clone();
        let acc_b = registry.election(b).unwrap().account().clone();
        assert_ne!(acc_a, acc_b);
        assert_eq!(registry.by_account(&acc_b).unwrap().id(), b);
    }

    #[test]
    fn unknown_handle_is_reported() {
        let mut registry = ElectionRegistry::new(id("deployer"));
        assert_eq!(
            registry.election(ElectionId(3)).unwrap_err(),
            RegistryError::ElectionNotFound(ElectionId(3))
        );
        assert!(registry.election_mut(ElectionId(0)).is_err());
        assert!(registry.is_empty());
    }
}
