//! # Tally Contracts
//!
//! Escrowed elections. Voters pay a fixed contribution to vote, the
//! election holds every contribution, and once voting closes the prize pool
//! goes to the winning candidate while a commission stays with the
//! election's owner.
//!
//! - **Election**: one election's lifecycle: candidates, votes, fund
//!   accounting, winner, payouts.
//! - **Registry**: the factory that creates elections and enumerates them.
//! - **Access**: the owner check every privileged operation runs first.
//!
//! ## Design Principles
//!
//! 1. All monetary operations check for overflow. Wrapping arithmetic and
//!    money do not mix.
//! 2. Phases are an enum that only moves forward, never a pile of flags.
//! 3. Validate, transfer, commit. A failed operation leaves no trace.
//! 4. The caller, the clock, and the ledger are explicit parameters. There is
//!    no ambient context to fake in tests.

pub mod access;
pub mod election;
pub mod registry;

pub use access::{NotOwner, Ownable};
pub use election::{
    Candidate, CandidateId, Election, ElectionError, ElectionId, ElectionSummary, Phase,
};
pub use registry::{Deployment, ElectionRegistry, RegistryError};
