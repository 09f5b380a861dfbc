// Copyright (c) 2026 Tally Contributors. MIT License.
// See LICENSE for details.

//! # Tally Protocol: Shared Primitives
//!
//! Everything the election contracts need from the world around them, and
//! nothing more:
//!
//! - **address**: caller identities and derived contract accounts.
//! - **amount**: base-unit arithmetic and decimal parsing.
//! - **clock**: the clock oracle. Read once per operation, never scheduled.
//! - **ledger**: atomic native-currency transfers.
//! - **config**: currency parameters and election defaults.

pub mod address;
pub mod amount;
pub mod clock;
pub mod config;
pub mod ledger;

pub use address::{Identity, IdentityError};
pub use amount::{format_amount, parse_amount, Amount, AmountParseError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{InMemoryLedger, Ledger, TransferError};
