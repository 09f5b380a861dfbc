//! # Election Contract
//!
//! One election with escrow. Voters pay a fixed contribution per vote; the
//! election custodies every contribution in its own ledger account and
//! splits each one into a commission share (`fee_box`) and a prize share
//! (`prize_box`). The lifecycle is:
//!
//! 1. **Created**: the owner registers candidates and tunes the
//!    contribution, commission, and voting window.
//! 2. **Open**: anyone who is not a candidate may vote once, paying exactly
//!    the contribution, until `end_time`.
//! 3. **Closed**: anyone may close once `end_time` has passed. The prize
//!    pool is then released to the leading candidate.
//!
//! The owner may withdraw from `fee_box` in any phase. Nothing ever draws
//! from `prize_box` except the final release.
//!
//! ## Atomicity
//!
//! Each operation validates everything first (including all arithmetic),
//! then performs its single ledger transfer, and only then commits state.
//! A failed check or a failed transfer leaves the election untouched.
//!
//! ## Winner
//!
//! The winner is the candidate with the most votes. Ties go to the
//! earliest-registered (lowest id) candidate. An election nobody voted in
//! has no winner and nothing to release.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tally_protocol::amount::{share_bps, Amount};
use tally_protocol::config::{
    BPS_DENOMINATOR, DEFAULT_COMMISSION_BPS, DEFAULT_CONTRIBUTION, DEFAULT_VOTING_DURATION_SECS,
    MAX_VOTING_DURATION_SECS,
};
use tally_protocol::{Clock, Identity, Ledger, TransferError};
use thiserror::Error;
use tracing::{debug, info};

use crate::access::{NotOwner, Ownable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during election operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ElectionError {
    /// The caller is not the election owner.
    #[error(transparent)]
    NotOwner(#[from] NotOwner),

    /// Configuration is only possible before voting starts.
    #[error("configuration is frozen: election is {phase}")]
    PhaseClosed {
        /// The election's current phase.
        phase: Phase,
    },

    /// `start_voting` was called a second time.
    #[error("voting has already started")]
    AlreadyStarted,

    /// The operation requires an open election.
    #[error("voting is not open: election is {phase}")]
    NotOpen {
        /// The election's current phase.
        phase: Phase,
    },

    /// The operation requires a closed election.
    #[error("election is not closed: election is {phase}")]
    NotClosed {
        /// The election's current phase.
        phase: Phase,
    },

    /// `close_voting` was called on a closed election.
    #[error("voting is already closed")]
    AlreadyClosed,

    /// Voting cannot be closed before the deadline.
    #[error("voting cannot be closed before {end_time}")]
    TooEarly {
        /// When voting ends.
        end_time: DateTime<Utc>,
    },

    /// The deadline has passed; no more votes are accepted.
    #[error("voting ended at {end_time}")]
    VotingEnded {
        /// When voting ended.
        end_time: DateTime<Utc>,
    },

    /// A candidate with this payout address is already registered.
    #[error("candidate {0} is already registered")]
    DuplicateCandidate(Identity),

    /// No candidate has this id.
    #[error("no candidate with id {0}")]
    InvalidCandidateId(CandidateId),

    /// Voting cannot start without candidates.
    #[error("voting cannot start without at least one registered candidate")]
    NoCandidates,

    /// This identity has already voted in this election.
    #[error("{0} has already voted")]
    AlreadyVoted(Identity),

    /// Candidates may not vote.
    #[error("candidate {0} cannot vote")]
    SelfVoteForbidden(Identity),

    /// Custody accounts may neither vote nor receive a prize.
    #[error("contract account {0} cannot take part in an election")]
    ContractAccount(Identity),

    /// The payment was not exactly the contribution amount.
    #[error("wrong contribution: expected exactly {expected}, offered {offered}")]
    WrongContribution {
        /// The configured contribution.
        expected: Amount,
        /// What the voter attached.
        offered: Amount,
    },

    /// Tried to withdraw more commission than has accrued.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the caller tried to withdraw.
        requested: Amount,
        /// Current `fee_box` balance.
        available: Amount,
    },

    /// Start and end times do not exist before launch.
    #[error("voting has not been launched yet")]
    NotYetLaunched,

    /// Nobody has voted, so there is no leader.
    #[error("no votes have been cast yet")]
    NoLeaderYet,

    /// The prize pool was already paid out.
    #[error("prize has already been released")]
    AlreadyReleased,

    /// A configuration value is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An arithmetic overflow would occur.
    #[error("amount overflow: operation would exceed allowed limits")]
    AmountOverflow,

    /// The underlying ledger rejected the transfer.
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl ElectionError {
    /// `true` for errors caused by calling an operation in the wrong phase
    /// or before the deadline.
    pub fn is_phase_error(&self) -> bool {
        matches!(
            self,
            ElectionError::PhaseClosed { .. }
                | ElectionError::AlreadyStarted
                | ElectionError::NotOpen { .. }
                | ElectionError::NotClosed { .. }
                | ElectionError::AlreadyClosed
                | ElectionError::TooEarly { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Sequence number of a candidate within its election, starting at 0.
pub type CandidateId = u64;

/// Handle of an election inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionId(pub u64);

impl fmt::Display for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle stage. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting candidates and configuration.
    Created,
    /// Accepting votes until `end_time`.
    Open,
    /// Final. Settlement only.
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Created => write!(f, "Created"),
            Phase::Open => write!(f, "Open"),
            Phase::Closed => write!(f, "Closed"),
        }
    }
}

/// A registered candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Registration sequence number.
    pub id: CandidateId,
    /// Optional display label.
    pub name: Option<String>,
    /// Receives the prize pool if this candidate wins.
    pub payout_address: Identity,
    /// Accepted votes so far.
    pub vote_count: u64,
}

/// Point-in-time view of an election, suitable for printing or shipping
/// over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    pub id: ElectionId,
    pub account: Identity,
    pub owner: Identity,
    pub phase: Phase,
    pub contribution: Amount,
    pub commission_bps: u32,
    pub voting_duration_secs: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub fee_box: Amount,
    pub prize_box: Amount,
    pub commission_withdrawn: Amount,
    pub prize_released: Amount,
    pub total_contributions: Amount,
    pub number_of_voters: usize,
    pub candidates: Vec<Candidate>,
    /// Current leader, if anyone has voted.
    pub leader: Option<CandidateId>,
    /// Recorded once the prize has been released.
    pub winner: Option<CandidateId>,
}

/// A single election instance.
///
/// Fields are private: every mutation goes through an operation that
/// enforces the phase, ownership, and conservation invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    id: ElectionId,
    /// Ledger account holding this election's escrow.
    account: Identity,
    owner: Identity,
    created_at: DateTime<Utc>,
    phase: Phase,
    contribution: Amount,
    commission_bps: u32,
    voting_duration_secs: u64,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    fee_box: Amount,
    prize_box: Amount,
    commission_withdrawn: Amount,
    prize_released: Amount,
    total_contributions: Amount,
    candidates: Vec<Candidate>,
    voters: BTreeSet<Identity>,
    winner: Option<CandidateId>,
}

impl Ownable for Election {
    fn owner(&self) -> &Identity {
        &self.owner
    }
}

impl Election {
    /// Creates an election in `Created` phase with default economics.
    ///
    /// # Arguments
    ///
    /// * `id` - Registry handle.
    /// * `account` - Ledger account that will hold the escrow.
    /// * `owner` - The only identity allowed to configure, launch, and
    ///   withdraw commission.
    /// * `created_at` - Creation timestamp, informational only.
    pub fn new(
        id: ElectionId,
        account: Identity,
        owner: Identity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account,
            owner,
            created_at,
            phase: Phase::Created,
            contribution: DEFAULT_CONTRIBUTION,
            commission_bps: DEFAULT_COMMISSION_BPS,
            voting_duration_secs: DEFAULT_VOTING_DURATION_SECS,
            start_time: None,
            end_time: None,
            fee_box: 0,
            prize_box: 0,
            commission_withdrawn: 0,
            prize_released: 0,
            total_contributions: 0,
            candidates: Vec::new(),
            voters: BTreeSet::new(),
            winner: None,
        }
    }

    // -- Configuration ------------------------------------------------------

    /// Registers a candidate and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ElectionError::NotOwner`] if `caller` is not the owner.
    /// Returns [`ElectionError::PhaseClosed`] once voting has started.
    /// Returns [`ElectionError::ContractAccount`] if the payout address is a
    /// custody account.
    /// Returns [`ElectionError::DuplicateCandidate`] if the payout address
    /// is already registered.
    pub fn register_candidate(
        &mut self,
        caller: &Identity,
        name: Option<String>,
        payout_address: Identity,
    ) -> Result<CandidateId, ElectionError> {
        self.ensure_owner(caller)?;
        self.ensure_configurable()?;

        if payout_address.is_contract() {
            return Err(ElectionError::ContractAccount(payout_address));
        }
        if self.is_candidate(&payout_address) {
            return Err(ElectionError::DuplicateCandidate(payout_address));
        }

        let id = self.next_candidate_id();
        info!(election = %self.id, candidate = id, payout = %payout_address, "candidate registered");
        self.candidates.push(Candidate {
            id,
            name,
            payout_address,
            vote_count: 0,
        });
        Ok(id)
    }

    /// Sets the exact payment required per vote.
    ///
    /// # Errors
    ///
    /// `NotOwner`, `PhaseClosed`, or `InvalidParameter` for a zero amount.
    pub fn set_contribution(&mut self, caller: &Identity, value: Amount) -> Result<(), ElectionError> {
        self.ensure_owner(caller)?;
        self.ensure_configurable()?;
        if value == 0 {
            return Err(ElectionError::InvalidParameter(
                "contribution must be positive".into(),
            ));
        }
        self.contribution = value;
        Ok(())
    }

    /// Sets the operator commission in basis points (`1_000` = 10%).
    ///
    /// # Errors
    ///
    /// `NotOwner`, `PhaseClosed`, or `InvalidParameter` above 10 000 bps.
    pub fn set_commission(&mut self, caller: &Identity, bps: u32) -> Result<(), ElectionError> {
        self.ensure_owner(caller)?;
        self.ensure_configurable()?;
        if bps > BPS_DENOMINATOR {
            return Err(ElectionError::InvalidParameter(format!(
                "commission {bps} bps exceeds {BPS_DENOMINATOR} bps"
            )));
        }
        self.commission_bps = bps;
        Ok(())
    }

    /// Sets how long voting stays open after launch.
    ///
    /// # Errors
    ///
    /// `NotOwner`, `PhaseClosed`, or `InvalidParameter` for zero or for more
    /// than [`MAX_VOTING_DURATION_SECS`].
    pub fn set_voting_duration(&mut self, caller: &Identity, secs: u64) -> Result<(), ElectionError> {
        self.ensure_owner(caller)?;
        self.ensure_configurable()?;
        if secs == 0 || secs > MAX_VOTING_DURATION_SECS {
            return Err(ElectionError::InvalidParameter(format!(
                "voting duration must be within 1..={MAX_VOTING_DURATION_SECS} seconds, got {secs}"
            )));
        }
        self.voting_duration_secs = secs;
        Ok(())
    }

    /// Opens voting now, for the configured duration.
    ///
    /// # Errors
    ///
    /// `NotOwner`, `AlreadyStarted` outside `Created`, `NoCandidates` when
    /// the candidate list is empty.
    pub fn start_voting(&mut self, caller: &Identity, clock: &dyn Clock) -> Result<(), ElectionError> {
        self.ensure_owner(caller)?;
        if self.phase != Phase::Created {
            return Err(ElectionError::AlreadyStarted);
        }
        if self.candidates.is_empty() {
            return Err(ElectionError::NoCandidates);
        }

        let now = clock.now();
        // Bounded by MAX_VOTING_DURATION_SECS, so the cast is lossless.
        let window = Duration::seconds(self.voting_duration_secs as i64);
        let end = now
            .checked_add_signed(window)
            .ok_or_else(|| ElectionError::InvalidParameter("end time out of range".into()))?;

        self.phase = Phase::Open;
        self.start_time = Some(now);
        self.end_time = Some(end);
        info!(election = %self.id, start = %now, end = %end, "voting started");
        Ok(())
    }

    // -- Voting -------------------------------------------------------------

    /// Casts `caller`'s vote for `candidate_id`, paying `payment` from the
    /// caller's ledger account into the election's escrow.
    ///
    /// # Errors
    ///
    /// Checked in this order: `NotOpen`, `AlreadyVoted`,
    /// `SelfVoteForbidden`, `ContractAccount`, `InvalidCandidateId`,
    /// `WrongContribution`, `VotingEnded`. Then `AmountOverflow` if a box would overflow and
    /// `Transfer` if the caller cannot pay. On any error no funds move.
    pub fn vote(
        &mut self,
        caller: &Identity,
        candidate_id: CandidateId,
        payment: Amount,
        clock: &dyn Clock,
        ledger: &mut dyn Ledger,
    ) -> Result<(), ElectionError> {
        if self.phase != Phase::Open {
            return Err(ElectionError::NotOpen { phase: self.phase });
        }
        if self.voters.contains(caller) {
            return Err(ElectionError::AlreadyVoted(caller.clone()));
        }
        if self.is_candidate(caller) {
            return Err(ElectionError::SelfVoteForbidden(caller.clone()));
        }
        if caller.is_contract() {
            return Err(ElectionError::ContractAccount(caller.clone()));
        }
        let index = self.candidate_index(candidate_id)?;
        if payment != self.contribution {
            return Err(ElectionError::WrongContribution {
                expected: self.contribution,
                offered: payment,
            });
        }
        let end_time = self.end_time.ok_or(ElectionError::NotYetLaunched)?;
        if clock.now() >= end_time {
            return Err(ElectionError::VotingEnded { end_time });
        }

        let fee = share_bps(payment, self.commission_bps).ok_or(ElectionError::AmountOverflow)?;
        let prize = payment - fee;
        let fee_box = self
            .fee_box
            .checked_add(fee)
            .ok_or(ElectionError::AmountOverflow)?;
        let prize_box = self
            .prize_box
            .checked_add(prize)
            .ok_or(ElectionError::AmountOverflow)?;
        let total = self
            .total_contributions
            .checked_add(payment)
            .ok_or(ElectionError::AmountOverflow)?;
        let votes = self.candidates[index]
            .vote_count
            .checked_add(1)
            .ok_or(ElectionError::AmountOverflow)?;

        ledger.transfer(caller, &self.account, payment)?;

        self.voters.insert(caller.clone());
        self.candidates[index].vote_count = votes;
        self.fee_box = fee_box;
        self.prize_box = prize_box;
        self.total_contributions = total;

        debug!(election = %self.id, voter = %caller, candidate = candidate_id, fee, prize, "vote accepted");
        Ok(())
    }

    /// The candidate currently in the lead. Ties go to the lowest id.
    ///
    /// Informational while voting is open; authoritative once closed.
    ///
    /// # Errors
    ///
    /// Returns [`ElectionError::NoLeaderYet`] if no votes have been cast.
    pub fn winner_till_now(&self) -> Result<CandidateId, ElectionError> {
        if self.voters.is_empty() {
            return Err(ElectionError::NoLeaderYet);
        }
        // `max_by_key` keeps the last maximum, so compare on reversed id to
        // prefer the earliest registration.
        self.candidates
            .iter()
            .max_by_key(|c| (c.vote_count, std::cmp::Reverse(c.id)))
            .map(|c| c.id)
            .ok_or(ElectionError::NoLeaderYet)
    }

    // -- Closing and settlement ---------------------------------------------

    /// Closes voting. Anyone may call this once the deadline has passed.
    ///
    /// # Errors
    ///
    /// `NotOpen` before launch, `AlreadyClosed` after close, `TooEarly`
    /// while `now < end_time`.
    pub fn close_voting(&mut self, caller: &Identity, clock: &dyn Clock) -> Result<(), ElectionError> {
        match self.phase {
            Phase::Created => return Err(ElectionError::NotOpen { phase: self.phase }),
            Phase::Closed => return Err(ElectionError::AlreadyClosed),
            Phase::Open => {}
        }
        let end_time = self.end_time.ok_or(ElectionError::NotYetLaunched)?;
        if clock.now() < end_time {
            return Err(ElectionError::TooEarly { end_time });
        }

        self.phase = Phase::Closed;
        info!(election = %self.id, closed_by = %caller, voters = self.voters.len(), "voting closed");
        Ok(())
    }

    /// Withdraws `amount` of accrued commission to the owner.
    ///
    /// Allowed in every phase; only ever draws from `fee_box`.
    ///
    /// # Errors
    ///
    /// `NotOwner`, `InsufficientFunds` if `amount > fee_box`, or `Transfer`
    /// if the ledger refuses.
    pub fn take_commission(
        &mut self,
        caller: &Identity,
        amount: Amount,
        ledger: &mut dyn Ledger,
    ) -> Result<(), ElectionError> {
        self.ensure_owner(caller)?;
        if amount > self.fee_box {
            return Err(ElectionError::InsufficientFunds {
                requested: amount,
                available: self.fee_box,
            });
        }
        let withdrawn = self
            .commission_withdrawn
            .checked_add(amount)
            .ok_or(ElectionError::AmountOverflow)?;

        ledger.transfer(&self.account, &self.owner, amount)?;

        self.fee_box -= amount;
        self.commission_withdrawn = withdrawn;
        info!(election = %self.id, amount, remaining = self.fee_box, "commission withdrawn");
        Ok(())
    }

    /// Pays the whole prize pool to the winner and returns the winner's
    /// payout identity. Anyone may trigger it once voting is closed.
    ///
    /// # Errors
    ///
    /// `NotClosed` before close, `AlreadyReleased` on a second call,
    /// `NoLeaderYet` if nobody voted, or `Transfer` if the ledger refuses.
    pub fn release_prize(
        &mut self,
        caller: &Identity,
        ledger: &mut dyn Ledger,
    ) -> Result<Identity, ElectionError> {
        if self.phase != Phase::Closed {
            return Err(ElectionError::NotClosed { phase: self.phase });
        }
        if self.winner.is_some() {
            return Err(ElectionError::AlreadyReleased);
        }
        let winner_id = self.winner_till_now()?;
        let index = self.candidate_index(winner_id)?;
        let payout = self.candidates[index].payout_address.clone();
        let amount = self.prize_box;
        let released = self
            .prize_released
            .checked_add(amount)
            .ok_or(ElectionError::AmountOverflow)?;

        ledger.transfer(&self.account, &payout, amount)?;

        self.prize_box = 0;
        self.prize_released = released;
        self.winner = Some(winner_id);
        info!(
            election = %self.id,
            triggered_by = %caller,
            winner = winner_id,
            %payout,
            amount,
            "prize released"
        );
        Ok(payout)
    }

    // -- Reads --------------------------------------------------------------

    pub fn id(&self) -> ElectionId {
        self.id
    }

    /// Ledger account holding the escrow.
    pub fn account(&self) -> &Identity {
        &self.account
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `true` between launch and close. Past `end_time` an unclosed
    /// election still reports open but rejects votes.
    pub fn is_voting_open(&self) -> bool {
        self.phase == Phase::Open
    }

    pub fn contribution(&self) -> Amount {
        self.contribution
    }

    pub fn commission_bps(&self) -> u32 {
        self.commission_bps
    }

    pub fn voting_duration_secs(&self) -> u64 {
        self.voting_duration_secs
    }

    /// # Errors
    ///
    /// [`ElectionError::NotYetLaunched`] before `start_voting`.
    pub fn start_time(&self) -> Result<DateTime<Utc>, ElectionError> {
        self.start_time.ok_or(ElectionError::NotYetLaunched)
    }

    /// # Errors
    ///
    /// [`ElectionError::NotYetLaunched`] before `start_voting`.
    pub fn end_time(&self) -> Result<DateTime<Utc>, ElectionError> {
        self.end_time.ok_or(ElectionError::NotYetLaunched)
    }

    pub fn fee_box(&self) -> Amount {
        self.fee_box
    }

    pub fn prize_box(&self) -> Amount {
        self.prize_box
    }

    pub fn commission_withdrawn(&self) -> Amount {
        self.commission_withdrawn
    }

    pub fn prize_released(&self) -> Amount {
        self.prize_released
    }

    /// Sum of every accepted contribution.
    pub fn total_contributions(&self) -> Amount {
        self.total_contributions
    }

    /// Funds still held in escrow: `fee_box + prize_box`.
    pub fn escrowed(&self) -> u128 {
        self.fee_box as u128 + self.prize_box as u128
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn candidate_by_address(&self, payout_address: &Identity) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|c| &c.payout_address == payout_address)
    }

    pub fn is_candidate(&self, identity: &Identity) -> bool {
        self.candidate_by_address(identity).is_some()
    }

    /// # Errors
    ///
    /// [`ElectionError::InvalidCandidateId`] for unknown ids.
    pub fn votes_for(&self, id: CandidateId) -> Result<u64, ElectionError> {
        self.candidate(id)
            .map(|c| c.vote_count)
            .ok_or(ElectionError::InvalidCandidateId(id))
    }

    /// The id the next registered candidate will receive.
    pub fn next_candidate_id(&self) -> CandidateId {
        self.candidates.len() as CandidateId
    }

    pub fn number_of_voters(&self) -> usize {
        self.voters.len()
    }

    pub fn has_voted(&self, identity: &Identity) -> bool {
        self.voters.contains(identity)
    }

    /// The released winner, once `release_prize` has succeeded.
    pub fn winner(&self) -> Option<CandidateId> {
        self.winner
    }

    pub fn summary(&self) -> ElectionSummary {
        ElectionSummary {
            id: self.id,
            account: self.account.clone(),
            owner: self.owner.clone(),
            phase: self.phase,
            contribution: self.contribution,
            commission_bps: self.commission_bps,
            voting_duration_secs: self.voting_duration_secs,
            start_time: self.start_time,
            end_time: self.end_time,
            fee_box: self.fee_box,
            prize_box: self.prize_box,
            commission_withdrawn: self.commission_withdrawn,
            prize_released: self.prize_released,
            total_contributions: self.total_contributions,
            number_of_voters: self.voters.len(),
            candidates: self.candidates.clone(),
            leader: self.winner_till_now().ok(),
            winner: self.winner,
        }
    }

    // -- Internals ----------------------------------------------------------

    fn ensure_configurable(&self) -> Result<(), ElectionError> {
        if self.phase != Phase::Created {
            return Err(ElectionError::PhaseClosed { phase: self.phase });
        }
        Ok(())
    }

    // Ids are dense and start at 0, so the id is the index.
    fn candidate_index(&self, id: CandidateId) -> Result<usize, ElectionError> {
        usize::try_from(id)
            .ok()
            .filter(|&i| i < self.candidates.len())
            .ok_or(ElectionError::InvalidCandidateId(id))
    }
}
