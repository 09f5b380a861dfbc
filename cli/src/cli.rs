//! # CLI Interface
//!
//! Defines the command-line argument structure for `tally` using `clap`
//! derive. Every subcommand forwards its arguments to one public operation
//! of an election or the registry; the binary adds no rules of its own.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Operator tool for escrowed elections.
///
/// Keeps a local deployment (registry + ledger) in a JSON state file and
/// applies one operation per invocation, as the identity given by
/// `--caller`.
#[derive(Parser, Debug)]
#[command(
    name = "tally",
    about = "Operator tool for escrowed elections",
    version,
    propagate_version = true
)]
pub struct TallyCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to the JSON state file. Created on the first mutating command.
    #[arg(
        long,
        short = 's',
        env = "TALLY_STATE",
        default_value = "tally-state.json",
        global = true
    )]
    pub state: PathBuf,

    /// Identity performing the operation.
    #[arg(long, short = 'c', env = "TALLY_CALLER", global = true)]
    pub caller: Option<String>,

    /// Evaluate deadlines at this RFC 3339 instant instead of the wall clock.
    #[arg(long, env = "TALLY_NOW", global = true)]
    pub at: Option<DateTime<Utc>>,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "TALLY_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new election owned by the caller.
    AddVoting,
    /// Register a candidate (owner only, before launch).
    AddCandidate(CandidateArgs),
    /// Set the exact contribution per vote, in units (owner only).
    SetContribution(AmountArgs),
    /// Set the operator commission in percent (owner only).
    SetCommission(CommissionArgs),
    /// Set the voting window in seconds (owner only).
    SetDuration(DurationArgs),
    /// Open the election for voting (owner only).
    StartVoting(VotingArgs),
    /// Vote for a candidate, paying the contribution.
    Vote(VoteArgs),
    /// Close voting once the deadline has passed.
    CloseVoting(VotingArgs),
    /// Withdraw accrued commission (owner only).
    TakeCommission(AmountArgs),
    /// Pay the prize pool to the winner.
    ReleasePrize(VotingArgs),
    /// Print the current leader.
    WinnerTillNow(VotingArgs),
    /// List every election with its creator.
    List,
    /// Print an election's full state as JSON.
    Show(VotingArgs),
    /// Fund a local account.
    Deposit(AccountAmountArgs),
    /// Print an account's balance.
    Balance(AccountArgs),
}

impl Commands {
    /// Whether the command changes state and must be persisted.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Commands::WinnerTillNow(_)
                | Commands::List
                | Commands::Show(_)
                | Commands::Balance(_)
        )
    }
}

/// Selects an election.
#[derive(Args, Debug)]
pub struct VotingArgs {
    /// Election handle as printed by `add-voting`.
    #[arg(long)]
    pub voting: u64,
}

#[derive(Args, Debug)]
pub struct CandidateArgs {
    #[command(flatten)]
    pub target: VotingArgs,

    /// Display name of the candidate.
    #[arg(long)]
    pub name: Option<String>,

    /// Payout identity of the candidate.
    #[arg(long)]
    pub candidate: String,
}

#[derive(Args, Debug)]
pub struct AmountArgs {
    #[command(flatten)]
    pub target: VotingArgs,

    /// Decimal amount in units, e.g. "0.01".
    #[arg(long)]
    pub amount: String,
}

#[derive(Args, Debug)]
pub struct CommissionArgs {
    #[command(flatten)]
    pub target: VotingArgs,

    /// Commission in whole percent.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub percent: u32,
}

#[derive(Args, Debug)]
pub struct DurationArgs {
    #[command(flatten)]
    pub target: VotingArgs,

    /// Voting window in seconds.
    #[arg(long)]
    pub secs: u64,
}

#[derive(Args, Debug)]
pub struct VoteArgs {
    #[command(flatten)]
    pub target: VotingArgs,

    /// Candidate id.
    #[arg(long)]
    pub id: u64,

    /// Payment in units. Defaults to the election's contribution.
    #[arg(long)]
    pub amount: Option<String>,
}

#[derive(Args, Debug)]
pub struct AccountArgs {
    /// Account identity.
    #[arg(long)]
    pub account: String,
}

#[derive(Args, Debug)]
pub struct AccountAmountArgs {
    /// Account identity.
    #[arg(long)]
    pub account: String,

    /// Decimal amount in units.
    #[arg(long)]
    pub amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        TallyCli::command().debug_assert();
    }

    #[test]
    fn parses_vote_with_global_flags() {
        let cli = TallyCli::try_parse_from([
            "tally",
            "vote",
            "--voting",
            "2",
            "--id",
            "1",
            "--caller",
            "alice",
            "--at",
            "2026-01-01T00:00:00Z",
        ])
        .unwrap();
        assert_eq!(cli.global.caller.as_deref(), Some("alice"));
        assert!(cli.global.at.is_some());
        match cli.command {
            Commands::Vote(args) => {
                assert_eq!(args.target.voting, 2);
                assert_eq!(args.id, 1);
                assert!(args.amount.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn commission_percent_is_bounded() {
        let parsed = TallyCli::try_parse_from([
            "tally",
            "set-commission",
            "--voting",
            "0",
            "--percent",
            "101",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn read_commands_do_not_persist() {
        assert!(!Commands::List.is_mutating());
        assert!(Commands::AddVoting.is_mutating());
    }
}
