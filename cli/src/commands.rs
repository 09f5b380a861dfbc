//! Task execution: one subcommand, one core operation.

use anyhow::{anyhow, Context as _, Result};
use tally_contracts::{Election, ElectionId, ElectionRegistry, RegistryError};
use tally_protocol::config::percent_to_bps;
use tally_protocol::{format_amount, parse_amount, Clock, Identity, Ledger};

use crate::cli::Commands;
use crate::store::LocalState;

/// Who is calling and what time it is.
pub struct Context<'a> {
    pub caller: Option<Identity>,
    pub clock: &'a dyn Clock,
}

impl Context<'_> {
    fn caller(&self) -> Result<&Identity> {
        self.caller
            .as_ref()
            .ok_or_else(|| anyhow!("this command needs --caller (or TALLY_CALLER)"))
    }
}

fn election_mut(
    registry: &mut ElectionRegistry,
    voting: u64,
) -> Result<&mut Election, RegistryError> {
    registry.election_mut(ElectionId(voting))
}

fn parse_identity(raw: &str) -> Result<Identity> {
    Identity::new(raw).with_context(|| format!("invalid identity {raw:?}"))
}

fn parse_units(raw: &str) -> Result<u64> {
    parse_amount(raw).with_context(|| format!("invalid amount {raw:?}"))
}

/// Runs `command` against `state` and returns what to print on stdout.
pub fn execute(command: Commands, ctx: &Context<'_>, state: &mut LocalState) -> Result<String> {
    let LocalState {
        registry, ledger, ..
    } = state;

    let output = match command {
        Commands::AddVoting => {
            let handle = registry.create_voting(ctx.caller()?);
            let account = registry.election(handle)?.account().clone();
            format!("Voting {} created at {}", handle.0, account)
        }
        Commands::AddCandidate(args) => {
            let payout = parse_identity(&args.candidate)?;
            let id = election_mut(registry, args.target.voting)?.register_candidate(
                ctx.caller()?,
                args.name,
                payout.clone(),
            )?;
            format!("Added candidate {id}: {payout}")
        }
        Commands::SetContribution(args) => {
            let value = parse_units(&args.amount)?;
            election_mut(registry, args.target.voting)?.set_contribution(ctx.caller()?, value)?;
            format!("Contribution set to {}", format_amount(value))
        }
        Commands::SetCommission(args) => {
            election_mut(registry, args.target.voting)?
                .set_commission(ctx.caller()?, percent_to_bps(args.percent))?;
            format!("Commission set to {}%", args.percent)
        }
        Commands::SetDuration(args) => {
            election_mut(registry, args.target.voting)?
                .set_voting_duration(ctx.caller()?, args.secs)?;
            format!("Voting duration set to {}s", args.secs)
        }
        Commands::StartVoting(args) => {
            let election = election_mut(registry, args.voting)?;
            election.start_voting(ctx.caller()?, ctx.clock)?;
            format!("Voting open until {}", election.end_time()?.to_rfc3339())
        }
        Commands::Vote(args) => {
            let election = election_mut(registry, args.target.voting)?;
            let payment = match args.amount {
                Some(raw) => parse_units(&raw)?,
                None => election.contribution(),
            };
            election.vote(ctx.caller()?, args.id, payment, ctx.clock, ledger)?;
            format!("Voted for candidate {}", args.id)
        }
        Commands::CloseVoting(args) => {
            election_mut(registry, args.voting)?.close_voting(ctx.caller()?, ctx.clock)?;
            "Voting closed".to_string()
        }
        Commands::TakeCommission(args) => {
            let amount = parse_units(&args.amount)?;
            let election = election_mut(registry, args.target.voting)?;
            election.take_commission(ctx.caller()?, amount, ledger)?;
            format!(
                "Withdrew {} commission, {} left",
                format_amount(amount),
                format_amount(election.fee_box())
            )
        }
        Commands::ReleasePrize(args) => {
            let election = election_mut(registry, args.voting)?;
            let prize = election.prize_box();
            let payout = election.release_prize(ctx.caller()?, ledger)?;
            format!("Released {} to {}", format_amount(prize), payout)
        }
        Commands::WinnerTillNow(args) => {
            let election = registry.election(ElectionId(args.voting))?;
            let leader = election.winner_till_now()?;
            let votes = election.votes_for(leader)?;
            format!("Winner as of now: candidate {leader} with {votes} vote(s)")
        }
        Commands::List => {
            serde_json::to_string_pretty(&registry.deployments()).context("failed to render list")?
        }
        Commands::Show(args) => {
            let summary = registry.election(ElectionId(args.voting))?.summary();
            serde_json::to_string_pretty(&summary).context("failed to render election")?
        }
        Commands::Deposit(args) => {
            let account = parse_identity(&args.account)?;
            let amount = parse_units(&args.amount)?;
            ledger.deposit(&account, amount)?;
            format!(
                "{} balance: {}",
                account,
                format_amount(ledger.balance_of(&account))
            )
        }
        Commands::Balance(args) => {
            // Custody accounts cannot be parsed from input, so match by name.
            let balance = ledger
                .accounts()
                .find(|(account, _)| account.as_str() == args.account)
                .map_or(0, |(_, amount)| amount);
            format_amount(balance)
        }
    };

    Ok(output)
}
