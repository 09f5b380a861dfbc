// Copyright (c) 2026 Tally Contributors. MIT License.
// See LICENSE for details.

//! # Tally Operator CLI
//!
//! Entry point for the `tally` binary. Parses CLI arguments, initializes
//! logging, loads the local state file, applies exactly one operation and
//! persists the result when the operation changed anything.
//!
//! The clock is read once per invocation: the wall clock, or the instant
//! pinned by `--at` for reproducible scripted runs. Either way it may not
//! precede an instant an earlier invocation already ran at.

mod cli;
mod commands;
mod logging;
mod store;

use anyhow::{Context as _, Result};
use clap::Parser;

use tally_protocol::{Clock, Identity, ManualClock, SystemClock};

use cli::TallyCli;
use commands::Context;
use logging::LogFormat;
use store::LocalState;

/// Deployer recorded for a fresh state file when no caller is given.
const DEFAULT_DEPLOYER: &str = "local";

fn main() -> Result<()> {
    let cli = TallyCli::parse();
    logging::init_logging(
        logging::DEFAULT_FILTER,
        LogFormat::from_str_lossy(&cli.global.log_format),
    );

    let caller = cli
        .global
        .caller
        .as_deref()
        .map(Identity::new)
        .transpose()
        .context("invalid --caller")?;

    let deployer = match &caller {
        Some(identity) => identity.clone(),
        None => Identity::new(DEFAULT_DEPLOYER).context("invalid default deployer")?,
    };
    let state_path = cli.global.state;
    let mut state = LocalState::load_or_genesis(&state_path, deployer)?;

    let now = cli.global.at.unwrap_or_else(|| SystemClock.now());
    state.observe(now)?;
    let clock = ManualClock::new(now);

    let mutating = cli.command.is_mutating();
    tracing::debug!(command = ?cli.command, caller = ?caller, "executing");

    let ctx = Context {
        caller,
        clock: &clock,
    };
    let output = commands::execute(cli.command, &ctx, &mut state)?;

    if mutating {
        state.save(&state_path)?;
    }
    println!("{output}");
    Ok(())
}
