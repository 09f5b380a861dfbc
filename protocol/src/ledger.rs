//! # Ledger
//!
//! The transfer primitive elections custody funds through. A transfer either
//! fully happens or fails without touching any balance; there is no partial
//! state in between.
//!
//! [`InMemoryLedger`] is a flat balance map, serializable so the CLI can
//! persist it between invocations. A `BTreeMap` keeps the serialized form
//! stable across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::address::Identity;
use crate::amount::Amount;

/// Errors returned by ledger transfers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The sender does not hold enough funds.
    #[error("insufficient balance in {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        /// The account being debited.
        account: Identity,
        /// Its current balance.
        available: Amount,
        /// The amount that was requested.
        requested: Amount,
    },

    /// Crediting the recipient would overflow its balance.
    #[error("balance overflow crediting {account}")]
    Overflow {
        /// The account being credited.
        account: Identity,
    },
}

/// Atomic native-currency transfers between accounts.
pub trait Ledger {
    /// Current balance of `account`. Unknown accounts hold zero.
    fn balance_of(&self, account: &Identity) -> Amount;

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// On error no balance has changed.
    fn transfer(&mut self, from: &Identity, to: &Identity, amount: Amount)
        -> Result<(), TransferError>;
}

/// Balance map held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    balances: BTreeMap<Identity, Amount>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `account` out of thin air. This is how accounts
    /// are funded on a local deployment; elections never call it.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Overflow`] if the balance would exceed
    /// `u64::MAX`.
    pub fn deposit(&mut self, account: &Identity, amount: Amount) -> Result<(), TransferError> {
        let balance = self.balances.entry(account.clone()).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(TransferError::Overflow {
            account: account.clone(),
        })?;
        Ok(())
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|&b| b as u128).sum()
    }

    /// Iterates over all funded accounts in identity order.
    pub fn accounts(&self) -> impl Iterator<Item = (&Identity, Amount)> {
        self.balances.iter().map(|(id, &bal)| (id, bal))
    }
}

impl Ledger for InMemoryLedger {
    fn balance_of(&self, account: &Identity) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &Identity,
        to: &Identity,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let available = self.balance_of(from);
        if amount > available {
            return Err(TransferError::InsufficientBalance {
                account: from.clone(),
                available,
                requested: amount,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        // Validate the credit before touching either side.
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow { account: to.clone() })?;

        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);

        debug!(%from, %to, amount, "ledger transfer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn transfer_moves_funds() {
        let mut ledger = InMemoryLedger::new();
        ledger.deposit(&id("alice"), 100).unwrap();
        ledger.transfer(&id("alice"), &id("bob"), 40).unwrap();
        assert_eq!(ledger.balance_of(&id("alice")), 60);
        assert_eq!(ledger.balance_of(&id("bob")), 40);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn insufficient_balance_changes_nothing() {
        let mut ledger = InMemoryLedger::new();
        ledger.deposit(&id("alice"), 10).unwrap();
        let before = ledger.clone();
        let err = ledger.transfer(&id("alice"), &id("bob"), 11).unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientBalance {
                account: id("alice"),
                available: 10,
                requested: 11,
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn overflowing_credit_changes_nothing() {
        let mut ledger = InMemoryLedger::new();
        ledger.deposit(&id("alice"), 10).unwrap();
        ledger.deposit(&id("bob"), u64::MAX).unwrap();
        let before = ledger.clone();
        assert!(matches!(
            ledger.transfer(&id("alice"), &id("bob"), 1),
            Err(TransferError::Overflow { .. })
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn self_transfer_is_a_no_op() {
        let mut ledger = InMemoryLedger::new();
        ledger.deposit(&id("alice"), 10).unwrap();
        ledger.transfer(&id("alice"), &id("alice"), 10).unwrap();
        assert_eq!(ledger.balance_of(&id("alice")), 10);
    }

    #[test]
    fn unknown_accounts_hold_zero() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance_of(&id("nobody")), 0);
        assert_eq!(ledger.accounts().count(), 0);
    }
}
