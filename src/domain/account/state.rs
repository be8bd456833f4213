//! Account state container — app-owned, SDK-provided update logic.

use super::{Account, AccountStats};
use crate::domain::trading::wire::BalanceUpdate;
use crate::shared::AccountId;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Last-known-good copy of the backend's account list.
///
/// Mutated by REST responses (`replace`, `push`, `replace_one`, `remove`) and
/// by pushed balance updates (`apply_balance_update`).
#[derive(Debug, Clone, Default)]
pub struct AccountsState {
    accounts: Vec<Account>,
    current: Option<AccountId>,
    stats: HashMap<AccountId, AccountStats>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AccountsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| &a.id == id)
    }

    pub fn stats(&self, id: &AccountId) -> Option<&AccountStats> {
        self.stats.get(id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| a.is_active)
    }

    pub fn inactive(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| !a.is_active)
    }

    /// Sum of all account balances, regardless of currency.
    pub fn total_balance(&self) -> Decimal {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// The account currently selected in the UI, if it still exists.
    pub fn current(&self) -> Option<&Account> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: Option<AccountId>) {
        self.current = id;
    }

    /// Replace the whole list (e.g. from `GET /accounts`).
    pub fn replace(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
    }

    /// Append a newly created account.
    pub fn push(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Swap in an updated copy. Returns `false` if the account is not tracked.
    pub fn replace_one(&mut self, account: Account) -> bool {
        match self.accounts.iter_mut().find(|a| a.id == account.id) {
            Some(slot) => {
                *slot = account;
                true
            }
            None => false,
        }
    }

    /// Drop an account together with its cached stats.
    pub fn remove(&mut self, id: &AccountId) -> Option<Account> {
        self.stats.remove(id);
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
        let index = self.accounts.iter().position(|a| &a.id == id)?;
        Some(self.accounts.remove(index))
    }

    pub fn set_stats(&mut self, id: AccountId, stats: AccountStats) {
        self.stats.insert(id, stats);
    }

    /// Apply a pushed balance update.
    ///
    /// Returns the reported change if the account is tracked, `None` otherwise.
    pub fn apply_balance_update(&mut self, update: &BalanceUpdate) -> Option<Decimal> {
        let account = self.accounts.iter_mut().find(|a| a.id == update.account_id)?;
        account.balance = update.balance;
        Some(update.change)
    }

    pub fn set_active(&mut self, id: &AccountId, active: bool) -> bool {
        match self.accounts.iter_mut().find(|a| &a.id == id) {
            Some(account) => {
                account.is_active = active;
                true
            }
            None => false,
        }
    }

    pub fn set_all_active(&mut self, active: bool) {
        self.accounts.iter_mut().for_each(|a| a.is_active = active);
    }
}
