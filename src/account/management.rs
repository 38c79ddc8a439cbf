use log::{debug, info};
use thiserror::Error;

use super::transactions::{Transaction, TransactionKind, TransferDirection};

/// Tolerance used when reconciling a balance against its ledger
const RECONCILE_EPSILON: f64 = 1e-6;

/// Account operation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountError {
    /// Amount is zero, negative or not a finite number
    #[error("Invalid amount: must be greater than 0")]
    InvalidAmount,

    /// Amount exceeds the current balance
    #[error("Insufficient balance. Current balance: {balance:.2}")]
    InsufficientFunds { balance: f64 },

    /// Resulting balance would no longer be a finite number
    #[error("Amount would overflow the account balance")]
    BalanceOverflow,
}

/// Returns true for amounts an account will accept
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

/// A bank account with its append-only ledger.
///
/// The balance can only move through [`Account::deposit`], [`Account::withdraw`]
/// and the transfer legs applied by the directory; every movement appends
/// exactly one [`Transaction`].
#[derive(Debug, Clone)]
pub struct Account {
    id: String,
    pin: u32,
    opening_balance: f64,
    balance: f64,
    history: Vec<Transaction>,
}

impl Account {
    pub fn new(id: impl Into<String>, pin: u32, opening_balance: f64) -> Self {
        Self {
            id: id.into(),
            pin,
            opening_balance,
            balance: opening_balance,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Plain comparison; PINs are not hashed in this simulator.
    pub fn pin_matches(&self, pin: u32) -> bool {
        self.pin == pin
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Balance the account was seeded with
    pub fn opening_balance(&self) -> f64 {
        self.opening_balance
    }

    /// Ledger entries, oldest first
    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Checks that the balance equals the opening balance plus the signed sum of the ledger
    pub fn reconciles(&self) -> bool {
        let ledger: f64 = self.history.iter().map(Transaction::signed_amount).sum();
        (self.opening_balance + ledger - self.balance).abs() < RECONCILE_EPSILON
    }

    /// Deposit funds
    pub fn deposit(&mut self, amount: f64) -> Result<&Transaction, AccountError> {
        if !is_valid_amount(amount) {
            debug!("Rejected deposit of {} on account {}", amount, self.id);
            return Err(AccountError::InvalidAmount);
        }
        if !(self.balance + amount).is_finite() {
            debug!("Rejected deposit of {} on account {}: balance overflow", amount, self.id);
            return Err(AccountError::BalanceOverflow);
        }

        self.balance += amount;
        Ok(self.append(Transaction::new(TransactionKind::Deposit, amount, None)))
    }

    /// Withdraw funds; the full balance may be withdrawn
    pub fn withdraw(&mut self, amount: f64) -> Result<&Transaction, AccountError> {
        if !is_valid_amount(amount) {
            debug!("Rejected withdrawal of {} on account {}", amount, self.id);
            return Err(AccountError::InvalidAmount);
        }
        if amount > self.balance {
            debug!(
                "Rejected withdrawal of {:.2} on account {}: balance {:.2}",
                amount, self.id, self.balance
            );
            return Err(AccountError::InsufficientFunds { balance: self.balance });
        }

        self.balance -= amount;
        Ok(self.append(Transaction::new(TransactionKind::Withdraw, amount, None)))
    }

    /// Apply one leg of a transfer.
    ///
    /// No sufficiency check happens here; the caller has already validated both legs.
    pub(crate) fn record_transfer(
        &mut self,
        direction: TransferDirection,
        amount: f64,
        counterparty_id: &str,
    ) -> &Transaction {
        match direction {
            TransferDirection::Out => self.balance -= amount,
            TransferDirection::In => self.balance += amount,
        }
        self.append(Transaction::new(
            direction.kind(),
            amount,
            Some(counterparty_id.to_string()),
        ))
    }

    fn append(&mut self, transaction: Transaction) -> &Transaction {
        info!(
            "Transaction {} recorded on account {}: {} {:.2}",
            transaction.id(),
            self.id,
            transaction.kind(),
            transaction.amount()
        );
        self.history.push(transaction);
        &self.history[self.history.len() - 1]
    }
}
