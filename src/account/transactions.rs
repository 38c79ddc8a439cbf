use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    TransferOut,
    TransferIn,
}

impl TransactionKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
            TransactionKind::TransferOut => "Transfer Out",
            TransactionKind::TransferIn => "Transfer In",
        }
    }

    /// Whether this kind adds to the balance
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionKind::Deposit | TransactionKind::TransferIn)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" => Ok(TransactionKind::Withdraw),
            "transfer out" => Ok(TransactionKind::TransferOut),
            "transfer in" => Ok(TransactionKind::TransferIn),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which leg of a transfer an account is recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Out,
    In,
}

impl TransferDirection {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransferDirection::Out => TransactionKind::TransferOut,
            TransferDirection::In => TransactionKind::TransferIn,
        }
    }
}

/// A single ledger entry. Never modified after it is appended to an account.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: Uuid,
    kind: TransactionKind,
    amount: f64,
    timestamp: DateTime<Local>,
    counterparty: Option<String>,
}

impl Transaction {
    pub(crate) fn new(kind: TransactionKind, amount: f64, counterparty: Option<String>) -> Self {
        Self::at(kind, amount, counterparty, Local::now())
    }

    pub(crate) fn at(
        kind: TransactionKind,
        amount: f64,
        counterparty: Option<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        debug_assert!(amount > 0.0, "ledger amounts are always positive");
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            timestamp,
            counterparty,
        }
    }

    /// Reference id used in log output
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Absolute amount of the entry
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Counterparty account id, present only on transfer legs
    pub fn counterparty(&self) -> Option<&str> {
        self.counterparty.as_deref()
    }

    /// Amount with the sign it contributes to the balance
    pub fn signed_amount(&self) -> f64 {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }

    /// Render the entry for the history screen, e.g.
    /// `2024-05-01 10:00:00 [Transfer Out]: $300.00 (Target ID: 67890)`
    pub fn describe(&self, timestamp_format: &str, currency_symbol: &str) -> String {
        let base = format!(
            "{} [{}]: {}{:.2}",
            self.timestamp.format(timestamp_format),
            self.kind,
            currency_symbol,
            self.amount
        );
        match self.counterparty() {
            Some(target) if !target.is_empty() => format!("{} (Target ID: {})", base, target),
            _ => base,
        }
    }
}
