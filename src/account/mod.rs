// Account module
// This module provides the in-memory account, its ledger entries
// and the balance-changing operations.

mod management;
mod transactions;

pub use management::{is_valid_amount, Account, AccountError};
pub use transactions::{Transaction, TransactionKind, TransferDirection};
