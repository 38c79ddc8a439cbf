use log::{debug, info};
use thiserror::Error;

use super::AccountDirectory;
use crate::account::{is_valid_amount, TransferDirection};

/// Transfer errors, listed in the order the checks are applied
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransferError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Cannot transfer funds to your own account.")]
    SelfTransferNotAllowed,

    #[error("Target Account ID not found.")]
    TargetNotFound,

    #[error("Transfer amount must be positive.")]
    InvalidAmount,

    #[error("Insufficient balance. Current balance: {balance:.2}")]
    InsufficientFunds { balance: f64 },

    #[error("Transfer would overflow the target account balance.")]
    BalanceOverflow,
}

impl AccountDirectory {
    /// Check a transfer without applying it.
    ///
    /// Returns the indices of the source and target accounts.
    fn validate_transfer(
        &self,
        source_id: &str,
        target_id: &str,
        amount: f64,
    ) -> Result<(usize, usize), TransferError> {
        let source = self
            .accounts
            .iter()
            .position(|a| a.id() == source_id)
            .ok_or_else(|| TransferError::AccountNotFound(source_id.to_string()))?;

        if target_id == source_id {
            return Err(TransferError::SelfTransferNotAllowed);
        }

        let target = self
            .accounts
            .iter()
            .position(|a| a.id() == target_id)
            .ok_or(TransferError::TargetNotFound)?;

        if !is_valid_amount(amount) {
            return Err(TransferError::InvalidAmount);
        }

        let balance = self.accounts[source].balance();
        if amount > balance {
            return Err(TransferError::InsufficientFunds { balance });
        }
        if !(self.accounts[target].balance() + amount).is_finite() {
            return Err(TransferError::BalanceOverflow);
        }

        Ok((source, target))
    }

    /// Move `amount` from `source_id` to `target_id`.
    ///
    /// Every precondition is checked before either account is touched, so a
    /// rejected transfer leaves both ledgers unchanged. Once validation passes
    /// the debit and the credit are both applied under the same exclusive borrow.
    pub fn transfer(
        &mut self,
        source_id: &str,
        target_id: &str,
        amount: f64,
    ) -> Result<(), TransferError> {
        let (source, target) = match self.validate_transfer(source_id, target_id, amount) {
            Ok(indices) => indices,
            Err(e) => {
                debug!(
                    "Transfer of {} from {} to {} rejected: {}",
                    amount, source_id, target_id, e
                );
                return Err(e);
            }
        };

        self.accounts[source].record_transfer(TransferDirection::Out, amount, target_id);
        self.accounts[target].record_transfer(TransferDirection::In, amount, source_id);

        info!(
            "Transferred {:.2} from account {} to account {}",
            amount, source_id, target_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, TransactionKind};
    use rstest::{fixture, rstest};

    #[fixture]
    fn directory() -> AccountDirectory {
        AccountDirectory::new(vec![
            Account::new("12345", 1111, 5000.0),
            Account::new("67890", 2222, 1200.5),
        ])
        .unwrap()
    }

    fn balances(directory: &AccountDirectory) -> (f64, f64) {
        (
            directory.find_by_id("12345").unwrap().balance(),
            directory.find_by_id("67890").unwrap().balance(),
        )
    }

    fn ledger_sizes(directory: &AccountDirectory) -> (usize, usize) {
        (
            directory.find_by_id("12345").unwrap().history().len(),
            directory.find_by_id("67890").unwrap().history().len(),
        )
    }

    #[rstest]
    fn test_transfer_applies_both_legs(mut directory: AccountDirectory) {
        directory.transfer("12345", "67890", 300.0).unwrap();

        assert_eq!(balances(&directory), (4700.0, 1500.5));

        let source = directory.find_by_id("12345").unwrap();
        assert_eq!(source.history().len(), 1);
        assert_eq!(source.history()[0].kind(), TransactionKind::TransferOut);
        assert_eq!(source.history()[0].amount(), 300.0);
        assert_eq!(source.history()[0].counterparty(), Some("67890"));
        assert!(source.reconciles());

        let target = directory.find_by_id("67890").unwrap();
        assert_eq!(target.history().len(), 1);
        assert_eq!(target.history()[0].kind(), TransactionKind::TransferIn);
        assert_eq!(target.history()[0].counterparty(), Some("12345"));
        assert!(target.reconciles());
    }

    #[rstest]
    fn test_transfer_entire_balance(mut directory: AccountDirectory) {
        directory.transfer("67890", "12345", 1200.5).unwrap();
        assert_eq!(balances(&directory), (6200.5, 0.0));
    }

    #[rstest]
    #[case("12345", 50.0, TransferError::SelfTransferNotAllowed)]
    #[case("00000", 50.0, TransferError::TargetNotFound)]
    #[case("67890", 0.0, TransferError::InvalidAmount)]
    #[case("67890", -10.0, TransferError::InvalidAmount)]
    #[case("67890", 10000.0, TransferError::InsufficientFunds { balance: 5000.0 })]
    fn test_rejected_transfer_mutates_nothing(
        mut directory: AccountDirectory,
        #[case] target: &str,
        #[case] amount: f64,
        #[case] expected: TransferError,
    ) {
        assert_eq!(directory.transfer("12345", target, amount).unwrap_err(), expected);
        assert_eq!(balances(&directory), (5000.0, 1200.5));
        assert_eq!(ledger_sizes(&directory), (0, 0));
    }

    #[rstest]
    fn test_check_priority(mut directory: AccountDirectory) {
        // self-transfer wins over a bad amount
        assert_eq!(
            directory.transfer("12345", "12345", -1.0).unwrap_err(),
            TransferError::SelfTransferNotAllowed
        );
        // missing target wins over insufficient funds
        assert_eq!(
            directory.transfer("12345", "nobody", 1e9).unwrap_err(),
            TransferError::TargetNotFound
        );
        // non-positive amount wins over insufficient funds
        assert_eq!(
            directory.transfer("12345", "67890", f64::NAN).unwrap_err(),
            TransferError::InvalidAmount
        );
    }

    #[test]
    fn test_transfer_rejects_target_overflow() {
        let mut directory = AccountDirectory::new(vec![
            Account::new("12345", 1111, 1e308),
            Account::new("67890", 2222, f64::MAX),
        ])
        .unwrap();

        assert_eq!(
            directory.transfer("12345", "67890", 1e308).unwrap_err(),
            TransferError::BalanceOverflow
        );
        assert_eq!(balances(&directory), (1e308, f64::MAX));
        assert_eq!(ledger_sizes(&directory), (0, 0));
    }

    #[rstest]
    fn test_unknown_source(mut directory: AccountDirectory) {
        assert_eq!(
            directory.transfer("nobody", "67890", 1.0).unwrap_err(),
            TransferError::AccountNotFound("nobody".to_string())
        );
        assert_eq!(ledger_sizes(&directory), (0, 0));
    }
}
