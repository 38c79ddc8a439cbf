// Account directory module
// Owns the fixed set of accounts for a session and coordinates
// operations that touch more than one account.

mod transfer;

use log::debug;
use thiserror::Error;

use crate::account::Account;
use crate::config::SeedAccount;

pub use transfer::TransferError;

/// Errors raised while building a directory
#[derive(Debug, Error, PartialEq)]
pub enum DirectoryError {
    #[error("Duplicate account id in seed list: {0}")]
    DuplicateAccount(String),
}

/// The fixed collection of accounts, keyed by account id.
///
/// Membership never changes after construction; individual accounts are
/// mutated through `&mut` access only.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
}

impl AccountDirectory {
    /// Build a directory, rejecting duplicate ids
    pub fn new(accounts: Vec<Account>) -> Result<Self, DirectoryError> {
        for (i, account) in accounts.iter().enumerate() {
            if accounts[..i].iter().any(|other| other.id() == account.id()) {
                return Err(DirectoryError::DuplicateAccount(account.id().to_string()));
            }
        }
        debug!("Account directory created with {} accounts", accounts.len());
        Ok(Self { accounts })
    }

    /// Build a directory from configured seed entries
    pub fn from_seed(seed: &[SeedAccount]) -> Result<Self, DirectoryError> {
        Self::new(
            seed.iter()
                .map(|s| Account::new(s.id.clone(), s.pin, s.balance))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Exact-match lookup by account id
    pub fn find_by_id(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id() == id)
    }

    /// Lookup requiring both the id and the PIN to match
    pub fn find_by_credentials(&self, id: &str, pin: u32) -> Option<&Account> {
        self.find_by_id(id).filter(|a| a.pin_matches(pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_from_default_seed() {
        let directory = AccountDirectory::from_seed(&Config::default().accounts).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.find_by_id("12345").unwrap().balance(), 5000.0);
        assert_eq!(directory.find_by_id("67890").unwrap().balance(), 1200.5);
        assert!(directory.find_by_id("00000").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = AccountDirectory::new(vec![
            Account::new("1", 1, 0.0),
            Account::new("2", 2, 0.0),
            Account::new("1", 3, 0.0),
        ]);

        assert_eq!(result.unwrap_err(), DirectoryError::DuplicateAccount("1".to_string()));
    }

    #[test]
    fn test_find_by_credentials() {
        let directory = AccountDirectory::from_seed(&Config::default().accounts).unwrap();

        assert!(directory.find_by_credentials("12345", 1111).is_some());
        assert!(directory.find_by_credentials("12345", 2222).is_none());
        assert!(directory.find_by_credentials("67890", 2222).is_some());
        assert!(directory.find_by_credentials("99999", 1111).is_none());
    }

    #[test]
    fn test_lookup_is_exact() {
        let directory = AccountDirectory::from_seed(&Config::default().accounts).unwrap();

        assert!(directory.find_by_id(" 12345").is_none());
        assert!(directory.find_by_id("1234").is_none());
    }
}
