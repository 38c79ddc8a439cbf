use anyhow::Result;
use std::fmt;
use thiserror::Error;

use super::utils::{print_header, Terminal};

/// Menu selection errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// Input was not a number at all
    #[error("Invalid input. Please enter a numerical choice.")]
    NotANumber,

    /// A number outside the menu range
    #[error("Invalid choice. Please enter a number between 1 and 5.")]
    InvalidChoice(i64),
}

/// Main menu entries, numbered 1 to 5 on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowHistory,
    Withdraw,
    Deposit,
    Transfer,
    Quit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::ShowHistory,
        MenuChoice::Withdraw,
        MenuChoice::Deposit,
        MenuChoice::Transfer,
        MenuChoice::Quit,
    ];

    pub fn number(&self) -> i64 {
        match self {
            MenuChoice::ShowHistory => 1,
            MenuChoice::Withdraw => 2,
            MenuChoice::Deposit => 3,
            MenuChoice::Transfer => 4,
            MenuChoice::Quit => 5,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MenuChoice::ShowHistory => "Transactions History (Check Balance)",
            MenuChoice::Withdraw => "Withdraw",
            MenuChoice::Deposit => "Deposit",
            MenuChoice::Transfer => "Transfer",
            MenuChoice::Quit => "Quit",
        }
    }

    /// Parse a line typed at the menu prompt
    pub fn parse(input: &str) -> Result<Self, MenuError> {
        let number = input
            .trim()
            .parse::<i64>()
            .map_err(|_| MenuError::NotANumber)?;

        Self::ALL
            .into_iter()
            .find(|choice| choice.number() == number)
            .ok_or(MenuError::InvalidChoice(number))
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

/// Print the main menu
pub fn display_menu(terminal: &mut dyn Terminal) -> Result<()> {
    print_header(terminal, "ATM Functionality")?;
    for choice in MenuChoice::ALL {
        terminal.print_line(&choice.to_string())?;
    }
    Ok(())
}
