use anyhow::{anyhow, Result};
use log::debug;

use crate::account::{Account, AccountError};
use crate::cli::utils::{print_error, print_header, Terminal};
use crate::config::DisplayConfig;
use crate::directory::{AccountDirectory, TransferError};

/// Value returned by [`read_amount`] when the input is not a number
pub const INVALID_AMOUNT: f64 = -1.0;

/// Whether the session should keep reading input after a handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    InputClosed,
}

/// Read an amount. Unparsable input is reported and yields [`INVALID_AMOUNT`];
/// `None` means input is exhausted.
pub fn read_amount(terminal: &mut dyn Terminal, prompt: &str) -> Result<Option<f64>> {
    let input = match terminal.read_line(prompt)? {
        Some(input) => input,
        None => return Ok(None),
    };

    match input.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        _ => {
            debug!("Unparsable amount {:?}", input);
            terminal.print_line("Invalid input. Please enter a numerical amount.")?;
            Ok(Some(INVALID_AMOUNT))
        }
    }
}

fn current_account<'a>(directory: &'a AccountDirectory, account_id: &str) -> Result<&'a Account> {
    directory
        .find_by_id(account_id)
        .ok_or_else(|| anyhow!("Account {} not found", account_id))
}

fn current_account_mut<'a>(
    directory: &'a mut AccountDirectory,
    account_id: &str,
) -> Result<&'a mut Account> {
    directory
        .find_by_id_mut(account_id)
        .ok_or_else(|| anyhow!("Account {} not found", account_id))
}

/// Show the ledger newest first, followed by the current balance
pub fn show_transaction_history(
    terminal: &mut dyn Terminal,
    directory: &AccountDirectory,
    account_id: &str,
    display: &DisplayConfig,
) -> Result<Flow> {
    let account = current_account(directory, account_id)?;
    print_header(
        terminal,
        &format!("Transaction History (Account ID: {})", account.id()),
    )?;

    let history = account.history();
    if history.is_empty() {
        terminal.print_line("No transactions recorded yet.")?;
    }
    for transaction in history.iter().rev() {
        terminal.print_line(&format!(
            "  > {}",
            transaction.describe(&display.timestamp_format, &display.currency_symbol)
        ))?;
    }

    terminal.print_line(&format!("\nCURRENT BALANCE: {}", display.money(account.balance())))?;
    Ok(Flow::Continue)
}

/// Handle the withdraw menu entry
pub fn withdraw(
    terminal: &mut dyn Terminal,
    directory: &mut AccountDirectory,
    account_id: &str,
    display: &DisplayConfig,
) -> Result<Flow> {
    print_header(terminal, "Withdraw Money")?;
    let amount = match read_amount(terminal, "Enter amount to withdraw: ")? {
        Some(amount) => amount,
        None => return Ok(Flow::InputClosed),
    };

    if amount <= 0.0 {
        terminal.print_line("Withdrawal amount must be positive.")?;
        return Ok(Flow::Continue);
    }

    let account = current_account_mut(directory, account_id)?;
    let result = account.withdraw(amount).map(|_| ());
    match result {
        Ok(_) => terminal.print_line(&format!(
            "Success: Withdrew {}. New balance: {}",
            display.money(amount),
            display.money(account.balance())
        ))?,
        Err(AccountError::InsufficientFunds { balance }) => print_error(
            terminal,
            &format!("Insufficient balance. Current balance: {}", display.money(balance)),
        )?,
        Err(AccountError::InvalidAmount) => {
            terminal.print_line("Withdrawal amount must be positive.")?
        }
        Err(e @ AccountError::BalanceOverflow) => print_error(terminal, &e.to_string())?,
    }
    Ok(Flow::Continue)
}

/// Handle the deposit menu entry
pub fn deposit(
    terminal: &mut dyn Terminal,
    directory: &mut AccountDirectory,
    account_id: &str,
    display: &DisplayConfig,
) -> Result<Flow> {
    print_header(terminal, "Deposit Money")?;
    let amount = match read_amount(terminal, "Enter amount to deposit: ")? {
        Some(amount) => amount,
        None => return Ok(Flow::InputClosed),
    };

    if amount <= 0.0 {
        terminal.print_line("Deposit amount must be positive.")?;
        return Ok(Flow::Continue);
    }

    let account = current_account_mut(directory, account_id)?;
    let result = account.deposit(amount).map(|_| ());
    match result {
        Ok(_) => terminal.print_line(&format!(
            "Success: Deposited {}. New balance: {}",
            display.money(amount),
            display.money(account.balance())
        ))?,
        Err(AccountError::InvalidAmount) => {
            terminal.print_line("Deposit amount must be positive.")?
        }
        Err(e) => print_error(terminal, &e.to_string())?,
    }
    Ok(Flow::Continue)
}

/// Handle the transfer menu entry.
///
/// The target is checked before the amount is asked for.
pub fn transfer(
    terminal: &mut dyn Terminal,
    directory: &mut AccountDirectory,
    account_id: &str,
    display: &DisplayConfig,
) -> Result<Flow> {
    print_header(terminal, "Transfer Funds")?;
    let target_id = match terminal.read_line("Enter target Account ID: ")? {
        Some(target_id) => target_id,
        None => return Ok(Flow::InputClosed),
    };

    if target_id == account_id {
        print_error(terminal, &TransferError::SelfTransferNotAllowed.to_string())?;
        return Ok(Flow::Continue);
    }
    if directory.find_by_id(&target_id).is_none() {
        print_error(terminal, &TransferError::TargetNotFound.to_string())?;
        return Ok(Flow::Continue);
    }

    let amount = match read_amount(terminal, "Enter amount to transfer: ")? {
        Some(amount) => amount,
        None => return Ok(Flow::InputClosed),
    };

    match directory.transfer(account_id, &target_id, amount) {
        Ok(()) => {
            let balance = current_account(directory, account_id)?.balance();
            terminal.print_line(&format!(
                "Success: Transferred {} to Account {}. New balance: {}",
                display.money(amount),
                target_id,
                display.money(balance)
            ))?;
        }
        Err(TransferError::InvalidAmount) => {
            terminal.print_line(&TransferError::InvalidAmount.to_string())?
        }
        Err(TransferError::InsufficientFunds { balance }) => print_error(
            terminal,
            &format!("Insufficient balance. Current balance: {}", display.money(balance)),
        )?,
        Err(e) => print_error(terminal, &e.to_string())?,
    }
    Ok(Flow::Continue)
}
