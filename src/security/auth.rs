use log::{debug, info, warn};
use thiserror::Error;

use crate::cli::utils::{print_header, Terminal};
use crate::directory::AccountDirectory;

/// Default number of failed attempts before the session locks
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// PIN was not a number; counts as a failed attempt
    #[error("Invalid PIN format.")]
    InvalidPinFormat,

    /// No account matches the id and PIN
    #[error("Invalid User ID or PIN.")]
    InvalidCredentials,

    /// Attempt limit reached; login is refused for the rest of the session
    #[error("Maximum attempts reached. ATM locked.")]
    Locked,

    /// Input ended before a login succeeded
    #[error("Input closed before login completed")]
    InputClosed,

    /// Console failure
    #[error(transparent)]
    Terminal(#[from] anyhow::Error),
}

/// Login state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Prompting,
    Checking,
    Authenticated,
    Locked,
}

/// Session-scoped login with a hard attempt counter.
///
/// There is no lockout timer: once `Locked`, every further attempt fails.
#[derive(Debug)]
pub struct Authenticator {
    max_attempts: u32,
    failed_attempts: u32,
    state: AuthState,
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl Authenticator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            failed_attempts: 0,
            state: AuthState::Prompting,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn attempts_left(&self) -> u32 {
        self.max_attempts.saturating_sub(self.failed_attempts)
    }

    /// Check one login attempt against the directory.
    ///
    /// On success returns the authenticated account id.
    pub fn attempt(
        &mut self,
        directory: &AccountDirectory,
        user_id: &str,
        pin_input: &str,
    ) -> Result<String, AuthError> {
        if self.state == AuthState::Locked {
            return Err(AuthError::Locked);
        }
        self.state = AuthState::Checking;

        // Any integer is a well-formed PIN; one outside the stored range just never matches
        let outcome = match pin_input.trim().parse::<i64>() {
            Ok(pin) => u32::try_from(pin)
                .ok()
                .and_then(|pin| directory.find_by_credentials(user_id, pin))
                .map(|account| account.id().to_string())
                .ok_or(AuthError::InvalidCredentials),
            Err(_) => Err(AuthError::InvalidPinFormat),
        };

        match outcome {
            Ok(id) => {
                self.state = AuthState::Authenticated;
                info!("User {} logged in", id);
                Ok(id)
            }
            Err(e) => {
                self.failed_attempts += 1;
                warn!(
                    "Failed login attempt {}/{} for user id {:?}: {}",
                    self.failed_attempts, self.max_attempts, user_id, e
                );
                self.state = if self.failed_attempts >= self.max_attempts {
                    warn!("Maximum login attempts reached, locking session");
                    AuthState::Locked
                } else {
                    AuthState::Prompting
                };
                Err(e)
            }
        }
    }

    /// Run the interactive login loop.
    ///
    /// Returns the authenticated account id, `AuthError::Locked` once the
    /// attempt limit is hit, or `AuthError::InputClosed` at end of input.
    pub fn authenticate(
        &mut self,
        directory: &AccountDirectory,
        terminal: &mut dyn Terminal,
    ) -> Result<String, AuthError> {
        print_header(terminal, "ATM Login")?;

        while self.state != AuthState::Locked {
            let user_id = terminal
                .read_line("Enter User ID: ")?
                .ok_or(AuthError::InputClosed)?;
            let pin_input = terminal
                .read_line("Enter User PIN: ")?
                .ok_or(AuthError::InputClosed)?;

            match self.attempt(directory, &user_id, &pin_input) {
                Ok(id) => {
                    terminal.print_line(&format!("\nLogin Successful! Welcome, {}.", id))?;
                    return Ok(id);
                }
                Err(AuthError::InvalidPinFormat) => {
                    terminal.print_line(&AuthError::InvalidPinFormat.to_string())?;
                }
                Err(AuthError::InvalidCredentials) => {
                    terminal.print_line(&format!(
                        "{} Attempts left: {}",
                        AuthError::InvalidCredentials,
                        self.attempts_left()
                    ))?;
                }
                Err(e) => return Err(e),
            }
        }

        debug!("Login loop ended in locked state");
        terminal.print_line(&format!("\n{}", AuthError::Locked))?;
        Err(AuthError::Locked)
    }
}
