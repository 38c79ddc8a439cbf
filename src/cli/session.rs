use anyhow::Result;
use log::{debug, info};

use crate::cli::account::{self, Flow};
use crate::cli::menu::{display_menu, MenuChoice};
use crate::cli::utils::Terminal;
use crate::config::Config;
use crate::directory::AccountDirectory;
use crate::security::auth::{AuthError, Authenticator};

const SEPARATOR: &str = "\n------------------------------------------------\n";

/// Session controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticating,
    MenuLoop,
    Terminated,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// User chose Quit
    Quit,
    /// Login attempts exhausted
    Locked,
    /// Input ended before Quit
    InputClosed,
}

/// One interactive ATM session over a borrowed account directory
pub struct Session<'a> {
    directory: &'a mut AccountDirectory,
    config: &'a Config,
    state: SessionState,
    account_id: Option<String>,
}

impl<'a> Session<'a> {
    pub fn new(directory: &'a mut AccountDirectory, config: &'a Config) -> Self {
        Self {
            directory,
            config,
            state: SessionState::Authenticating,
            account_id: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the logged-in account, once authenticated
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Drive the session until it terminates.
    ///
    /// Only console failures are returned as errors; every user mistake is
    /// reported on the terminal and the session carries on.
    pub fn run(&mut self, terminal: &mut dyn Terminal) -> Result<SessionOutcome> {
        let mut authenticator = Authenticator::new(self.config.security.max_login_attempts);
        let account_id = match authenticator.authenticate(self.directory, terminal) {
            Ok(id) => id,
            Err(AuthError::Terminal(e)) => return Err(e),
            Err(e) => {
                info!("Session ended before login: {}", e);
                terminal.print_line("System Shutdown.")?;
                self.state = SessionState::Terminated;
                return Ok(match e {
                    AuthError::Locked => SessionOutcome::Locked,
                    _ => SessionOutcome::InputClosed,
                });
            }
        };

        self.account_id = Some(account_id.clone());
        self.state = SessionState::MenuLoop;

        let outcome = self.menu_loop(terminal, &account_id)?;
        self.state = SessionState::Terminated;
        info!("Session for account {} ended: {:?}", account_id, outcome);
        Ok(outcome)
    }

    fn menu_loop(&mut self, terminal: &mut dyn Terminal, account_id: &str) -> Result<SessionOutcome> {
        loop {
            display_menu(terminal)?;
            let input = match terminal.read_line("Enter choice: ")? {
                Some(input) => input,
                None => return Ok(SessionOutcome::InputClosed),
            };

            let flow = match MenuChoice::parse(&input) {
                Ok(MenuChoice::Quit) => {
                    terminal.print_line("\nThank you for using the ATM. Goodbye!")?;
                    terminal.print_line(SEPARATOR)?;
                    return Ok(SessionOutcome::Quit);
                }
                Ok(choice) => {
                    debug!("Dispatching menu choice {:?}", choice);
                    self.dispatch(terminal, choice, account_id)?
                }
                Err(e) => {
                    debug!("Rejected menu input {:?}: {}", input, e);
                    terminal.print_line(&e.to_string())?;
                    Flow::Continue
                }
            };

            if flow == Flow::InputClosed {
                return Ok(SessionOutcome::InputClosed);
            }
            terminal.print_line(SEPARATOR)?;
        }
    }

    fn dispatch(
        &mut self,
        terminal: &mut dyn Terminal,
        choice: MenuChoice,
        account_id: &str,
    ) -> Result<Flow> {
        let display = &self.config.display;
        match choice {
            MenuChoice::ShowHistory => {
                account::show_transaction_history(terminal, self.directory, account_id, display)
            }
            MenuChoice::Withdraw => account::withdraw(terminal, self.directory, account_id, display),
            MenuChoice::Deposit => account::deposit(terminal, self.directory, account_id, display),
            MenuChoice::Transfer => account::transfer(terminal, self.directory, account_id, display),
            MenuChoice::Quit => Ok(Flow::Continue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::utils::Console;
    use std::io::Cursor;

    fn run_script(script: &str) -> (SessionOutcome, SessionState, AccountDirectory, String) {
        let config = Config::default();
        let mut directory = AccountDirectory::from_seed(&config.accounts).unwrap();
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());

        let (outcome, state) = {
            let mut session = Session::new(&mut directory, &config);
            let outcome = session.run(&mut console).unwrap();
            (outcome, session.state())
        };
        let output = String::from_utf8(console.into_output()).unwrap();
        (outcome, state, directory, output)
    }

    #[test]
    fn test_quit_immediately() {
        let (outcome, state, _, output) = run_script("12345\n1111\n5\n");

        assert_eq!(outcome, SessionOutcome::Quit);
        assert_eq!(state, SessionState::Terminated);
        assert!(output.contains("Login Successful! Welcome, 12345."));
        assert!(output.contains("Thank you for using the ATM. Goodbye!"));
    }

    #[test]
    fn test_lockout_terminates() {
        let (outcome, state, _, output) = run_script("1\n1\n2\n2\n3\n3\n");

        assert_eq!(outcome, SessionOutcome::Locked);
        assert_eq!(state, SessionState::Terminated);
        assert!(output.contains("Maximum attempts reached. ATM locked."));
        assert!(output.contains("System Shutdown."));
        assert!(!output.contains("ATM Functionality"));
    }

    #[test]
    fn test_bad_choices_keep_looping() {
        let (outcome, _, directory, output) = run_script("12345\n1111\nabc\n9\n3\n10\n5\n");

        assert_eq!(outcome, SessionOutcome::Quit);
        assert!(output.contains("Invalid input. Please enter a numerical choice."));
        assert!(output.contains("Invalid choice. Please enter a number between 1 and 5."));
        assert_eq!(directory.find_by_id("12345").unwrap().balance(), 5010.0);
        assert_eq!(output.matches("--- ATM Functionality ---").count(), 4);
    }

    #[test]
    fn test_end_of_input_in_menu() {
        let (outcome, state, _, _) = run_script("67890\n2222\n2\n");

        assert_eq!(outcome, SessionOutcome::InputClosed);
        assert_eq!(state, SessionState::Terminated);
    }

    #[test]
    fn test_end_of_input_during_login() {
        let (outcome, _, _, output) = run_script("12345\n");

        assert_eq!(outcome, SessionOutcome::InputClosed);
        assert!(output.contains("System Shutdown."));
    }
}
