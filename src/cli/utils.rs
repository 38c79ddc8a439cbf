use anyhow::{Context, Result};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Line-oriented console used by the session.
///
/// `read_line` returns `Ok(None)` once input is exhausted.
#[cfg_attr(test, mockall::automock)]
pub trait Terminal {
    /// Print a prompt (without a newline) and read one trimmed line
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Print one line of output
    fn print_line(&mut self, line: &str) -> Result<()>;
}

/// A [`Terminal`] over any reader and writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect what a scripted session printed
    pub fn into_output(self) -> W {
        self.output
    }
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console bound to the process stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal for Console<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;

        let mut input = String::new();
        let read = self.input.read_line(&mut input).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }

        // Trim whitespace and newlines
        Ok(Some(input.trim().to_string()))
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line).context("Failed to write output")
    }
}

/// Print a section header such as `--- Withdraw Money ---`
pub fn print_header(terminal: &mut dyn Terminal, title: &str) -> Result<()> {
    terminal.print_line(&format!("\n--- {} ---", title))
}

/// Print an error message
pub fn print_error(terminal: &mut dyn Terminal, message: &str) -> Result<()> {
    terminal.print_line(&format!("Error: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_trims_and_echoes_prompt() {
        let mut console = Console::new(Cursor::new("  12345 \r\nsecond\n"), Vec::new());

        assert_eq!(console.read_line("ID: ").unwrap(), Some("12345".to_string()));
        assert_eq!(console.read_line("Next: ").unwrap(), Some("second".to_string()));
        assert_eq!(console.read_line("More: ").unwrap(), None);

        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "ID: Next: More: ");
    }

    #[test]
    fn test_blank_line_is_not_end_of_input() {
        let mut console = Console::new(Cursor::new("\n"), Vec::new());
        assert_eq!(console.read_line("").unwrap(), Some(String::new()));
    }

    #[test]
    fn test_header_and_error_formatting() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        print_header(&mut console, "Deposit Money").unwrap();
        print_error(&mut console, "Target Account ID not found.").unwrap();

        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "\n--- Deposit Money ---\nError: Target Account ID not found.\n");
    }
}
