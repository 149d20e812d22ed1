use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

use crate::error::DecompileError;

pub const CANCELLED_MESSAGE: &str = "Operation cancelled by user.";

/// Shared flag raised by the interrupt handler and checked at every prompt.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    waiting: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Called from the signal handler thread. A blocked `read_line` can't
    /// observe the flag, so a prompt that is waiting ends the session here.
    pub fn interrupt(&self) {
        self.cancel();
        if self.waiting.load(Ordering::SeqCst) {
            println!("\n{CANCELLED_MESSAGE}");
            std::process::exit(0);
        }
    }

    fn set_waiting(&self, waiting: bool) {
        self.waiting.store(waiting, Ordering::SeqCst);
    }
}

pub trait Prompter {
    /// Show `question` and read one line. `None` means the user cancelled.
    fn ask(&mut self, question: &str) -> Result<Option<String>, DecompileError>;

    /// Yes/no question; only `y` counts as yes. `None` means cancelled.
    fn confirm(&mut self, question: &str) -> Result<Option<bool>, DecompileError> {
        Ok(self
            .ask(question)?
            .map(|answer| answer.trim().eq_ignore_ascii_case("y")))
    }
}

pub struct ConsolePrompter<R> {
    input: R,
    token: CancellationToken,
}

impl ConsolePrompter<std::io::StdinLock<'static>> {
    pub fn stdin(token: CancellationToken) -> Self {
        Self::new(std::io::stdin().lock(), token)
    }
}

impl<R: BufRead> ConsolePrompter<R> {
    pub fn new(input: R, token: CancellationToken) -> Self {
        Self { input, token }
    }
}

impl<R: BufRead> Prompter for ConsolePrompter<R> {
    fn ask(&mut self, question: &str) -> Result<Option<String>, DecompileError> {
        if self.token.is_cancelled() {
            return Ok(None);
        }

        let mut stdout = std::io::stdout();
        write!(stdout, "{question}").map_err(DecompileError::Prompt)?;
        stdout.flush().map_err(DecompileError::Prompt)?;

        let mut line = String::new();
        self.token.set_waiting(true);
        let read = self.input.read_line(&mut line);
        self.token.set_waiting(false);
        let read = read.map_err(DecompileError::Prompt)?;

        if read == 0 {
            debug!("console input closed");
            return Ok(None);
        }
        if self.token.is_cancelled() {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }
}
