use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, trace};

use crate::error::DecompileError;

/// A single external command, with the search path the child should see.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    search_path: Option<OsString>,
    check: bool,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            search_path: None,
            check: true,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Don't turn a non-zero exit status into an error.
    pub fn unchecked(mut self) -> Self {
        self.check = false;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The command as it would be typed, used in failure messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait Runner {
    /// Run the program to completion and capture its output. Only a failure to
    /// spawn is an error here; exit status is judged by [`execute`].
    fn spawn(&mut self, invocation: &Invocation) -> Result<CommandOutput, DecompileError>;
}

/// Run `invocation`, failing on a non-zero exit unless it was marked unchecked.
pub fn execute<R: Runner + ?Sized>(
    runner: &mut R,
    invocation: &Invocation,
) -> Result<CommandOutput, DecompileError> {
    debug!("running: {}", invocation.command_line());
    let output = runner.spawn(invocation)?;
    trace!("exit: {:?} stdout: {:?}", output.code, output.stdout);

    if invocation.check && !output.success() {
        return Err(DecompileError::CommandFailed {
            command: invocation.command_line(),
            code: output.code,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn spawn(&mut self, invocation: &Invocation) -> Result<CommandOutput, DecompileError> {
        let mut command = Command::new(invocation.program());
        command.args(invocation.args());
        if let Some(search_path) = &invocation.search_path {
            command.env("PATH", search_path);
        }

        let output = command.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DecompileError::CommandNotFound(
                invocation.program().to_string_lossy().into_owned(),
            ),
            _ => DecompileError::IOError(e),
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
