use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DecompileError {
    #[error("Command not found: '{0}'. Please ensure it's in your PATH.")]
    CommandNotFound(String),
    #[error("Command failed with exit code {}: '{command}'", display_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error(".NET SDK not found. Please install it to continue.")]
    SdkNotFound,
    #[error("The path '{}' is not a valid file or directory. Please try again.", .0.display())]
    InvalidPath(PathBuf),
    #[error("The selected file '{}' is not a .dll file. Please try again.", .0.display())]
    NotADll(PathBuf),
    #[error("No .dll files found in '{}'.", .0.display())]
    NoMatchingFiles(PathBuf),
    #[error("failed to read from the console: {0}")]
    Prompt(#[source] std::io::Error),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl DecompileError {
    /// Process status to exit with once this error reaches `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            DecompileError::CommandFailed {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }

    /// Lines reported after the headline message, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            DecompileError::CommandFailed { stderr, .. } => {
                Some(format!("Stderr: {}", stderr.trim()))
            }
            _ => None,
        }
    }
}
