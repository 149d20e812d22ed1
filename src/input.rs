use std::path::{Path, PathBuf};

use crate::error::DecompileError;
use crate::prompt::Prompter;

pub const SOURCE_PROMPT: &str = "Enter the path to the .dll file or a folder: ";
pub const OUTPUT_PROMPT: &str = "Enter the output folder path: ";

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Ask for the source path and output folder. `None` if the user cancelled
/// at either prompt.
pub fn collect<P: Prompter + ?Sized>(prompter: &mut P) -> Result<Option<Request>, DecompileError> {
    let Some(source) = prompter.ask(SOURCE_PROMPT)? else {
        return Ok(None);
    };
    let Some(output) = prompter.ask(OUTPUT_PROMPT)? else {
        return Ok(None);
    };

    let home = home_dir();
    Ok(Some(Request {
        source: clean_path(&source, home.as_deref()),
        output: clean_path(&output, home.as_deref()),
    }))
}

/// Drop surrounding whitespace and quotes, then expand a leading `~`.
pub fn clean_path(raw: &str, home: Option<&Path>) -> PathBuf {
    let unquoted = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    expand_home(unquoted, home)
}

pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    match path.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) if rest.starts_with(std::path::is_separator) => {
            home.join(rest.trim_start_matches(std::path::is_separator))
        }
        _ => PathBuf::from(path),
    }
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
