use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use log::debug;

use crate::console;
use crate::error::DecompileError;
use crate::input;
use crate::prompt::{CancellationToken, Prompter};
use crate::runner::{execute, Invocation, Runner};
use crate::toolchain::Toolchain;

pub const FOLDER_QUESTION: &str =
    "Did you mean to select a folder to decompile all .dll files within it? (y/n): ";
pub const BATCH_QUESTION: &str = "Do you want to decompile all of them? (y/n): ";

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    File(PathBuf),
    Directory(PathBuf),
    Neither(PathBuf),
}

impl Target {
    pub fn classify(path: PathBuf) -> Self {
        if path.is_dir() {
            Target::Directory(path)
        } else if path.is_file() {
            Target::File(path)
        } else {
            Target::Neither(path)
        }
    }
}

/// How a session ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Number of files handed to the decompiler.
    Decompiled(usize),
    Declined,
    Cancelled,
}

pub struct Session<'a, R: ?Sized, P: ?Sized> {
    toolchain: &'a Toolchain,
    extension: &'a str,
    runner: &'a mut R,
    prompter: &'a mut P,
    token: CancellationToken,
}

impl<'a, R: Runner + ?Sized, P: Prompter + ?Sized> Session<'a, R, P> {
    pub fn new(
        toolchain: &'a Toolchain,
        extension: &'a str,
        runner: &'a mut R,
        prompter: &'a mut P,
        token: CancellationToken,
    ) -> Self {
        Self {
            toolchain,
            extension,
            runner,
            prompter,
            token,
        }
    }

    /// Prompt until a usable path is given, then decompile it.
    pub fn run(&mut self) -> Result<Outcome, DecompileError> {
        loop {
            let Some(request) = input::collect(&mut *self.prompter)? else {
                return Ok(Outcome::Cancelled);
            };

            match Target::classify(request.source) {
                Target::Directory(dir) => return self.decompile_directory(&dir, &request.output),
                Target::File(file) if has_extension(file.as_os_str(), self.extension) => {
                    if self.token.is_cancelled() {
                        return Ok(Outcome::Cancelled);
                    }
                    self.decompile(&file, &request.output)?;
                    return Ok(Outcome::Decompiled(1));
                }
                Target::File(file) => console::error(DecompileError::NotADll(file)),
                Target::Neither(path) => console::error(DecompileError::InvalidPath(path)),
            }
        }
    }

    fn decompile_directory(
        &mut self,
        dir: &Path,
        output: &Path,
    ) -> Result<Outcome, DecompileError> {
        console::info(format!("The path '{}' is a directory.", dir.display()));
        match self.prompter.confirm(FOLDER_QUESTION)? {
            None => return Ok(Outcome::Cancelled),
            Some(false) => {
                console::info(
                    "Operation cancelled. Please re-run the script with a valid file path.",
                );
                return Ok(Outcome::Declined);
            }
            Some(true) => {}
        }

        let names = find_matching(dir, self.extension)?;
        if names.is_empty() {
            return Err(DecompileError::NoMatchingFiles(dir.to_path_buf()));
        }

        console::info("Found the following .dll files:");
        for name in &names {
            console::item(Path::new(name).display());
        }

        match self.prompter.confirm(BATCH_QUESTION)? {
            None => return Ok(Outcome::Cancelled),
            Some(false) => {
                console::info(
                    "Operation cancelled. You can re-run the script to select a different path.",
                );
                return Ok(Outcome::Declined);
            }
            Some(true) => {}
        }

        for name in &names {
            if self.token.is_cancelled() {
                debug!("interrupted before {}", Path::new(name).display());
                return Ok(Outcome::Cancelled);
            }
            self.decompile(&dir.join(name), &output_folder(output, name))?;
        }
        console::info("All selected .dll files have been decompiled successfully.");

        Ok(Outcome::Decompiled(names.len()))
    }

    fn decompile(&mut self, dll: &Path, output: &Path) -> Result<(), DecompileError> {
        console::info(format!(
            "Decompiling '{}' to '{}'...",
            dll.display(),
            output.display()
        ));
        execute(
            &mut *self.runner,
            &Invocation::new(&self.toolchain.decompiler)
                .arg("-p")
                .arg(dll)
                .arg("-o")
                .arg(output)
                .search_path(&self.toolchain.search_path),
        )?;
        console::info("Decompilation complete!");

        let saved = std::path::absolute(output).unwrap_or_else(|_| output.to_path_buf());
        console::info(format!("Output saved to: {}", saved.display()));
        Ok(())
    }
}

/// Suffix match on the raw name, so non-UTF-8 names still qualify.
fn has_extension(name: &OsStr, extension: &str) -> bool {
    name.as_encoded_bytes().ends_with(extension.as_bytes())
}

/// Names of the immediate children of `dir` ending in `extension`, sorted.
pub fn find_matching(dir: &Path, extension: &str) -> Result<Vec<OsString>, DecompileError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name();
        if has_extension(&name, extension) {
            names.push(name);
        }
    }
    names.sort();
    debug!("{} matching entries in {}", names.len(), dir.display());

    Ok(names)
}

/// Per-file output folder: `output/<name without its extension>`.
pub fn output_folder(output: &Path, name: &OsStr) -> PathBuf {
    let stem = Path::new(name).file_stem().unwrap_or(name);
    output.join(stem)
}
