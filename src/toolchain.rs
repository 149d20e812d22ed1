use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use log::debug;

use crate::console;
use crate::error::DecompileError;
use crate::runner::{execute, Invocation, Runner};
use crate::settings::Settings;

/// Resolved tool locations, and the search path every child process gets.
#[derive(Debug, Clone, PartialEq)]
pub struct Toolchain {
    pub sdk: PathBuf,
    pub decompiler: PathBuf,
    pub search_path: OsString,
}

impl Toolchain {
    /// Probe for the SDK and decompiler, installing the decompiler if needed.
    pub fn prepare<R: Runner + ?Sized>(
        settings: &Settings,
        inherited_path: OsString,
        runner: &mut R,
    ) -> Result<Self, DecompileError> {
        let cwd = std::env::current_dir()?;

        console::info("Checking for .NET SDK...");
        let sdk = which::which_in(&settings.sdk, Some(&inherited_path), &cwd)
            .map_err(|e| {
                debug!("{} not resolvable: {e}", settings.sdk);
                DecompileError::SdkNotFound
            })?;
        debug!("sdk: {}", sdk.display());

        let output = execute(
            runner,
            &Invocation::new(&sdk)
                .arg("--version")
                .search_path(&inherited_path),
        )?;
        console::info(format!(
            ".NET SDK found: Version {}",
            output.stdout.trim()
        ));

        console::info("Ensuring .dotnet/tools is in PATH...");
        let search_path = match &settings.tools_dir {
            Some(tools_dir) => with_tools_dir(&inherited_path, tools_dir)?,
            None => {
                debug!("no home directory; leaving the search path as is");
                inherited_path
            }
        };

        let mut toolchain = Toolchain {
            sdk,
            decompiler: PathBuf::from(&settings.decompiler),
            search_path,
        };

        console::info(format!("Checking for {}...", settings.decompiler));
        match toolchain.probe_decompiler(settings, runner, &cwd)? {
            Some(version) => {
                console::info(format!(
                    "{} is already installed: Version {}",
                    settings.decompiler, version
                ));
            }
            None => toolchain.install_decompiler(settings, runner, &cwd)?,
        }

        Ok(toolchain)
    }

    /// The decompiler's version, or `None` if it can't be found or run.
    fn probe_decompiler<R: Runner + ?Sized>(
        &mut self,
        settings: &Settings,
        runner: &mut R,
        cwd: &Path,
    ) -> Result<Option<String>, DecompileError> {
        let Some(decompiler) = self.resolve(&settings.decompiler, cwd) else {
            return Ok(None);
        };

        let invocation = Invocation::new(&decompiler)
            .arg("--version")
            .search_path(&self.search_path)
            .unchecked();
        let output = match execute(runner, &invocation) {
            Ok(output) => output,
            Err(DecompileError::CommandNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        if !output.success() {
            debug!("{} --version exited with {:?}", decompiler.display(), output.code);
            return Ok(None);
        }

        self.decompiler = decompiler;
        Ok(Some(output.stdout.trim().to_string()))
    }

    fn install_decompiler<R: Runner + ?Sized>(
        &mut self,
        settings: &Settings,
        runner: &mut R,
        cwd: &Path,
    ) -> Result<(), DecompileError> {
        console::info(format!(
            "{} not found. Attempting to install it globally...",
            settings.decompiler
        ));
        execute(
            runner,
            &Invocation::new(&self.sdk)
                .arg("tool")
                .arg("install")
                .arg("--global")
                .arg(&settings.package)
                .search_path(&self.search_path),
        )?;
        console::info(format!("{} installed successfully.", settings.decompiler));

        self.decompiler = self
            .resolve(&settings.decompiler, cwd)
            .or_else(|| {
                settings
                    .tools_dir
                    .as_ref()
                    .map(|dir| dir.join(&settings.decompiler))
            })
            .unwrap_or_else(|| PathBuf::from(&settings.decompiler));
        debug!("decompiler: {}", self.decompiler.display());

        Ok(())
    }

    fn resolve(&self, program: &str, cwd: &Path) -> Option<PathBuf> {
        which::which_in(program, Some(&self.search_path), cwd)
            .map_err(|e| debug!("{program} not resolvable: {e}"))
            .ok()
    }
}

/// Append `tools_dir` to `search_path` unless it is already listed.
pub fn with_tools_dir(search_path: &OsStr, tools_dir: &Path) -> Result<OsString, DecompileError> {
    let mut dirs: Vec<PathBuf> = std::env::split_paths(search_path).collect();
    if dirs.iter().any(|dir| dir == tools_dir) {
        return Ok(search_path.to_os_string());
    }

    console::info(format!(
        "Temporarily adding {} to PATH.",
        tools_dir.display()
    ));
    dirs.push(tools_dir.to_path_buf());
    std::env::join_paths(dirs).map_err(|e| {
        DecompileError::IOError(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })
}
