use anyhow::Context;
use clap::Parser;
use log::debug;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::dispatch::{Outcome, Session};
use crate::error::DecompileError;
use crate::prompt::{CancellationToken, ConsolePrompter, CANCELLED_MESSAGE};
use crate::runner::SystemRunner;
use crate::settings::Settings;
use crate::toolchain::Toolchain;

mod console;
mod dispatch;
mod error;
mod input;
mod prompt;
mod runner;
mod settings;
#[cfg(test)]
mod testing;
mod toolchain;

/// Decompile .NET assemblies with ilspycmd, one output folder per file.
#[derive(Debug, Parser)]
struct Cli {
    /// .NET SDK executable
    #[arg(long, default_value = settings::DEFAULT_SDK)]
    sdk: String,
    /// decompiler executable
    #[arg(long, default_value = settings::DEFAULT_DECOMPILER)]
    decompiler: String,
    /// NuGet package installed when the decompiler is missing
    #[arg(long, default_value = settings::DEFAULT_PACKAGE)]
    package: String,
    /// directory holding global dotnet tools [default: ~/.dotnet/tools]
    #[arg(long)]
    tools_dir: Option<PathBuf>,
    /// more logging; repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            sdk: cli.sdk,
            decompiler: cli.decompiler,
            package: cli.package,
            tools_dir: cli.tools_dir.or_else(settings::default_tools_dir),
            ..Settings::default()
        }
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let token = CancellationToken::new();
    if let Err(e) = install_interrupt_handler(&token) {
        console::error(format!("{e:#}"));
        return ExitCode::FAILURE;
    }

    debug!("user: {:?}", std::env::var_os("USER"));
    let settings = Settings::from(args);

    let result = run(&settings, &token);
    ExitCode::from(exit_status(result, token.is_cancelled()))
}

/// Report how the session ended and pick the process status.
fn exit_status(result: Result<Outcome, DecompileError>, interrupted: bool) -> u8 {
    match result {
        Ok(Outcome::Decompiled(count)) => {
            debug!("decompiled {count} file(s)");
            0
        }
        Ok(Outcome::Declined) => 0,
        Ok(Outcome::Cancelled) => {
            println!("\n{CANCELLED_MESSAGE}");
            0
        }
        Err(e) if interrupted => {
            debug!("interrupted: {e}");
            println!("\n{CANCELLED_MESSAGE}");
            0
        }
        Err(e) => {
            console::error(&e);
            if let Some(details) = e.details() {
                console::error(details);
            }
            e.exit_code()
        }
    }
}

fn install_interrupt_handler(token: &CancellationToken) -> anyhow::Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || token.interrupt()).context("failed to set Ctrl+C handler")
}

fn run(settings: &Settings, token: &CancellationToken) -> Result<Outcome, DecompileError> {
    let mut runner = SystemRunner;
    let path = std::env::var_os("PATH").unwrap_or_default();
    let toolchain = Toolchain::prepare(settings, path, &mut runner)?;

    let mut prompter = ConsolePrompter::stdin(token.clone());
    Session::new(
        &toolchain,
        &settings.extension,
        &mut runner,
        &mut prompter,
        token.clone(),
    )
    .run()
}
