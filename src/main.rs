use clap::Parser;
use lc3_vm::emulator;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs an LC-3 object file. Program output goes to stdout, keys are read from stdin.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// `.obj` program image starting with its `.ORIG` address
    image: PathBuf,
    /// More log output on stderr, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = TermLogger::init(
        args.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not initialize logging: {e}");
    }

    let mut emu = match emulator::from_program(&args.image) {
        Ok(emu) => emu,
        Err(e) => {
            eprintln!("Error loading {}: {e}", args.image.display());
            return ExitCode::from(2);
        }
    };
    match emu.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Execution faulted: {e}");
            ExitCode::FAILURE
        }
    }
}
