//! Headless reference host for the FerroNES core.
//!
//! Loads an iNES image and drives the frame loop without a window:
//! presentation, audio output and input delivery belong to a real
//! front-end. This host exists to exercise the core from the command
//! line: scripted runs with `--frames`, CPU validation with `--trace`.

use clap::Parser;
use ferrones_core::Console;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ferrones", version, about = "Headless NES emulator core host")]
struct Args {
    /// Path to the iNES ROM image to run.
    rom: PathBuf,

    /// Print one nestest-format trace line per instruction.
    #[arg(long)]
    trace: bool,

    /// Stop after this many frames; 0 runs until interrupted.
    #[arg(long, default_value_t = 0)]
    frames: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ferrones: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let rom = std::fs::read(&args.rom)
        .map_err(|error| format!("cannot read {}: {error}", args.rom.display()))?;
    let mut console = Console::load(&rom)?;
    log::info!("running {}", args.rom.display());

    let mut frames: u64 = 0;
    while args.frames == 0 || frames < args.frames {
        if args.trace {
            if let Some(line) = console.trace_next() {
                println!("{line}");
            }
            console.step()?;
            if console.bus_mut().ppu.take_frame_complete() {
                frames += 1;
            }
        } else {
            console.step_frame()?;
            frames += 1;
        }
    }

    log::info!("stopped after {frames} frames ({} CPU cycles)", console.cycles());
    Ok(())
}
