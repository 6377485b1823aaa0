// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{error::Error, path::PathBuf, process::ExitCode, time::Duration};

use clap::{crate_version, Parser};
use piglow::{
    config::Settings,
    effects::{self, Effect},
    PiGlow,
};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Plays lighting effects on a PiGlow."
)]
struct Cli {
    /// The path to a YAML settings file.
    #[arg[short, long]]
    config: Option<PathBuf>,
    /// The I2C bus device the PiGlow is attached to, e.g. /dev/i2c-1. Device names
    /// starting with "mock" run against a simulated board.
    device: String,
    /// The effect to play.
    effect: String,
    /// The time between frames, in milliseconds.
    #[arg[allow_hyphen_values = true]]
    interval: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_status(&e));
        }
    };

    let (effect, interval) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(message) => {
            eprint!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match play(&cli.device, effect, interval).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Help and version requests succeed, anything else clap rejects is a usage error.
fn usage_status(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

/// Resolves the effect and interval, or the message to print before exiting 1.
fn prepare(cli: &Cli) -> Result<(Effect, Duration), String> {
    let Some(effect) = effects::get(&cli.effect) else {
        let mut message = format!("Unknown effect '{}'; valid effects are:\n", cli.effect);
        for name in effects::names() {
            message.push_str(&format!("\t{}\n", name));
        }
        return Err(message);
    };

    let interval = Settings::load(cli.config.as_deref())
        .and_then(|settings| settings.interval_from_arg(cli.interval.as_deref()))
        .map_err(|e| format!("{}\n", e))?;

    Ok((effect, interval))
}

/// Plays the effect until we're interrupted. An effect that stops by itself leaves the
/// board idle. The board is turned off on the way out.
async fn play(device: &str, effect: Effect, interval: Duration) -> Result<(), Box<dyn Error>> {
    let glow = PiGlow::open(device)?;
    let mut terminate = signal(SignalKind::terminate())?;

    glow.animate(interval, effect)?;
    info!(interval = ?interval, "Animation started.");
    println!("Press Ctrl-C to quit");

    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => {}
    }

    glow.close();
    Ok(())
}
