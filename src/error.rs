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

use nix::errno::Errno;

/// Errors raised while talking to the PiGlow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to select I2C address on {path}: {source}")]
    AddressSelect { path: String, source: Errno },

    #[error("Failed to write register {register:#04x}: {source}")]
    Write {
        register: u8,
        source: std::io::Error,
    },

    #[error("Short write to register {register:#04x}: {written} of 2 bytes")]
    ShortWrite { register: u8, written: usize },

    #[error("Device channel is closed")]
    Closed,

    #[error("No LED at arm {arm}, led {led}")]
    InvalidLed { arm: u8, led: u8 },

    #[error("Animation interval must be greater than zero")]
    InvalidInterval,

    #[error("An animation is already running")]
    AlreadyRunning,

    #[error("Animations need a running tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, Error>;
