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
//! Host side driver for the PiGlow, an 18 LED board (three arms of six) driven by an
//! SN3218 over I2C.
//!
//! ```no_run
//! use std::{ops::ControlFlow, time::Duration};
//!
//! # async fn demo() -> Result<(), piglow::Error> {
//! let glow = piglow::PiGlow::open("/dev/i2c-1")?;
//! glow.set_led(0, 0, 64)?;
//! glow.commit()?;
//!
//! glow.animate(Duration::from_millis(100), |leds, frame| {
//!     let _ = leds.set_led((frame % 3) as u8, 5, 32);
//!     ControlFlow::Continue(())
//! })?;
//! # Ok(())
//! # }
//! ```
pub mod animation;
pub mod channel;
pub mod config;
pub mod effects;
mod error;
pub mod glow;
pub mod leds;

pub use error::{Error, Result};
pub use glow::PiGlow;
