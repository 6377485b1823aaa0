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
use std::{ops::ControlFlow, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tracing::info;

use crate::{
    animation::Animator,
    channel::{self, Channel},
    error::Result,
    leds::{EnableMask, LedController},
};

/// A PiGlow board. Owns the device channel, the LED state and at most one running
/// animation. Dropping it stops the animation and leaves the board dark.
pub struct PiGlow {
    leds: Arc<Mutex<LedController>>,
    animator: Animator,
}

impl PiGlow {
    /// Opens the board on the given I2C bus device and resets it.
    pub fn open(path: &str) -> Result<PiGlow> {
        let glow = PiGlow::with_channel(channel::open(path)?)?;
        info!(device = path, "PiGlow ready.");
        Ok(glow)
    }

    /// Creates a board on top of an already open channel and resets it.
    pub fn with_channel(channel: Box<dyn Channel>) -> Result<PiGlow> {
        let leds = Arc::new(Mutex::new(LedController::new(channel)?));
        Ok(PiGlow {
            animator: Animator::new(leds.clone()),
            leds,
        })
    }

    /// Resets all LEDs to off.
    pub fn reset(&self) -> Result<()> {
        self.leds.lock().reset()
    }

    /// Sets an LED. Takes effect on the next [`PiGlow::commit`].
    pub fn set_led(&self, arm: u8, led: u8, intensity: u8) -> Result<()> {
        self.leds.lock().set_led(arm, led, intensity)
    }

    /// Makes all pending LED changes visible.
    pub fn commit(&self) -> Result<()> {
        self.leds.lock().commit()
    }

    /// Gets the current enable mask.
    pub fn enable_mask(&self) -> EnableMask {
        self.leds.lock().enable_mask()
    }

    /// Plays an animation, committing after every frame. See [`Animator::start`].
    pub fn animate<F>(&self, interval: Duration, frame: F) -> Result<()>
    where
        F: FnMut(&mut LedController, u64) -> ControlFlow<()> + Send + 'static,
    {
        self.animator.start(interval, frame)
    }

    /// Stops the current animation, if there is one.
    pub fn stop(&self) {
        self.animator.stop();
    }

    /// Returns true while an animation is playing.
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Stops any animation, turns the LEDs off and releases the device.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for PiGlow {
    fn drop(&mut self) {
        self.animator.stop();
        // An aborted animation task can still hold a reference to the controller.
        self.leds.lock().close();
        info!("PiGlow closed.");
    }
}
