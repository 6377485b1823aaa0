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
use std::ops::ControlFlow;

use tracing::warn;

use crate::{
    error::Result,
    leds::{LedController, ARMS, LEDS_PER_ARM},
};

/// Draws one frame of an effect.
pub type Effect = fn(&mut LedController, u64) -> ControlFlow<()>;

/// The built in effects, by name.
pub const EFFECTS: &[(&str, Effect)] = &[("xmas", xmas), ("rotate", rotate)];

/// Looks up an effect by its exact name.
pub fn get(name: &str) -> Option<Effect> {
    EFFECTS
        .iter()
        .find(|(effect_name, _)| *effect_name == name)
        .map(|(_, effect)| *effect)
}

/// Names of all built in effects.
pub fn names() -> impl Iterator<Item = &'static str> {
    EFFECTS.iter().map(|(name, _)| *name)
}

fn frame_result(name: &str, count: u64, result: Result<()>) -> ControlFlow<()> {
    match result {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => {
            warn!(effect = name, frame = count, err = %e, "Effect failed, stopping.");
            ControlFlow::Break(())
        }
    }
}

/// Two LEDs on opposite ends of each arm, fading as they walk outwards.
pub fn xmas(leds: &mut LedController, count: u64) -> ControlFlow<()> {
    let draw = |leds: &mut LedController| -> Result<()> {
        let step = count % u64::from(LEDS_PER_ARM);
        // 256 wraps to 0 on the first step, so every sixth frame is dark.
        let intensity = (256 / (step + 1) % 256) as u8;

        leds.reset()?;
        for arm in 0..ARMS {
            leds.set_led(arm, ((count + 3) % u64::from(LEDS_PER_ARM)) as u8, intensity)?;
            leds.set_led(arm, step as u8, intensity)?;
        }
        Ok(())
    };

    frame_result("xmas", count, draw(leds))
}

/// Lights one arm at a time, dim at the centre and bright at the tip.
pub fn rotate(leds: &mut LedController, count: u64) -> ControlFlow<()> {
    let draw = |leds: &mut LedController| -> Result<()> {
        let arm = (count % u64::from(ARMS)) as u8;

        leds.reset()?;
        for led in 0..LEDS_PER_ARM {
            leds.set_led(arm, led, 10 / (7 - led))?;
        }
        Ok(())
    };

    frame_result("rotate", count, draw(leds))
}
