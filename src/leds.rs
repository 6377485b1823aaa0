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
use tracing::{debug, warn};

use crate::{
    channel::Channel,
    error::{Error, Result},
};

/// Number of arms on the board.
pub const ARMS: u8 = 3;

/// Number of LEDs on each arm.
pub const LEDS_PER_ARM: u8 = 6;

/// SN3218 register addresses.
pub mod register {
    /// Shutdown register. Writing 0x01 enables the chip.
    pub const ENABLE: u8 = 0x00;
    /// LED enable masks, one byte per group of six intensity registers.
    pub const ENABLE_LEDS: [u8; 3] = [0x13, 0x14, 0x15];
    /// Latches intensities and enable masks onto the outputs.
    pub const UPDATE: u8 = 0x16;
    /// Soft reset.
    pub const RESET: u8 = 0x17;
}

/// Intensity register for each arm, ordered red, orange, yellow, green, blue, white.
/// Logical LED 0 is the white LED nearest the centre, so lookups go through column
/// `5 - led`.
const LED_REGISTERS: [[u8; LEDS_PER_ARM as usize]; ARMS as usize] = [
    // bottom
    [0x01, 0x02, 0x03, 0x04, 0x0f, 0x0d],
    // top
    [0x07, 0x08, 0x09, 0x06, 0x05, 0x0a],
    // right
    [0x12, 0x11, 0x10, 0x0e, 0x0c, 0x0b],
];

/// Gets the intensity register for the given arm and LED.
pub fn led_register(arm: u8, led: u8) -> Result<u8> {
    if arm >= ARMS || led >= LEDS_PER_ARM {
        return Err(Error::InvalidLed { arm, led });
    }

    Ok(LED_REGISTERS[arm as usize][(LEDS_PER_ARM - 1 - led) as usize])
}

/// Host side copy of the three LED enable registers. The device is never read back,
/// so this has to track every intensity write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnableMask([u8; 3]);

impl EnableMask {
    /// Sets or clears the enable bit belonging to an intensity register (0x01..=0x12).
    fn update(&mut self, register: u8, on: bool) {
        let index = register - 1;
        let byte = &mut self.0[(index / 6) as usize];
        let bit = 1 << (index % 6);
        if on {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }

    /// Returns true if the enable bit for the given intensity register is set. Registers
    /// outside 0x01..=0x12 have no enable bit.
    pub fn is_enabled(&self, register: u8) -> bool {
        let Some(index) = register.checked_sub(1).filter(|index| *index < 18) else {
            return false;
        };
        self.0[(index / 6) as usize] & (1 << (index % 6)) != 0
    }

    /// The raw mask bytes, in register order.
    pub fn bytes(&self) -> [u8; 3] {
        self.0
    }
}

/// Controls the LEDs through a device channel. Intensity writes go straight to the
/// device but only become visible on [`LedController::commit`].
pub struct LedController {
    channel: Box<dyn Channel>,
    enabled: EnableMask,
    closed: bool,
}

impl LedController {
    /// Takes ownership of the channel and resets the device.
    pub fn new(channel: Box<dyn Channel>) -> Result<LedController> {
        let mut controller = LedController {
            channel,
            enabled: EnableMask::default(),
            closed: false,
        };
        controller.reset()?;

        Ok(controller)
    }

    /// Resets the device to all-off and re-enables it. The enable mask is only cleared
    /// if both writes succeed.
    pub fn reset(&mut self) -> Result<()> {
        self.channel.write_register(register::RESET, 0x01)?;
        self.channel.write_register(register::ENABLE, 0x01)?;
        self.enabled = EnableMask::default();

        Ok(())
    }

    /// Sets the intensity of a single LED. `led` counts from 0 at the centre to 5 at
    /// the tip of the arm. An intensity of 0 turns the LED off.
    pub fn set_led(&mut self, arm: u8, led: u8, intensity: u8) -> Result<()> {
        let register = led_register(arm, led)?;

        self.channel.write_register(register, intensity)?;
        self.enabled.update(register, intensity != 0);

        Ok(())
    }

    /// Pushes the enable masks and latches everything written since the last commit.
    pub fn commit(&mut self) -> Result<()> {
        for (register, byte) in register::ENABLE_LEDS.iter().zip(self.enabled.bytes()) {
            self.channel.write_register(*register, byte)?;
        }
        self.channel.write_register(register::UPDATE, 0x01)?;

        Ok(())
    }

    /// Gets the current enable mask.
    pub fn enable_mask(&self) -> EnableMask {
        self.enabled
    }

    /// Turns the device off and releases the channel. Errors are logged, not returned.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.reset() {
            warn!(err = %e, "Unable to reset the device before closing it.");
        }
        self.channel.close();
        debug!("LED controller closed.");
    }
}

impl Drop for LedController {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::channel::MockChannel;

    fn create_controller() -> (LedController, MockChannel) {
        let mock = MockChannel::new("mock");
        let controller = LedController::new(Box::new(mock.clone())).unwrap();
        mock.clear();
        (controller, mock)
    }

    #[test]
    fn test_led_register_table() {
        // Logical LED 0 is the white one at the end of each table row.
        assert_eq!(led_register(0, 0).unwrap(), 0x0d);
        assert_eq!(led_register(0, 1).unwrap(), 0x0f);
        assert_eq!(led_register(0, 5).unwrap(), 0x01);
        assert_eq!(led_register(1, 0).unwrap(), 0x0a);
        assert_eq!(led_register(1, 5).unwrap(), 0x07);
        assert_eq!(led_register(2, 0).unwrap(), 0x0b);
        assert_eq!(led_register(2, 5).unwrap(), 0x12);
    }

    #[test]
    fn test_led_registers_cover_all_channels() {
        let mut registers: Vec<u8> = (0..ARMS)
            .flat_map(|arm| {
                (0..LEDS_PER_ARM).map(move |led| led_register(arm, led).unwrap())
            })
            .collect();
        registers.sort();
        assert_eq!(registers, (0x01..=0x12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_new_resets_device() {
        let mock = MockChannel::new("mock");
        let controller = LedController::new(Box::new(mock.clone())).unwrap();

        assert_eq!(mock.writes(), vec![(0x17, 0x01), (0x00, 0x01)]);
        assert_eq!(controller.enable_mask().bytes(), [0, 0, 0]);
    }

    #[test]
    fn test_new_fails_when_reset_fails() {
        let mock = MockChannel::new("mock");
        mock.set_failing(true);

        assert!(LedController::new(Box::new(mock.clone())).is_err());
        assert!(mock.is_closed());
    }

    #[test]
    fn test_end_to_end_write_sequence() {
        let (mut controller, mock) = create_controller();

        controller.reset().unwrap();
        controller.set_led(0, 0, 100).unwrap();
        controller.set_led(0, 1, 0).unwrap();
        controller.commit().unwrap();

        assert_eq!(
            mock.writes(),
            vec![
                (0x17, 0x01),
                (0x00, 0x01),
                (0x0d, 100),
                (0x0f, 0),
                (0x13, 0x00),
                (0x14, 0x00),
                (0x15, 0x01),
                (0x16, 0x01),
            ]
        );
    }

    #[test]
    fn test_intensity_sets_enable_bit() {
        let (mut controller, _mock) = create_controller();

        for arm in 0..ARMS {
            for led in 0..LEDS_PER_ARM {
                let register = led_register(arm, led).unwrap();
                for intensity in [1, 2, 127, 128, 255] {
                    controller.set_led(arm, led, intensity).unwrap();
                    assert!(controller.enable_mask().is_enabled(register));
                }
                controller.set_led(arm, led, 0).unwrap();
                assert!(!controller.enable_mask().is_enabled(register));
            }
        }
    }

    #[test]
    fn test_zero_clears_only_its_own_bit() {
        let (mut controller, mock) = create_controller();

        for arm in 0..ARMS {
            for led in 0..LEDS_PER_ARM {
                controller.set_led(arm, led, 255).unwrap();
            }
        }
        assert_eq!(controller.enable_mask().bytes(), [0x3f, 0x3f, 0x3f]);

        for arm in 0..ARMS {
            for led in 0..LEDS_PER_ARM {
                let register = led_register(arm, led).unwrap();
                let group = ((register - 1) / 6) as usize;
                let before = controller.enable_mask().bytes();

                controller.set_led(arm, led, 0).unwrap();
                mock.clear();
                controller.commit().unwrap();

                let after = controller.enable_mask().bytes();
                assert_eq!(after[group], before[group] & !(1 << ((register - 1) % 6)));
                for other in (0..3).filter(|other| *other != group) {
                    assert_eq!(after[other], before[other]);
                }
                assert_eq!(mock.writes()[group], (register::ENABLE_LEDS[group], after[group]));

                controller.set_led(arm, led, 255).unwrap();
            }
        }
    }

    #[test]
    fn test_enable_bit_outside_intensity_registers() {
        let (mut controller, _mock) = create_controller();

        for arm in 0..ARMS {
            for led in 0..LEDS_PER_ARM {
                controller.set_led(arm, led, 255).unwrap();
            }
        }

        let mask = controller.enable_mask();
        assert!(mask.is_enabled(0x01));
        assert!(mask.is_enabled(0x12));
        for register in [0x00, 0x13, 0x16, 0xff] {
            assert!(!mask.is_enabled(register));
            assert!(!EnableMask::default().is_enabled(register));
        }
    }

    #[test]
    fn test_invalid_led_performs_no_writes() {
        let (mut controller, mock) = create_controller();

        assert!(matches!(
            controller.set_led(3, 0, 10),
            Err(Error::InvalidLed { arm: 3, led: 0 })
        ));
        assert!(matches!(
            controller.set_led(0, 6, 10),
            Err(Error::InvalidLed { arm: 0, led: 6 })
        ));
        assert!(matches!(
            controller.set_led(255, 255, 10),
            Err(Error::InvalidLed { .. })
        ));
        assert_eq!(mock.write_count(), 0);
        assert_eq!(controller.enable_mask().bytes(), [0, 0, 0]);
    }

    #[test]
    fn test_reset_clears_mask() {
        let (mut controller, _mock) = create_controller();

        controller.set_led(1, 2, 50).unwrap();
        controller.set_led(2, 4, 50).unwrap();
        assert_ne!(controller.enable_mask().bytes(), [0, 0, 0]);

        controller.reset().unwrap();
        assert_eq!(controller.enable_mask().bytes(), [0, 0, 0]);
    }

    #[test]
    fn test_failed_reset_keeps_mask() {
        let (mut controller, mock) = create_controller();

        controller.set_led(1, 2, 50).unwrap();
        let before = controller.enable_mask();

        mock.set_failing(true);
        assert!(controller.reset().is_err());
        assert_eq!(controller.enable_mask(), before);
    }

    #[test]
    fn test_failed_write_keeps_mask() {
        let (mut controller, mock) = create_controller();

        mock.set_failing(true);
        assert!(controller.set_led(0, 0, 10).is_err());
        assert_eq!(controller.enable_mask().bytes(), [0, 0, 0]);
    }

    #[test]
    fn test_commit_without_changes() {
        let (mut controller, mock) = create_controller();

        controller.commit().unwrap();
        controller.commit().unwrap();

        let commit: Vec<(u8, u8)> = vec![(0x13, 0), (0x14, 0), (0x15, 0), (0x16, 1)];
        assert_eq!(mock.writes(), [commit.clone(), commit].concat());
    }

    #[test]
    fn test_commit_stops_on_failure() {
        let (mut controller, mock) = create_controller();

        mock.set_failing(true);
        assert!(matches!(
            controller.commit(),
            Err(Error::Write { register: 0x13, .. })
        ));
        assert_eq!(mock.write_count(), 0);
    }

    #[test]
    fn test_close_resets_and_releases() {
        let (mut controller, mock) = create_controller();

        controller.set_led(0, 0, 10).unwrap();
        mock.clear();

        controller.close();
        assert_eq!(mock.writes(), vec![(0x17, 0x01), (0x00, 0x01)]);
        assert!(mock.is_closed());

        // Closing again and dropping doesn't touch the device.
        controller.close();
        drop(controller);
        assert_eq!(mock.write_count(), 2);
    }

    #[test]
    fn test_drop_ignores_reset_failure() {
        let (controller, mock) = create_controller();

        mock.set_failing(true);
        drop(controller);
        assert!(mock.is_closed());
    }
}
