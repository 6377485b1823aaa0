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
use crate::error::Result;

mod i2c;
pub mod mock;

pub use i2c::I2cChannel;
pub use mock::MockChannel;

/// The bus address the PiGlow answers on.
pub const BUS_ADDRESS: u16 = 0x54;

/// A byte-oriented link to the PiGlow's register file.
pub trait Channel: std::marker::Send {
    /// Writes a single register as one `[register, value]` transaction.
    fn write_register(&mut self, register: u8, value: u8) -> Result<()>;

    /// Releases the underlying handle. Closing twice is a no-op.
    fn close(&mut self);
}

/// Opens the channel for the given device path. Paths starting with "mock" get a
/// recording mock instead of a real bus.
pub fn open(path: &str) -> Result<Box<dyn Channel>> {
    if path.starts_with("mock") {
        return Ok(Box::new(MockChannel::new(path)));
    }

    Ok(Box::new(I2cChannel::open(path)?))
}
