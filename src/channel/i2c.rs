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
use std::{
    fs::{File, OpenOptions},
    io::Write,
    os::fd::AsRawFd,
};

use nix::libc::c_int;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::BUS_ADDRESS;

// I2C_SLAVE from linux/i2c-dev.h.
nix::ioctl_write_int_bad!(i2c_slave, 0x0703);

/// A channel backed by a Linux i2c-dev character device.
pub struct I2cChannel {
    path: String,
    file: Option<File>,
}

impl I2cChannel {
    /// Opens the bus node read-write and points it at the PiGlow's address.
    pub fn open(path: &str) -> Result<I2cChannel> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::Open {
                path: path.to_string(),
                source,
            })?;

        // Safety: the descriptor belongs to `file`, which outlives the call.
        unsafe { i2c_slave(file.as_raw_fd(), BUS_ADDRESS as c_int) }.map_err(|source| {
            Error::AddressSelect {
                path: path.to_string(),
                source,
            }
        })?;

        info!(path, address = BUS_ADDRESS, "Opened I2C device.");
        Ok(I2cChannel {
            path: path.to_string(),
            file: Some(file),
        })
    }
}

impl super::Channel for I2cChannel {
    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        let file = self.file.as_mut().ok_or(Error::Closed)?;

        match file.write(&[register, value]) {
            Ok(2) => Ok(()),
            Ok(written) => Err(Error::ShortWrite { register, written }),
            Err(source) => Err(Error::Write { register, source }),
        }
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(path = self.path, "Closed I2C device.");
        }
    }
}

impl Drop for I2cChannel {
    fn drop(&mut self) {
        super::Channel::close(self);
    }
}
