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
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Default)]
struct State {
    writes: Vec<(u8, u8)>,
    failing: bool,
    closed: bool,
}

/// A mock channel. Doesn't talk to any hardware, but remembers every register write.
/// Clones share the same recording, so a test can keep a clone while the controller
/// owns the other.
#[derive(Clone)]
pub struct MockChannel {
    name: String,
    state: Arc<Mutex<State>>,
}

impl MockChannel {
    /// Creates a new mock channel.
    pub fn new(name: &str) -> MockChannel {
        MockChannel {
            name: name.to_string(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Gets every (register, value) pair written so far, oldest first.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state.lock().writes.clone()
    }

    /// Gets the number of successful writes.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }

    /// Forgets all recorded writes.
    pub fn clear(&self) {
        self.state.lock().writes.clear();
    }

    /// While failing, every write returns an error and nothing is recorded.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    /// Returns true once the channel has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl super::Channel for MockChannel {
    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::Closed);
        }
        if state.failing {
            return Err(Error::Write {
                register,
                source: std::io::Error::other("mock channel failure"),
            });
        }

        debug!(
            device = self.name,
            register = format!("{:#04x}", register),
            value,
            "Mock register write."
        );
        state.writes.push((register, value));
        Ok(())
    }

    fn close(&mut self) {
        self.state.lock().closed = true;
    }
}
