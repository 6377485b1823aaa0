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
    ops::ControlFlow,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    leds::LedController,
};

/// A running animation. The task is filled in right after spawning.
struct Session {
    id: u64,
    task: Option<JoinHandle<()>>,
}

/// Clears the session slot when the animation task ends, however it ends.
struct SessionGuard {
    id: u64,
    slot: Arc<Mutex<Option<Session>>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        // The slot may already hold a newer session if this one was stopped.
        if slot.as_ref().is_some_and(|session| session.id == self.id) {
            *slot = None;
        }
        debug!(session = self.id, "Animation ended.");
    }
}

/// Runs one animation at a time against a shared LED controller. Every tick calls the
/// frame function and then commits the controller.
pub struct Animator {
    leds: Arc<Mutex<LedController>>,
    session: Arc<Mutex<Option<Session>>>,
    next_id: AtomicU64,
}

impl Animator {
    /// Creates a new animator for the given controller.
    pub fn new(leds: Arc<Mutex<LedController>>) -> Animator {
        Animator {
            leds,
            session: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(0),
        }
    }

    /// Starts calling `frame` every `interval`, with the first call one interval from
    /// now. The frame counter passed in starts at 0. Returning `ControlFlow::Break`
    /// ends the animation after that frame has been committed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, interval: Duration, frame: F) -> Result<()>
    where
        F: FnMut(&mut LedController, u64) -> ControlFlow<()> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(Error::InvalidInterval);
        }
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut slot = self.session.lock();
            if slot.is_some() {
                return Err(Error::AlreadyRunning);
            }
            *slot = Some(Session { id, task: None });
        }

        // The slot lock must not be held here: the guard takes it when the task ends.
        debug!(session = id, interval = ?interval, "Starting animation.");
        let guard = SessionGuard {
            id,
            slot: self.session.clone(),
        };
        let task = runtime.spawn(run(self.leds.clone(), interval, frame, guard));

        let orphan = match self.session.lock().as_mut() {
            Some(session) if session.id == id => {
                session.task = Some(task);
                None
            }
            _ => Some(task),
        };
        // Stopped or finished before the handle was stored.
        if let Some(task) = orphan {
            task.abort();
        }

        Ok(())
    }

    /// Stops the running animation, if any. Safe to call repeatedly.
    pub fn stop(&self) {
        let session = self.session.lock().take();
        if let Some(session) = session {
            debug!(session = session.id, "Stopping animation.");
            if let Some(task) = session.task {
                task.abort();
            }
        }
    }

    /// Returns true while an animation is running.
    pub fn is_running(&self) -> bool {
        self.session.lock().is_some()
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<F>(
    leds: Arc<Mutex<LedController>>,
    interval: Duration,
    mut frame: F,
    guard: SessionGuard,
) where
    F: FnMut(&mut LedController, u64) -> ControlFlow<()>,
{
    let _guard = guard;
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut count: u64 = 0;
    loop {
        ticker.tick().await;

        let flow = {
            let mut leds = leds.lock();
            let flow = frame(&mut *leds, count);
            count += 1;

            if let Err(e) = leds.commit() {
                warn!(frame = count - 1, err = %e, "Error committing animation frame.");
            }
            flow
        };

        if flow.is_break() {
            return;
        }
    }
}
