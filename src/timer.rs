//! Cancellable one-shot timeout.
//!
//! Each call to [`OneShot::schedule`] hands out a fresh [`TimeoutHandle`].
//! A timeout fires at most once, and only for the handle that is currently
//! armed, so a timer left over from an earlier run can never end a later one.

use std::time::Duration;

use bevy::prelude::*;

/// Identifies one scheduled timeout.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeoutHandle(u32);

#[derive(Reflect, Debug, Clone)]
struct Armed {
    handle: TimeoutHandle,
    /// `None` for a delay too long to represent; it never fires.
    timer: Option<Timer>,
}

/// A single-slot scheduler for a cancellable delayed callback.
#[derive(Reflect, Debug, Clone, Default)]
pub struct OneShot {
    next: u32,
    armed: Option<Armed>,
}

impl OneShot {
    /// Arm a timeout `seconds` from now, replacing any armed one.
    ///
    /// Negative delays fire on the next advance. Delays a [`Duration`] cannot
    /// hold (infinite or too large) stay armed but never fire.
    pub fn schedule(&mut self, seconds: f32) -> TimeoutHandle {
        self.next = self.next.wrapping_add(1);
        let handle = TimeoutHandle(self.next);
        let timer = Duration::try_from_secs_f32(seconds.max(0.0))
            .ok()
            .map(|duration| Timer::new(duration, TimerMode::Once));
        self.armed = Some(Armed { handle, timer });
        handle
    }

    /// Disarm `handle`. Returns false if it was not the armed timeout.
    pub fn cancel(&mut self, handle: TimeoutHandle) -> bool {
        if self.is_armed(handle) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    /// Disarm whatever is armed.
    pub fn cancel_all(&mut self) {
        self.armed = None;
    }

    /// Whether `handle` is the armed timeout.
    pub fn is_armed(&self, handle: TimeoutHandle) -> bool {
        self.armed.as_ref().is_some_and(|armed| armed.handle == handle)
    }

    /// Seconds left on the armed timeout. Infinite for one that never fires.
    pub fn remaining_secs(&self) -> Option<f32> {
        self.armed.as_ref().map(|armed| {
            armed
                .timer
                .as_ref()
                .map_or(f32::INFINITY, Timer::remaining_secs)
        })
    }

    /// Advance time. Returns the handle that fired, and disarms it.
    pub fn advance(&mut self, delta: Duration) -> Option<TimeoutHandle> {
        let timer = self.armed.as_mut()?.timer.as_mut()?;
        timer.tick(delta);
        if timer.is_finished() {
            self.armed.take().map(|armed| armed.handle)
        } else {
            None
        }
    }
}
