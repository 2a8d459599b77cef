#![forbid(unsafe_code)]

//! Animation driver boundary.
//!
//! The widget never interpolates on its own. It commands a target
//! [`SwipeFrame`] and advances a driver frame by frame; the driver reports
//! the interpolated frame and, once per command, a terminal settle signal.
//!
//! # Invariants
//!
//! 1. Every [`AnimationDriver::animate_to`] call produces exactly one
//!    `settled == true` tick, on the first [`AnimationDriver::advance`] at or
//!    after the moment the frame reaches the target. A newer command replaces
//!    the pending settle of an older one.
//! 2. An immediate command snaps the frame to the target; its settle is
//!    reported on the next advance.
//! 3. Advancing with no pending command never reports a settle.

use std::time::Duration;

use super::spring::{Spring, SpringConfig};
use crate::geometry::SwipeFrame;

/// Result of advancing a driver by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverTick {
    /// Interpolated frame after the advance.
    pub frame: SwipeFrame,
    /// `true` on the one tick where the last commanded target was reached.
    pub settled: bool,
}

/// Interpolates a [`SwipeFrame`] toward commanded targets.
pub trait AnimationDriver {
    /// Command a new target. `immediate` skips interpolation.
    fn animate_to(&mut self, target: SwipeFrame, immediate: bool);

    /// Advance by `dt` and report the current frame.
    fn advance(&mut self, dt: Duration) -> DriverTick;

    /// Current interpolated frame.
    fn current(&self) -> SwipeFrame;

    /// Whether a settle signal is still owed for the last command.
    fn is_animating(&self) -> bool;
}

/// Spring-physics driver: one spring for the offset, one for the opacity.
#[derive(Debug, Clone)]
pub struct SpringDriver {
    offset: Spring,
    opacity: Spring,
    pending_settle: bool,
}

impl SpringDriver {
    /// A driver resting at [`SwipeFrame::REST`].
    #[must_use]
    pub fn new(config: SpringConfig) -> Self {
        Self {
            offset: Spring::at_rest(SwipeFrame::REST.offset, &config),
            opacity: Spring::at_rest(SwipeFrame::REST.opacity, &config),
            pending_settle: false,
        }
    }

    /// Last commanded target.
    #[must_use]
    pub fn target(&self) -> SwipeFrame {
        SwipeFrame::new(self.offset.target(), self.opacity.target())
    }
}

impl Default for SpringDriver {
    fn default() -> Self {
        Self::new(SpringConfig::SWIPE)
    }
}

impl AnimationDriver for SpringDriver {
    fn animate_to(&mut self, target: SwipeFrame, immediate: bool) {
        if immediate {
            self.offset.snap_to(target.offset);
            self.opacity.snap_to(target.opacity);
        } else {
            self.offset.set_target(target.offset);
            self.opacity.set_target(target.opacity);
        }
        self.pending_settle = true;
    }

    fn advance(&mut self, dt: Duration) -> DriverTick {
        self.offset.advance(dt);
        self.opacity.advance(dt);

        let settled =
            self.pending_settle && self.offset.is_at_rest() && self.opacity.is_at_rest();
        if settled {
            self.pending_settle = false;
        }
        DriverTick {
            frame: self.current(),
            settled,
        }
    }

    fn current(&self) -> SwipeFrame {
        SwipeFrame::new(self.offset.position(), self.opacity.position())
    }

    fn is_animating(&self) -> bool {
        self.pending_settle
    }
}
