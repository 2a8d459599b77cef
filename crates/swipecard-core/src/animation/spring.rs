#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) motion.
//!
//! Based on the classical damped spring equation:
//!
//!   m × a = -tension × (position - target) - friction × velocity
//!
//! # Parameters
//!
//! - **tension** (k): Restoring force strength. Higher = faster response.
//! - **friction** (c): Velocity drag. Higher = less oscillation.
//!   Critical friction is `2√(k·m)`.
//! - **mass** (m): Inertia. Lower = snappier.
//! - **rest thresholds**: displacement and speed below which the spring is
//!   considered at rest and snaps onto its target.
//! - **overshoot clamping**: stop at the target instead of oscillating past it.
//!
//! # Integration
//!
//! Semi-implicit Euler, subdivided into steps of at most 4ms.
//!
//! # Invariants
//!
//! 1. A spring at rest stays at rest until [`Spring::set_target`] moves the
//!    target or [`Spring::impulse`] adds velocity.
//! 2. When the spring comes to rest its position equals its target exactly.
//! 3. With overshoot clamping on, the position never crosses the target.
//! 4. Tension and mass are always positive, friction non-negative.
//!
//! # Failure Modes
//!
//! - Zero friction without overshoot clamping oscillates forever; the
//!   spring never reports rest. [`SpringConfig::settles`] rejects it, along
//!   with non-finite parameters and non-positive rest thresholds.

use std::time::Duration;

/// Maximum dt per integration step (4ms). Larger deltas are subdivided
/// for numerical stability with high tension values.
const MAX_STEP_SECS: f64 = 0.004;

/// Minimum tension to prevent degenerate springs.
const MIN_TENSION: f64 = 0.1;

/// Minimum mass to keep acceleration finite.
const MIN_MASS: f64 = 0.001;

/// Physics parameters for a [`Spring`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub tension: f64,
    pub friction: f64,
    pub mass: f64,
    /// Speed (units/s) below which, combined with the displacement
    /// threshold, the spring is at rest.
    pub rest_speed_threshold: f64,
    /// Distance from target below which, combined with the speed
    /// threshold, the spring is at rest.
    pub rest_displacement_threshold: f64,
    pub overshoot_clamping: bool,
}

impl SpringConfig {
    /// Physics used for the card fly-away and settle-back motion.
    pub const SWIPE: Self = Self {
        tension: 390.0,
        friction: 30.0,
        mass: 0.1,
        rest_speed_threshold: 1.0,
        rest_displacement_threshold: 0.01,
        overshoot_clamping: true,
    };

    /// Soft, slightly bouncy motion.
    pub const GENTLE: Self = Self {
        tension: 120.0,
        friction: 14.0,
        mass: 1.0,
        rest_speed_threshold: 0.01,
        rest_displacement_threshold: 0.001,
        overshoot_clamping: false,
    };

    /// Friction that converges fastest without oscillating.
    #[must_use]
    pub fn critical_friction(&self) -> f64 {
        2.0 * (self.tension * self.mass).sqrt()
    }

    #[must_use]
    pub fn is_underdamped(&self) -> bool {
        self.friction < self.critical_friction()
    }

    /// Whether a spring built from this config always comes to rest.
    ///
    /// Requires finite parameters, positive rest thresholds, and either
    /// friction or overshoot clamping.
    #[must_use]
    pub fn settles(&self) -> bool {
        let finite = [
            self.tension,
            self.friction,
            self.mass,
            self.rest_speed_threshold,
            self.rest_displacement_threshold,
        ]
        .iter()
        .all(|value| value.is_finite());
        finite
            && self.rest_speed_threshold > 0.0
            && self.rest_displacement_threshold > 0.0
            && (self.friction > 0.0 || self.overshoot_clamping)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::SWIPE
    }
}

/// A damped harmonic oscillator moving a scalar toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    tension: f64,
    friction: f64,
    mass: f64,
    rest_displacement_threshold: f64,
    rest_speed_threshold: f64,
    overshoot_clamping: bool,
    at_rest: bool,
}

impl Spring {
    /// A spring resting at `position`.
    #[must_use]
    pub fn at_rest(position: f64, config: &SpringConfig) -> Self {
        Self {
            position,
            velocity: 0.0,
            target: position,
            tension: config.tension.max(MIN_TENSION),
            friction: config.friction.max(0.0),
            mass: config.mass.max(MIN_MASS),
            rest_displacement_threshold: config.rest_displacement_threshold.abs(),
            rest_speed_threshold: config.rest_speed_threshold.abs(),
            overshoot_clamping: config.overshoot_clamping,
            at_rest: true,
        }
    }

    /// A spring starting at `initial` and moving toward `target`.
    #[must_use]
    pub fn new(initial: f64, target: f64, config: &SpringConfig) -> Self {
        let mut spring = Self::at_rest(initial, config);
        spring.set_target(target);
        spring
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Change the target. Wakes the spring if the target moved by more than
    /// the displacement threshold.
    pub fn set_target(&mut self, target: f64) {
        let moved = (self.target - target).abs() > self.rest_displacement_threshold;
        self.target = target;
        if moved {
            self.at_rest = false;
        } else if self.at_rest {
            self.position = target;
        }
    }

    /// Jump to `target` with no motion.
    pub fn snap_to(&mut self, target: f64) {
        self.position = target;
        self.target = target;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Apply an impulse (add to velocity). Wakes the spring.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    /// Perform a single integration step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.tension * displacement;
        let damping_force = -self.friction * self.velocity;
        let acceleration = (spring_force + damping_force) / self.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        if self.overshoot_clamping && displacement != 0.0 {
            let after = self.position - self.target;
            if after == 0.0 || after.signum() != displacement.signum() {
                self.position = self.target;
                self.velocity = 0.0;
            }
        }
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        let speed = self.velocity.abs();
        if pos_delta < self.rest_displacement_threshold && speed < self.rest_speed_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
