#![forbid(unsafe_code)]

//! Swipe gesture lifecycle.
//!
//! [`SwipeMachine`] turns drag input and programmatic swipe requests into
//! deterministic [`SwipeTransition`]s. It owns no callbacks and no clock:
//! the widget layer reacts to the emitted [`SwipeEffect`]s (asking the
//! caller for a decision, firing commit callbacks, commanding the animation
//! driver) and reports back with [`SwipeMachine::confirm`],
//! [`SwipeMachine::cancel`] and [`SwipeMachine::settle`].
//!
//! # State Machine
//!
//! ```text
//! Idle -> Dragging -> Resolving -> SwipingOut -----> Idle (reset)
//!            |            \-------> CancellingBack -> Idle
//!            \--------------------> CancellingBack -> Idle
//! Idle --force_swipe--> Resolving
//! ```
//!
//! # Invariants
//!
//! 1. `moving` and `swiped` are never both true.
//! 2. Once `swiped` is true every drag and force-swipe input is a no-op until
//!    the swipe-out settles and the state resets.
//! 3. A reset restores [`GestureState::INITIAL`] in one step.
//! 4. At most one decision is pending; answering it with any other ticket is
//!    a no-op.
//! 5. Only a swipe-out settle resets; a cancel-back settle just returns to
//!    `Idle`.
//!
//! # Failure Modes
//!
//! Construction fails with [`SwipeConfigError`] for bad thresholds or a
//! spring that never settles. Input never surfaces as an error: out-of-order
//! input yields [`SwipeEffect::Noop`] with a [`SwipeNoopReason`].

use std::fmt;

use crate::animation::SpringConfig;
use crate::geometry::{self, DEFAULT_LIMIT, Direction, SwipeFrame};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// When the surface should jump to its target instead of easing.
///
/// Two rules have shipped; both are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImmediacyPolicy {
    /// Snap only before the first interaction (and right after a reset).
    PristineOnly,
    /// Also snap whenever the offset is at or past the limit, unless the
    /// swipe was forced programmatically.
    #[default]
    PristineOrFullExtension,
}

impl ImmediacyPolicy {
    #[must_use]
    pub fn is_immediate(self, state: &GestureState, limit: f64) -> bool {
        match self {
            Self::PristineOnly => state.pristine,
            Self::PristineOrFullExtension => {
                state.pristine || (!state.forced && state.offset.abs() >= limit)
            }
        }
    }
}

/// Swipe thresholds and motion settings, immutable per mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Offset magnitude (px) at or above which a drag commits (default: 120).
    pub limit: f64,
    /// Offset magnitude (px) below which opacity stays at 1.0 (default: 0).
    pub fade_start: f64,
    /// Snap-versus-ease rule (default: [`ImmediacyPolicy::PristineOrFullExtension`]).
    pub immediacy: ImmediacyPolicy,
    /// Physics for the default spring driver.
    pub spring: SpringConfig,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            fade_start: 0.0,
            immediacy: ImmediacyPolicy::default(),
            spring: SpringConfig::SWIPE,
        }
    }
}

impl SwipeConfig {
    #[must_use]
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_fade_start(mut self, fade_start: f64) -> Self {
        self.fade_start = fade_start;
        self
    }

    #[must_use]
    pub fn with_immediacy(mut self, immediacy: ImmediacyPolicy) -> Self {
        self.immediacy = immediacy;
        self
    }

    #[must_use]
    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    /// Check thresholds and that the spring comes to rest.
    pub fn validate(&self) -> Result<(), SwipeConfigError> {
        if !self.limit.is_finite() || self.limit <= 0.0 {
            return Err(SwipeConfigError::InvalidLimit { limit: self.limit });
        }
        if !self.fade_start.is_finite() || self.fade_start < 0.0 || self.fade_start >= self.limit
        {
            return Err(SwipeConfigError::InvalidFadeStart {
                fade_start: self.fade_start,
                limit: self.limit,
            });
        }
        if !self.spring.settles() {
            return Err(SwipeConfigError::InvalidSpring {
                spring: self.spring,
            });
        }
        Ok(())
    }
}

/// Rejected swipe configuration.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SwipeConfigError {
    #[error("swipe limit must be finite and > 0 (got {limit})")]
    InvalidLimit { limit: f64 },
    #[error("fade start must be finite, >= 0 and below the limit {limit} (got {fade_start})")]
    InvalidFadeStart { fade_start: f64, limit: f64 },
    #[error("spring never comes to rest: {spring:?}")]
    InvalidSpring { spring: SpringConfig },
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Per-widget gesture record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    /// Pointer x at drag start; 0 when idle.
    pub start: f64,
    /// Signed horizontal displacement.
    pub offset: f64,
    /// Between drag start and drag end / resolution.
    pub moving: bool,
    /// A swipe has been committed and not yet reset.
    pub swiped: bool,
    /// No interaction since mount or the last reset.
    pub pristine: bool,
    /// The current swipe was requested programmatically.
    pub forced: bool,
}

impl GestureState {
    pub const INITIAL: Self = Self {
        start: 0.0,
        offset: 0.0,
        moving: false,
        swiped: false,
        pristine: true,
        forced: false,
    };
}

impl Default for GestureState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Coarse lifecycle phase derived from the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipePhase {
    Idle,
    Dragging,
    /// Waiting for the caller to confirm or cancel a swipe.
    Resolving,
    /// Committed; flying out until the driver settles.
    SwipingOut,
    /// Cancelled; easing back to rest until the driver settles.
    CancellingBack,
}

impl fmt::Display for SwipePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Resolving => "resolving",
            Self::SwipingOut => "swiping_out",
            Self::CancellingBack => "cancelling_back",
        })
    }
}

/// Identifies one before-swipe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecisionTicket(u64);

impl DecisionTicket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A swipe waiting for confirm/cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDecision {
    pub ticket: DecisionTicket,
    /// Direction detected from the drag (or requested by the force swipe).
    pub direction: Direction,
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeNoopReason {
    AlreadySwiped,
    NotMoving,
    DecisionPending,
    StaleDecision,
    MissingCoordinate,
    NothingToSettle,
}

/// Effect of one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEffect {
    DragStarted { start: f64 },
    DragMoved { offset: f64 },
    /// The threshold was crossed (or a swipe was forced); a decision is needed.
    SwipeRequested {
        ticket: DecisionTicket,
        direction: Direction,
    },
    /// The swipe is committed; the surface flies out to `offset`.
    Committed { direction: Direction, offset: f64 },
    /// The drag or decision was cancelled; the surface eases back to rest.
    Cancelled,
    /// A swipe-out settled; the state is back to [`GestureState::INITIAL`].
    Reset,
    /// A cancel-back settled.
    Settled,
    Noop(SwipeNoopReason),
}

impl SwipeEffect {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop(_))
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DragStarted { .. } => "drag_started",
            Self::DragMoved { .. } => "drag_moved",
            Self::SwipeRequested { .. } => "swipe_requested",
            Self::Committed { .. } => "committed",
            Self::Cancelled => "cancelled",
            Self::Reset => "reset",
            Self::Settled => "settled",
            Self::Noop(_) => "noop",
        }
    }

    /// Whether the effect changed the surface's target frame.
    #[must_use]
    pub const fn moves_surface(&self) -> bool {
        matches!(
            self,
            Self::DragMoved { .. } | Self::Committed { .. } | Self::Cancelled | Self::Reset
        )
    }
}

/// One lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTransition {
    pub from: SwipePhase,
    pub to: SwipePhase,
    pub effect: SwipeEffect,
}

// ---------------------------------------------------------------------------
// SwipeMachine
// ---------------------------------------------------------------------------

/// Deterministic swipe lifecycle for one widget.
#[derive(Debug, Clone)]
pub struct SwipeMachine {
    config: SwipeConfig,
    state: GestureState,
    pending: Option<PendingDecision>,
    settling_back: bool,
    ticket_counter: u64,
}

impl SwipeMachine {
    /// Construct a machine with validated thresholds.
    pub fn new(config: SwipeConfig) -> Result<Self, SwipeConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: GestureState::INITIAL,
            pending: None,
            settling_back: false,
            ticket_counter: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn limit(&self) -> f64 {
        self.config.limit
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub fn pending_decision(&self) -> Option<PendingDecision> {
        self.pending
    }

    #[must_use]
    pub fn phase(&self) -> SwipePhase {
        if self.state.swiped {
            SwipePhase::SwipingOut
        } else if self.pending.is_some() {
            SwipePhase::Resolving
        } else if self.state.moving {
            SwipePhase::Dragging
        } else if self.settling_back {
            SwipePhase::CancellingBack
        } else {
            SwipePhase::Idle
        }
    }

    /// Frame the surface should animate toward.
    #[must_use]
    pub fn target_frame(&self) -> SwipeFrame {
        let offset = self.state.offset;
        SwipeFrame::new(
            offset,
            geometry::opacity(offset, self.config.limit, self.config.fade_start),
        )
    }

    /// Whether the surface should jump to [`target_frame`](Self::target_frame).
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        self.config
            .immediacy
            .is_immediate(&self.state, self.config.limit)
    }

    /// Pointer pressed on the surface at `x`.
    pub fn drag_start(&mut self, x: Option<f64>) -> SwipeTransition {
        let from = self.phase();
        if self.state.swiped {
            return self.noop(from, SwipeNoopReason::AlreadySwiped);
        }
        if self.pending.is_some() {
            return self.noop(from, SwipeNoopReason::DecisionPending);
        }
        let Some(start) = x.filter(|x| x.is_finite()) else {
            return self.noop(from, SwipeNoopReason::MissingCoordinate);
        };

        self.state.start = start;
        self.state.moving = true;
        self.state.pristine = false;
        self.settling_back = false;
        self.transition(from, SwipeEffect::DragStarted { start })
    }

    /// Pointer moved to `x` anywhere on the page.
    pub fn drag_move(&mut self, x: Option<f64>) -> SwipeTransition {
        let from = self.phase();
        if let Some(reason) = self.drag_guard() {
            return self.noop(from, reason);
        }
        let Some(end) = x.filter(|x| x.is_finite()) else {
            return self.noop(from, SwipeNoopReason::MissingCoordinate);
        };

        let offset = geometry::drag_offset(self.state.start, end);
        self.state.offset = offset;
        self.transition(from, SwipeEffect::DragMoved { offset })
    }

    /// Pointer released anywhere on the page.
    pub fn drag_end(&mut self) -> SwipeTransition {
        let from = self.phase();
        if let Some(reason) = self.drag_guard() {
            return self.noop(from, reason);
        }

        if self.state.offset.abs() >= self.config.limit {
            let direction = geometry::direction(self.state.offset);
            self.request(from, direction)
        } else {
            self.cancel_drag();
            self.transition(from, SwipeEffect::Cancelled)
        }
    }

    /// Request a swipe in `direction` without pointer input.
    pub fn force_swipe(&mut self, direction: Direction) -> SwipeTransition {
        let from = self.phase();
        if self.state.swiped {
            return self.noop(from, SwipeNoopReason::AlreadySwiped);
        }
        if self.pending.is_some() {
            return self.noop(from, SwipeNoopReason::DecisionPending);
        }

        self.state.pristine = false;
        self.state.forced = true;
        self.request(from, direction)
    }

    /// Commit the pending swipe, optionally redirected to `direction`.
    pub fn confirm(
        &mut self,
        ticket: DecisionTicket,
        direction: Option<Direction>,
    ) -> SwipeTransition {
        let from = self.phase();
        if self.state.swiped {
            return self.noop(from, SwipeNoopReason::AlreadySwiped);
        }
        let Some(pending) = self.pending.filter(|p| p.ticket == ticket) else {
            return self.noop(from, SwipeNoopReason::StaleDecision);
        };

        let direction = direction.unwrap_or(pending.direction);
        let offset = geometry::limit_offset(self.config.limit, direction);
        self.pending = None;
        self.settling_back = false;
        self.state.swiped = true;
        self.state.moving = false;
        self.state.offset = offset;
        self.transition(from, SwipeEffect::Committed { direction, offset })
    }

    /// Abandon the pending swipe and ease back to rest.
    pub fn cancel(&mut self, ticket: DecisionTicket) -> SwipeTransition {
        let from = self.phase();
        if self.state.swiped {
            return self.noop(from, SwipeNoopReason::AlreadySwiped);
        }
        if self.pending.is_none_or(|p| p.ticket != ticket) {
            return self.noop(from, SwipeNoopReason::StaleDecision);
        }

        self.pending = None;
        self.cancel_drag();
        self.transition(from, SwipeEffect::Cancelled)
    }

    /// The animation driver reached the last commanded target.
    pub fn settle(&mut self) -> SwipeTransition {
        let from = self.phase();
        if self.state.swiped {
            self.state = GestureState::INITIAL;
            self.pending = None;
            self.settling_back = false;
            return self.transition(from, SwipeEffect::Reset);
        }
        if self.settling_back && !self.state.moving && self.pending.is_none() {
            self.settling_back = false;
            return self.transition(from, SwipeEffect::Settled);
        }
        self.noop(from, SwipeNoopReason::NothingToSettle)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

impl SwipeMachine {
    fn drag_guard(&self) -> Option<SwipeNoopReason> {
        if self.state.swiped {
            Some(SwipeNoopReason::AlreadySwiped)
        } else if !self.state.moving {
            Some(SwipeNoopReason::NotMoving)
        } else if self.pending.is_some() {
            Some(SwipeNoopReason::DecisionPending)
        } else {
            None
        }
    }

    fn request(&mut self, from: SwipePhase, direction: Direction) -> SwipeTransition {
        self.ticket_counter = self.ticket_counter.saturating_add(1);
        let ticket = DecisionTicket(self.ticket_counter);
        self.pending = Some(PendingDecision { ticket, direction });
        self.transition(from, SwipeEffect::SwipeRequested { ticket, direction })
    }

    fn cancel_drag(&mut self) {
        self.state.start = 0.0;
        self.state.offset = 0.0;
        self.state.moving = false;
        self.settling_back = true;
    }

    fn noop(&self, from: SwipePhase, reason: SwipeNoopReason) -> SwipeTransition {
        self.transition(from, SwipeEffect::Noop(reason))
    }

    fn transition(&self, from: SwipePhase, effect: SwipeEffect) -> SwipeTransition {
        debug_assert!(
            !(self.state.moving && self.state.swiped),
            "moving and swiped are exclusive"
        );
        let transition = SwipeTransition {
            from,
            to: self.phase(),
            effect,
        };

        #[cfg(feature = "tracing")]
        trace_transition(&transition);

        transition
    }
}

#[cfg(feature = "tracing")]
fn trace_transition(transition: &SwipeTransition) {
    let _span = tracing::debug_span!(
        "swipe.transition",
        from = %transition.from,
        to = %transition.to,
        effect = transition.effect.name()
    )
    .entered();
    if let SwipeEffect::Noop(reason) = transition.effect {
        tracing::trace!(?reason, "swipe input ignored");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
