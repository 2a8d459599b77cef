#![forbid(unsafe_code)]

//! Swipeable surface widget.
//!
//! A [`Swipeable`] owns one [`SwipeMachine`] and one [`AnimationDriver`] and
//! wires them to the caller's hooks:
//!
//! - `on_before_swipe(decision)` intercepts every swipe request with a
//!   [`SwipeDecision`] that can confirm (optionally redirected) or cancel,
//!   synchronously or later. Without it the swipe auto-confirms.
//! - `on_swipe(direction)` fires once per commit, before the fly-out settles.
//! - `on_after_swipe()` fires once per commit, after the fly-out settled and
//!   the state reset.
//! - `buttons(controls)` renders external controls from [`SwipeButtons`].
//!
//! # Re-entrancy
//!
//! Hooks run with no internal borrow held. A hook may call back into the
//! widget (force a swipe, answer a decision, advance the driver); such calls
//! run to completion before the hook resumes.
//!
//! # Listener lifecycle
//!
//! Mounting subscribes the drag tracking kinds on the window-level
//! [`PointerHub`]; the subscription is released by [`Swipeable::unmount`] or
//! when the widget is dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use swipecard_core::animation::{AnimationDriver, SpringConfig, SpringDriver};
use swipecard_core::event::{PointerEvent, PointerListenerKinds, PointerPhase};
use swipecard_core::geometry::{Direction, SwipeFrame, SwipeTransform};
use swipecard_core::gesture::{
    DecisionTicket, GestureState, ImmediacyPolicy, SwipeConfig, SwipeConfigError, SwipeEffect,
    SwipeMachine, SwipePhase, SwipeTransition,
};
use swipecard_core::pointer_hub::{ListenerGuard, PointerHub};
use web_time::Instant;

pub(crate) type BeforeSwipeHook = Rc<dyn Fn(SwipeDecision)>;
pub(crate) type SwipeHook = Rc<dyn Fn(Direction)>;
pub(crate) type AfterSwipeHook = Rc<dyn Fn()>;
type ButtonsHook<B> = Box<dyn Fn(SwipeButtons) -> B>;

// ---------------------------------------------------------------------------
// Shared widget core
// ---------------------------------------------------------------------------

struct Shared {
    machine: RefCell<SwipeMachine>,
    driver: RefCell<Box<dyn AnimationDriver>>,
    last_tick: Cell<Option<Instant>>,
    on_before_swipe: Option<BeforeSwipeHook>,
    on_swipe: Option<SwipeHook>,
    on_after_swipe: Option<AfterSwipeHook>,
}

impl Shared {
    /// Run one machine operation, then react to its effect.
    fn run(
        self: &Rc<Self>,
        op: impl FnOnce(&mut SwipeMachine) -> SwipeTransition,
    ) -> SwipeTransition {
        let transition = op(&mut self.machine.borrow_mut());
        self.apply(transition);
        transition
    }

    fn apply(self: &Rc<Self>, transition: SwipeTransition) {
        if transition.effect.moves_surface() {
            self.sync_driver();
        }
        match transition.effect {
            SwipeEffect::SwipeRequested { ticket, direction } => {
                self.request_decision(ticket, direction);
            }
            SwipeEffect::Committed { direction, .. } => {
                #[cfg(feature = "tracing")]
                let _span =
                    tracing::info_span!("swipeable.commit", direction = direction.as_str())
                        .entered();
                if let Some(hook) = &self.on_swipe {
                    hook(direction);
                }
            }
            SwipeEffect::Reset => {
                if let Some(hook) = &self.on_after_swipe {
                    hook();
                }
            }
            SwipeEffect::DragStarted { .. }
            | SwipeEffect::DragMoved { .. }
            | SwipeEffect::Cancelled
            | SwipeEffect::Settled
            | SwipeEffect::Noop(_) => {}
        }
    }

    fn request_decision(self: &Rc<Self>, ticket: DecisionTicket, direction: Direction) {
        match &self.on_before_swipe {
            Some(hook) => hook(SwipeDecision {
                shared: Rc::downgrade(self),
                ticket,
                direction,
                answered: false,
            }),
            None => {
                self.run(|machine| machine.confirm(ticket, None));
            }
        }
    }

    /// Command the driver toward the machine's current target.
    fn sync_driver(&self) {
        let (target, immediate) = {
            let machine = self.machine.borrow();
            (machine.target_frame(), machine.is_immediate())
        };
        self.driver.borrow_mut().animate_to(target, immediate);
    }

    fn advance(self: &Rc<Self>, dt: Duration) -> SwipeFrame {
        let tick = self.driver.borrow_mut().advance(dt);
        if tick.settled {
            self.run(SwipeMachine::settle);
        }
        self.driver.borrow().current()
    }

    fn on_window_event(self: &Rc<Self>, event: &PointerEvent) {
        match event.phase() {
            PointerPhase::Move => {
                self.run(|machine| machine.drag_move(event.normalized_x()));
            }
            PointerPhase::End => {
                self.run(SwipeMachine::drag_end);
            }
            PointerPhase::Start => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Caller capabilities
// ---------------------------------------------------------------------------

/// Answer to one before-swipe interception.
///
/// Consumed by [`confirm`](Self::confirm), [`confirm_with`](Self::confirm_with)
/// or [`cancel`](Self::cancel); dropping it unanswered cancels the swipe.
/// Answering after the widget was unmounted does nothing.
#[must_use = "dropping a decision cancels the swipe"]
pub struct SwipeDecision {
    shared: Weak<Shared>,
    ticket: DecisionTicket,
    direction: Direction,
    answered: bool,
}

impl SwipeDecision {
    /// Direction detected from the drag, or requested by the forced swipe.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn ticket(&self) -> DecisionTicket {
        self.ticket
    }

    /// Commit the swipe in the detected direction.
    pub fn confirm(self) {
        self.answer(|machine, ticket| machine.confirm(ticket, None));
    }

    /// Commit the swipe in `direction` instead of the detected one.
    pub fn confirm_with(self, direction: Direction) {
        self.answer(move |machine, ticket| machine.confirm(ticket, Some(direction)));
    }

    /// Abandon the swipe; the surface eases back to rest.
    pub fn cancel(self) {
        self.answer(SwipeMachine::cancel);
    }

    fn answer(mut self, op: impl FnOnce(&mut SwipeMachine, DecisionTicket) -> SwipeTransition) {
        self.answered = true;
        if let Some(shared) = self.shared.upgrade() {
            let ticket = self.ticket;
            shared.run(|machine| op(machine, ticket));
        }
    }
}

impl Drop for SwipeDecision {
    fn drop(&mut self) {
        if self.answered {
            return;
        }
        self.answered = true;
        if let Some(shared) = self.shared.upgrade() {
            let ticket = self.ticket;
            shared.run(|machine| machine.cancel(ticket));
        }
    }
}

impl fmt::Debug for SwipeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeDecision")
            .field("ticket", &self.ticket)
            .field("direction", &self.direction)
            .field("answered", &self.answered)
            .finish()
    }
}

/// Programmatic swipe controls handed to the `buttons` render hook.
///
/// Handles are cheap to clone and outlive the widget safely: once the widget
/// is gone every call is ignored.
#[derive(Clone)]
pub struct SwipeButtons {
    shared: Weak<Shared>,
}

impl SwipeButtons {
    /// Force a swipe to the right.
    pub fn right(&self) {
        self.swipe(Direction::Right);
    }

    /// Force a swipe to the left.
    pub fn left(&self) {
        self.swipe(Direction::Left);
    }

    /// Force a swipe in `direction`. Returns `false` if the request was
    /// ignored (already swiped, decision pending, or widget gone).
    pub fn swipe(&self, direction: Direction) -> bool {
        self.shared.upgrade().is_some_and(|shared| {
            !shared
                .run(|machine| machine.force_swipe(direction))
                .effect
                .is_noop()
        })
    }
}

impl fmt::Debug for SwipeButtons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeButtons")
            .field("mounted", &(self.shared.strong_count() > 0))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configuration for a [`Swipeable`]; immutable once mounted.
pub struct SwipeableBuilder<C, B = ()> {
    content: C,
    config: SwipeConfig,
    on_before_swipe: Option<BeforeSwipeHook>,
    on_swipe: Option<SwipeHook>,
    on_after_swipe: Option<AfterSwipeHook>,
    buttons: Option<ButtonsHook<B>>,
    driver: Option<Box<dyn AnimationDriver>>,
}

impl<C, B> SwipeableBuilder<C, B> {
    /// Swipe commit threshold in pixels (default: 120).
    #[must_use]
    pub fn limit(mut self, limit: f64) -> Self {
        self.config.limit = limit;
        self
    }

    /// Offset below which the surface stays fully opaque (default: 0).
    #[must_use]
    pub fn fade_start(mut self, fade_start: f64) -> Self {
        self.config.fade_start = fade_start;
        self
    }

    #[must_use]
    pub fn immediacy(mut self, immediacy: ImmediacyPolicy) -> Self {
        self.config.immediacy = immediacy;
        self
    }

    /// Physics for the default spring driver.
    #[must_use]
    pub fn spring(mut self, spring: SpringConfig) -> Self {
        self.config.spring = spring;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: SwipeConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn on_before_swipe(mut self, hook: impl Fn(SwipeDecision) + 'static) -> Self {
        self.on_before_swipe = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_swipe(mut self, hook: impl Fn(Direction) + 'static) -> Self {
        self.on_swipe = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_after_swipe(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_after_swipe = Some(Rc::new(hook));
        self
    }

    /// Render hook for controls outside the draggable surface.
    #[must_use]
    pub fn buttons<B2>(
        self,
        hook: impl Fn(SwipeButtons) -> B2 + 'static,
    ) -> SwipeableBuilder<C, B2> {
        SwipeableBuilder {
            content: self.content,
            config: self.config,
            on_before_swipe: self.on_before_swipe,
            on_swipe: self.on_swipe,
            on_after_swipe: self.on_after_swipe,
            buttons: Some(Box::new(hook)),
            driver: self.driver,
        }
    }

    /// Use `driver` instead of a [`SpringDriver`].
    #[must_use]
    pub fn driver(mut self, driver: impl AnimationDriver + 'static) -> Self {
        self.driver = Some(Box::new(driver));
        self
    }

    /// Run `on_swipe` and `on_after_swipe` before the caller's own hooks.
    pub(crate) fn prepend_hooks(
        mut self,
        on_swipe: SwipeHook,
        on_after_swipe: AfterSwipeHook,
    ) -> Self {
        self.on_swipe = Some(match self.on_swipe.take() {
            Some(caller) => Rc::new(move |direction: Direction| {
                on_swipe(direction);
                caller(direction);
            }),
            None => on_swipe,
        });
        self.on_after_swipe = Some(match self.on_after_swipe.take() {
            Some(caller) => Rc::new(move || {
                on_after_swipe();
                caller();
            }),
            None => on_after_swipe,
        });
        self
    }

    /// Validate the configuration and subscribe to `hub`.
    pub fn mount(self, hub: &PointerHub) -> Result<Swipeable<C, B>, SwipeConfigError> {
        let machine = SwipeMachine::new(self.config)?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "swipeable.mount",
            limit = self.config.limit,
            fade_start = self.config.fade_start,
            intercepted = self.on_before_swipe.is_some()
        )
        .entered();

        let driver = self
            .driver
            .unwrap_or_else(|| Box::new(SpringDriver::new(self.config.spring)));
        let shared = Rc::new(Shared {
            machine: RefCell::new(machine),
            driver: RefCell::new(driver),
            last_tick: Cell::new(None),
            on_before_swipe: self.on_before_swipe,
            on_swipe: self.on_swipe,
            on_after_swipe: self.on_after_swipe,
        });
        shared.sync_driver();

        let weak = Rc::downgrade(&shared);
        let listeners = hub.subscribe(PointerListenerKinds::DRAG_TRACKING, move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.on_window_event(event);
            }
        });

        Ok(Swipeable {
            shared,
            content: self.content,
            buttons: self.buttons,
            listeners,
        })
    }
}

// ---------------------------------------------------------------------------
// Swipeable
// ---------------------------------------------------------------------------

/// What a host draws for one frame.
pub struct SwipeView<'a, C, B> {
    /// Transform for the draggable surface.
    pub transform: SwipeTransform,
    /// Content inside the draggable surface.
    pub content: &'a C,
    /// Output of the `buttons` render hook, drawn outside the surface.
    pub buttons: Option<B>,
}

/// A mounted swipe-to-dismiss surface around `C`.
///
/// `B` is the output type of the `buttons` render hook.
pub struct Swipeable<C, B = ()> {
    shared: Rc<Shared>,
    content: C,
    buttons: Option<ButtonsHook<B>>,
    listeners: ListenerGuard,
}

impl<C> Swipeable<C> {
    /// Start configuring a swipeable surface around `content`.
    #[must_use]
    pub fn builder(content: C) -> SwipeableBuilder<C> {
        SwipeableBuilder {
            content,
            config: SwipeConfig::default(),
            on_before_swipe: None,
            on_swipe: None,
            on_after_swipe: None,
            buttons: None,
            driver: None,
        }
    }
}

impl<C, B> Swipeable<C, B> {
    /// Surface pointer-down (mouse down or touch start).
    pub fn pointer_down(&self, event: &PointerEvent) -> SwipeTransition {
        self.shared
            .run(|machine| machine.drag_start(event.normalized_x()))
    }

    pub fn drag_start(&self, x: f64) -> SwipeTransition {
        self.shared.run(|machine| machine.drag_start(Some(x)))
    }

    pub fn drag_move(&self, x: f64) -> SwipeTransition {
        self.shared.run(|machine| machine.drag_move(Some(x)))
    }

    pub fn drag_end(&self) -> SwipeTransition {
        self.shared.run(SwipeMachine::drag_end)
    }

    /// Request a swipe in `direction` without pointer input.
    pub fn force_swipe(&self, direction: Direction) -> SwipeTransition {
        self.shared.run(|machine| machine.force_swipe(direction))
    }

    /// Advance the animation by `dt`, delivering a settle if one is due.
    pub fn advance(&self, dt: Duration) -> SwipeFrame {
        self.shared.advance(dt)
    }

    /// Advance the animation to the frame clock reading `now`.
    ///
    /// The first tick after mount advances by zero.
    pub fn tick(&self, now: Instant) -> SwipeFrame {
        let dt = self
            .shared
            .last_tick
            .replace(Some(now))
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.shared.advance(dt)
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.shared.machine.borrow().state()
    }

    #[must_use]
    pub fn phase(&self) -> SwipePhase {
        self.shared.machine.borrow().phase()
    }

    #[must_use]
    pub fn config(&self) -> SwipeConfig {
        *self.shared.machine.borrow().config()
    }

    /// Current interpolated frame.
    #[must_use]
    pub fn frame(&self) -> SwipeFrame {
        self.shared.driver.borrow().current()
    }

    #[must_use]
    pub fn transform(&self) -> SwipeTransform {
        self.frame().transform()
    }

    /// Whether the driver still owes a settle.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.shared.driver.borrow().is_animating()
    }

    /// Controls equivalent to the ones handed to the `buttons` hook.
    #[must_use]
    pub fn controls(&self) -> SwipeButtons {
        SwipeButtons {
            shared: Rc::downgrade(&self.shared),
        }
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listeners.is_active()
    }

    /// Build this frame's view, running the `buttons` hook.
    pub fn render(&self) -> SwipeView<'_, C, B> {
        SwipeView {
            transform: self.transform(),
            content: &self.content,
            buttons: self.buttons.as_ref().map(|hook| hook(self.controls())),
        }
    }

    /// Release the window listeners and hand back the content.
    pub fn unmount(self) -> C {
        let Self {
            content,
            mut listeners,
            ..
        } = self;
        let released = listeners.release();

        #[cfg(feature = "tracing")]
        tracing::debug!(released, "swipeable.unmount");
        #[cfg(not(feature = "tracing"))]
        let _ = released;

        content
    }
}

impl<C: fmt::Debug, B> fmt::Debug for Swipeable<C, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Swipeable")
            .field("content", &self.content)
            .field("phase", &self.phase())
            .field("state", &self.state())
            .field("frame", &self.frame())
            .field("listener", &self.listeners.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn run_until_idle<C, B>(swipeable: &Swipeable<C, B>) {
        for _ in 0..600 {
            swipeable.advance(FRAME);
            if !swipeable.is_animating() && swipeable.phase() == SwipePhase::Idle {
                return;
            }
        }
        panic!("swipeable did not come to rest: {:?}", swipeable.phase());
    }

    #[test]
    fn mount_rejects_invalid_limit() {
        let hub = PointerHub::new();
        let err = Swipeable::builder(()).limit(0.0).mount(&hub).unwrap_err();
        assert!(matches!(err, SwipeConfigError::InvalidLimit { .. }));
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn mount_rejects_invalid_spring() {
        let hub = PointerHub::new();
        let unsettling = [
            SpringConfig {
                rest_speed_threshold: f64::NAN,
                ..SpringConfig::SWIPE
            },
            SpringConfig {
                friction: 0.0,
                overshoot_clamping: false,
                ..SpringConfig::SWIPE
            },
        ];
        for spring in unsettling {
            let err = Swipeable::builder(()).spring(spring).mount(&hub).unwrap_err();
            assert!(matches!(err, SwipeConfigError::InvalidSpring { .. }));
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn frictionless_clamped_spring_still_resets() {
        let hub = PointerHub::new();
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        let swipeable = Swipeable::builder(())
            .spring(SpringConfig {
                friction: 0.0,
                ..SpringConfig::SWIPE
            })
            .immediacy(ImmediacyPolicy::PristineOnly)
            .on_after_swipe(move || inner.set(inner.get() + 1))
            .mount(&hub)
            .unwrap();
        swipeable.force_swipe(Direction::Left);
        swipeable.drag_start(0.0);
        swipeable.drag_move(500.0);
        swipeable.drag_end();
        run_until_idle(&swipeable);
        assert_eq!(count.get(), 2);
        assert_eq!(swipeable.state(), GestureState::INITIAL);
    }

    #[test]
    fn mount_starts_at_rest() {
        let hub = PointerHub::new();
        let swipeable = Swipeable::builder("card").mount(&hub).unwrap();
        assert_eq!(swipeable.frame(), SwipeFrame::REST);
        assert_eq!(swipeable.state(), GestureState::INITIAL);
        assert_eq!(*swipeable.content(), "card");
        assert!(swipeable.is_listening());
    }

    #[test]
    fn drag_moves_surface_through_driver() {
        let hub = PointerHub::new();
        let swipeable = Swipeable::builder(()).mount(&hub).unwrap();
        swipeable.drag_start(0.0);
        swipeable.drag_move(80.0);
        run_until_settled(&swipeable);
        let frame = swipeable.frame();
        assert_eq!(frame.offset, 60.0);
        assert!((frame.opacity - 0.5).abs() < 1e-9);
        assert_eq!(swipeable.transform().rotate_degrees, 6.0);
    }

    fn run_until_settled<C, B>(swipeable: &Swipeable<C, B>) {
        for _ in 0..600 {
            swipeable.advance(FRAME);
            if !swipeable.is_animating() {
                return;
            }
        }
        panic!("driver did not settle");
    }

    #[test]
    fn auto_confirm_without_hook() {
        let hub = PointerHub::new();
        let swiped = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&swiped);
        let swipeable = Swipeable::builder(())
            .on_swipe(move |direction| sink.borrow_mut().push(direction))
            .mount(&hub)
            .unwrap();
        swipeable.force_swipe(Direction::Right);
        assert_eq!(*swiped.borrow(), vec![Direction::Right]);
        assert_eq!(swipeable.phase(), SwipePhase::SwipingOut);
        run_until_idle(&swipeable);
        assert_eq!(swipeable.state(), GestureState::INITIAL);
    }

    #[test]
    fn hook_sees_committed_state() {
        let hub = PointerHub::new();
        let controls: Rc<RefCell<Option<SwipeButtons>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));
        let (inner_controls, inner_count) = (Rc::clone(&controls), Rc::clone(&count));
        let swipeable = Swipeable::builder(())
            .on_swipe(move |_| {
                inner_count.set(inner_count.get() + 1);
                // Re-entrant force swipe from inside the commit hook is ignored.
                let accepted = inner_controls
                    .borrow()
                    .as_ref()
                    .is_some_and(|controls| controls.swipe(Direction::Left));
                assert!(!accepted);
            })
            .mount(&hub)
            .unwrap();
        *controls.borrow_mut() = Some(swipeable.controls());
        swipeable.force_swipe(Direction::Right);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn after_swipe_hook_sees_reset_state() {
        let hub = PointerHub::new();
        let controls: Rc<RefCell<Option<SwipeButtons>>> = Rc::new(RefCell::new(None));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (inner_controls, inner_seen) = (Rc::clone(&controls), Rc::clone(&seen));
        let swipeable = Swipeable::builder(())
            .on_after_swipe(move || {
                let slot = inner_controls.borrow();
                let Some(controls) = slot.as_ref() else {
                    return;
                };
                let state = controls
                    .shared
                    .upgrade()
                    .map(|shared| shared.machine.borrow().state());
                // Swipe again from the hook once; it must not hit AlreadySwiped.
                let first = inner_seen.borrow().is_empty();
                let accepted = first && controls.swipe(Direction::Left);
                inner_seen.borrow_mut().push((state, accepted));
            })
            .mount(&hub)
            .unwrap();
        *controls.borrow_mut() = Some(swipeable.controls());

        swipeable.force_swipe(Direction::Right);
        run_until_idle(&swipeable);

        assert_eq!(
            *seen.borrow(),
            vec![
                (Some(GestureState::INITIAL), true),
                (Some(GestureState::INITIAL), false),
            ]
        );
        assert_eq!(swipeable.state(), GestureState::INITIAL);
    }

    #[test]
    fn unmount_releases_listener_and_returns_content() {
        let hub = PointerHub::new();
        let swipeable = Swipeable::builder(String::from("body")).mount(&hub).unwrap();
        let controls = swipeable.controls();
        assert_eq!(hub.listener_count(), 1);
        assert_eq!(swipeable.unmount(), "body");
        assert_eq!(hub.listener_count(), 0);
        assert!(!controls.swipe(Direction::Left));
    }

    #[test]
    fn window_events_ignored_after_drop() {
        let hub = PointerHub::new();
        let swipeable = Swipeable::builder(()).mount(&hub).unwrap();
        drop(swipeable);
        assert_eq!(hub.dispatch(&PointerEvent::mouse_move(10.0)), 0);
    }
}
