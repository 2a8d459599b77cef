#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! Mouse and touch input arrive with different shapes: a mouse event carries
//! its own page coordinates, a touch event carries a list of touch points.
//! [`PointerEvent::normalized_x`] folds both into one horizontal coordinate.
//!
//! # Design Notes
//!
//! - Coordinates are page-relative pixels (`pageX` / `pageY` on the web).
//! - Missing or non-finite coordinates normalize to `None`; callers ignore
//!   such events instead of failing.
//! - A touch list that is present always wins over the event's own
//!   coordinates, even when it is empty.

use bitflags::bitflags;

/// Kind of pointer event, named after the host events that produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
}

/// Lifecycle phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

impl PointerEventKind {
    #[must_use]
    pub const fn phase(self) -> PointerPhase {
        match self {
            Self::MouseDown | Self::TouchStart => PointerPhase::Start,
            Self::MouseMove | Self::TouchMove => PointerPhase::Move,
            Self::MouseUp | Self::TouchEnd => PointerPhase::End,
        }
    }

    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchMove | Self::TouchEnd)
    }

    /// The listener flag that receives this kind of event.
    #[must_use]
    pub const fn listener_kind(self) -> PointerListenerKinds {
        match self {
            Self::MouseDown => PointerListenerKinds::MOUSE_DOWN,
            Self::MouseMove => PointerListenerKinds::MOUSE_MOVE,
            Self::MouseUp => PointerListenerKinds::MOUSE_UP,
            Self::TouchStart => PointerListenerKinds::TOUCH_START,
            Self::TouchMove => PointerListenerKinds::TOUCH_MOVE,
            Self::TouchEnd => PointerListenerKinds::TOUCH_END,
        }
    }
}

bitflags! {
    /// Set of pointer event kinds a listener subscribes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerListenerKinds: u8 {
        const MOUSE_DOWN = 0b0000_0001;
        const MOUSE_MOVE = 0b0000_0010;
        const MOUSE_UP = 0b0000_0100;
        const TOUCH_START = 0b0000_1000;
        const TOUCH_MOVE = 0b0001_0000;
        const TOUCH_END = 0b0010_0000;

        /// Window-level kinds a drag needs after it started on the surface.
        const DRAG_TRACKING = Self::MOUSE_MOVE.bits()
            | Self::TOUCH_MOVE.bits()
            | Self::MOUSE_UP.bits()
            | Self::TOUCH_END.bits();
    }
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u32,
    pub page_x: f64,
    pub page_y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(id: u32, page_x: f64, page_y: f64) -> Self {
        Self { id, page_x, page_y }
    }
}

/// A mouse or touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// The event's own page x-coordinate, if the host supplied one.
    pub page_x: Option<f64>,
    /// The event's own page y-coordinate, if the host supplied one.
    pub page_y: Option<f64>,
    /// Touch list, present on touch events.
    pub touches: Option<Vec<TouchPoint>>,
}

impl PointerEvent {
    /// A mouse event at page coordinates `(x, y)`.
    #[must_use]
    pub fn mouse(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            page_x: Some(x),
            page_y: Some(y),
            touches: None,
        }
    }

    /// A touch event carrying `touches`.
    #[must_use]
    pub fn touch(kind: PointerEventKind, touches: Vec<TouchPoint>) -> Self {
        Self {
            kind,
            page_x: None,
            page_y: None,
            touches: Some(touches),
        }
    }

    #[must_use]
    pub fn mouse_down(x: f64) -> Self {
        Self::mouse(PointerEventKind::MouseDown, x, 0.0)
    }

    #[must_use]
    pub fn mouse_move(x: f64) -> Self {
        Self::mouse(PointerEventKind::MouseMove, x, 0.0)
    }

    #[must_use]
    pub fn mouse_up() -> Self {
        Self {
            kind: PointerEventKind::MouseUp,
            page_x: None,
            page_y: None,
            touches: None,
        }
    }

    #[must_use]
    pub fn touch_start(x: f64) -> Self {
        Self::touch(PointerEventKind::TouchStart, vec![TouchPoint::new(0, x, 0.0)])
    }

    #[must_use]
    pub fn touch_move(x: f64) -> Self {
        Self::touch(PointerEventKind::TouchMove, vec![TouchPoint::new(0, x, 0.0)])
    }

    /// A touch end; the lifted finger is no longer in the touch list.
    #[must_use]
    pub fn touch_end() -> Self {
        Self::touch(PointerEventKind::TouchEnd, Vec::new())
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> PointerPhase {
        self.kind.phase()
    }

    /// Horizontal coordinate of the event.
    ///
    /// If a touch list is present, the first touch point's x-coordinate is
    /// used; otherwise the event's own x-coordinate. Returns `None` when that
    /// coordinate is absent or not finite.
    #[must_use]
    pub fn normalized_x(&self) -> Option<f64> {
        let x = match &self.touches {
            Some(touches) => touches.first().map(|point| point.page_x),
            None => self.page_x,
        };
        x.filter(|x| x.is_finite())
    }
}

/// Free-function form of [`PointerEvent::normalized_x`].
#[inline]
#[must_use]
pub fn normalize_x(event: &PointerEvent) -> Option<f64> {
    event.normalized_x()
}
