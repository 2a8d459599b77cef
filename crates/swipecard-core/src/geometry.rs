#![forbid(unsafe_code)]

//! Horizontal swipe geometry.
//!
//! Pure, stateless helpers shared by the state machine and the render path.
//! All values are in host pixels along the x axis; positive offsets move the
//! card to the right.

use std::fmt;

/// Drag sensitivity: the card moves 0.75px per pixel of pointer travel.
pub const DRAG_RESISTANCE: f64 = 0.75;

/// Default swipe commit threshold in pixels.
pub const DEFAULT_LIMIT: f64 = 120.0;

/// The card rotates one degree per this many pixels of offset.
pub const ROTATION_DIVISOR: f64 = 10.0;

/// Horizontal swipe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Direction for a signed offset. Zero (and NaN) map to [`Direction::Left`].
    #[inline]
    #[must_use]
    pub fn from_offset(offset: f64) -> Self {
        if offset > 0.0 { Self::Right } else { Self::Left }
    }

    /// `1.0` for right, `-1.0` for left.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction for a signed offset (`offset > 0` is right, everything else left).
#[inline]
#[must_use]
pub fn direction(offset: f64) -> Direction {
    Direction::from_offset(offset)
}

/// Card offset for a drag from `start` to `end`, scaled by [`DRAG_RESISTANCE`].
#[inline]
#[must_use]
pub fn drag_offset(start: f64, end: f64) -> f64 {
    -((start - end) * DRAG_RESISTANCE)
}

/// Fully extended offset for a committed swipe.
#[inline]
#[must_use]
pub fn limit_offset(limit: f64, direction: Direction) -> f64 {
    limit * direction.sign()
}

/// Card opacity for `offset`.
///
/// Opacity stays at 1.0 while `|offset|` is below `fade_start`, then fades
/// linearly to 0.0 at `|offset| == limit`. The result is clamped to
/// `[0.0, 1.0]`. A degenerate span (`limit == fade_start`) is a hard step at
/// the limit.
#[must_use]
pub fn opacity(offset: f64, limit: f64, fade_start: f64) -> f64 {
    let distance = offset.abs();
    let span = (limit - fade_start).abs();
    if span <= f64::EPSILON {
        return if distance >= limit.abs() { 0.0 } else { 1.0 };
    }
    let faded = if distance < fade_start {
        0.0
    } else {
        (distance - fade_start) / span
    };
    (1.0 - faded).clamp(0.0, 1.0)
}

/// Card rotation in degrees for `offset`.
#[inline]
#[must_use]
pub fn rotation_degrees(offset: f64) -> f64 {
    offset / ROTATION_DIVISOR
}

/// Interpolated visual values for the card: offset and opacity.
///
/// This is the pair the animation driver interpolates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeFrame {
    pub offset: f64,
    pub opacity: f64,
}

impl SwipeFrame {
    /// The card at rest: no displacement, fully opaque.
    pub const REST: Self = Self {
        offset: 0.0,
        opacity: 1.0,
    };

    #[inline]
    #[must_use]
    pub const fn new(offset: f64, opacity: f64) -> Self {
        Self { offset, opacity }
    }

    /// The transform a host applies to the draggable surface.
    #[must_use]
    pub fn transform(&self) -> SwipeTransform {
        SwipeTransform {
            translate_x: self.offset,
            rotate_degrees: rotation_degrees(self.offset),
            opacity: self.opacity,
        }
    }
}

impl Default for SwipeFrame {
    fn default() -> Self {
        Self::REST
    }
}

/// Visual transform of the draggable surface:
/// `translateX(translate_x px) rotate(rotate_degrees deg)` at `opacity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTransform {
    pub translate_x: f64,
    pub rotate_degrees: f64,
    pub opacity: f64,
}

impl fmt::Display for SwipeTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translateX({}px) rotate({}deg)",
            self.translate_x, self.rotate_degrees
        )
    }
}
