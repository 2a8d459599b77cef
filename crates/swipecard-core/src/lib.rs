// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: swipe gesture lifecycle, pointer normalization, and spring motion.
//!
//! # Role in swipecard
//! `swipecard-core` is the host-independent layer. It owns the swipe state
//! machine, the pure offset/opacity helpers, the window-level pointer
//! listener hub, and the animation driver boundary that the widget layer
//! (`swipecard-widgets`) coordinates.
//!
//! # Primary responsibilities
//! - **SwipeMachine**: deterministic drag → decision → commit/cancel → settle
//!   lifecycle with explicit no-op diagnostics.
//! - **Geometry**: drag offset, direction, clamped limit offset, opacity fade.
//! - **PointerEvent**: mouse/touch events and x-coordinate normalization.
//! - **PointerHub**: window-level listeners with RAII deregistration.
//! - **Animation**: spring physics and the [`AnimationDriver`] trait.
//!
//! [`AnimationDriver`]: animation::AnimationDriver

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod pointer_hub;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
