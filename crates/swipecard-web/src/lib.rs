#![forbid(unsafe_code)]

//! Browser host adapter for swipecard.
//!
//! The host page forwards raw pointer input either as [`PointerEvent`]s or,
//! with the `input-parser` feature, as JSON records decoded by
//! [`input_parser::parse_encoded_pointer`]. [`route_pointer`] then sends
//! each event where the DOM would: start events to the draggable surface,
//! move and end events to the window-level [`PointerHub`].
//!
//! [`PointerEvent`]: swipecard_core::event::PointerEvent
//! [`PointerHub`]: swipecard_core::pointer_hub::PointerHub

#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod route;

#[cfg(feature = "input-parser")]
pub use input_parser::{InputParseError, parse_encoded_pointer};
#[cfg(feature = "input-parser")]
pub use route::route_encoded;
pub use route::{PointerRoute, route_pointer};
