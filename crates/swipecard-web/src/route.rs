#![forbid(unsafe_code)]

//! Pointer event routing.
//!
//! On the page, a drag starts with a mouse-down / touch-start on the
//! draggable surface, but the moves and the release are observed on the
//! window so the drag keeps tracking when the pointer leaves the card.
//! [`route_pointer`] reproduces that split for a host that receives every
//! pointer event in one stream.

use swipecard_core::event::{PointerEvent, PointerPhase};
use swipecard_core::gesture::SwipeTransition;
use swipecard_core::pointer_hub::PointerHub;
use swipecard_widgets::Swipeable;

/// Where a routed event went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRoute {
    /// Delivered to the surface as a drag start.
    Surface(SwipeTransition),
    /// Dispatched on the window hub to `delivered` listeners.
    Window { delivered: usize },
}

/// Route `event`: start events to `surface`, everything else through `hub`.
pub fn route_pointer<C, B>(
    event: &PointerEvent,
    hub: &PointerHub,
    surface: &Swipeable<C, B>,
) -> PointerRoute {
    match event.phase() {
        PointerPhase::Start => PointerRoute::Surface(surface.pointer_down(event)),
        PointerPhase::Move | PointerPhase::End => PointerRoute::Window {
            delivered: hub.dispatch(event),
        },
    }
}

/// Parse a host-encoded record and route it.
///
/// Returns `Ok(None)` for records without a pointer mapping.
#[cfg(feature = "input-parser")]
pub fn route_encoded<C, B>(
    json: &str,
    hub: &PointerHub,
    surface: &Swipeable<C, B>,
) -> Result<Option<PointerRoute>, crate::input_parser::InputParseError> {
    let event = crate::input_parser::parse_encoded_pointer(json)?;
    Ok(event.map(|event| route_pointer(&event, hub, surface)))
}
