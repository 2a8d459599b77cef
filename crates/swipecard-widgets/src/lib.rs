#![forbid(unsafe_code)]

//! Swipe-to-dismiss widgets.
//!
//! [`Swipeable`] wraps caller content in a draggable surface that commits a
//! left/right swipe once dragged past a limit (or when told to through
//! [`SwipeButtons`]), lets the caller intercept the swipe through a
//! [`SwipeDecision`], and reports the commit and the settled fly-out.
//! [`CardDeck`] stacks a queue of cards on one swipeable surface.

pub mod card_deck;
pub mod swipeable;

pub use card_deck::CardDeck;
pub use swipeable::{SwipeButtons, SwipeDecision, SwipeView, Swipeable, SwipeableBuilder};
pub use swipecard_core::geometry::{Direction, SwipeTransform};
pub use swipecard_core::gesture::{ImmediacyPolicy, SwipeConfig, SwipeConfigError, SwipePhase};
