#![forbid(unsafe_code)]

//! A queue of cards dismissed one at a time.
//!
//! The deck mounts a single [`Swipeable`] surface for the top card. A commit
//! records its direction; the settled fly-out removes the top card, after
//! which the next card is shown on the same (reset) surface. When the last
//! card is gone the surface is unmounted and its window listeners released.
//!
//! The caller's `on_swipe` / `on_after_swipe` hooks run after the deck's own
//! bookkeeping, so they already observe the updated deck.

use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use swipecard_core::event::PointerEvent;
use swipecard_core::geometry::{Direction, SwipeTransform};
use swipecard_core::gesture::{SwipeConfigError, SwipeTransition};
use swipecard_core::pointer_hub::PointerHub;
use web_time::Instant;

use crate::swipeable::{AfterSwipeHook, SwipeButtons, SwipeHook, Swipeable, SwipeableBuilder};

/// What a host draws for one deck frame.
pub struct DeckView<'a, T, B> {
    /// Card on the swipeable surface.
    pub top: Ref<'a, T>,
    /// Card revealed underneath, if any.
    pub next: Option<Ref<'a, T>>,
    pub transform: SwipeTransform,
    /// Output of the `buttons` render hook.
    pub buttons: Option<B>,
}

/// Swipeable stack of `T`.
pub struct CardDeck<T, B = ()> {
    cards: Rc<RefCell<VecDeque<T>>>,
    last_direction: Rc<Cell<Option<Direction>>>,
    surface: Option<Swipeable<(), B>>,
}

impl<T: 'static, B> CardDeck<T, B> {
    /// Mount a deck over `cards` using `builder` for the shared surface.
    ///
    /// The builder's configuration is validated even when `cards` is empty.
    pub fn mount(
        cards: impl IntoIterator<Item = T>,
        builder: SwipeableBuilder<(), B>,
        hub: &PointerHub,
    ) -> Result<Self, SwipeConfigError> {
        let cards = Rc::new(RefCell::new(cards.into_iter().collect::<VecDeque<T>>()));
        let last_direction = Rc::new(Cell::new(None));

        let on_swipe: SwipeHook = {
            let last_direction = Rc::clone(&last_direction);
            Rc::new(move |direction| last_direction.set(Some(direction)))
        };
        let on_after_swipe: AfterSwipeHook = {
            let cards = Rc::clone(&cards);
            Rc::new(move || {
                cards.borrow_mut().pop_front();
            })
        };
        let surface = builder.prepend_hooks(on_swipe, on_after_swipe).mount(hub)?;
        let surface = (!cards.borrow().is_empty()).then_some(surface);

        Ok(Self {
            cards,
            last_direction,
            surface,
        })
    }

    /// Card currently on the surface.
    #[must_use]
    pub fn top(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.cards.borrow(), VecDeque::front).ok()
    }

    /// Card shown once the top card is dismissed.
    #[must_use]
    pub fn next(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.cards.borrow(), |cards| cards.get(1)).ok()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.borrow().is_empty()
    }

    /// Direction of the most recent commit.
    #[must_use]
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction.get()
    }

    /// The mounted surface; `None` once the deck is empty.
    #[must_use]
    pub fn surface(&self) -> Option<&Swipeable<(), B>> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn controls(&self) -> Option<SwipeButtons> {
        self.surface.as_ref().map(Swipeable::controls)
    }

    /// Surface pointer-down; ignored once the deck is empty.
    pub fn pointer_down(&self, event: &PointerEvent) -> Option<SwipeTransition> {
        self.surface
            .as_ref()
            .map(|surface| surface.pointer_down(event))
    }

    /// Advance the surface animation by `dt`.
    ///
    /// Returns the surface transform, or `None` once the deck is empty.
    pub fn advance(&mut self, dt: Duration) -> Option<SwipeTransform> {
        let transform = self.surface.as_ref().map(|surface| {
            surface.advance(dt);
            surface.transform()
        });
        self.unmount_if_empty();
        transform.filter(|_| self.surface.is_some())
    }

    /// Advance the surface animation to the frame clock reading `now`.
    pub fn tick(&mut self, now: Instant) -> Option<SwipeTransform> {
        let transform = self.surface.as_ref().map(|surface| {
            surface.tick(now);
            surface.transform()
        });
        self.unmount_if_empty();
        transform.filter(|_| self.surface.is_some())
    }

    /// Build this frame's view, or `None` once the deck is empty.
    pub fn render(&self) -> Option<DeckView<'_, T, B>> {
        let surface = self.surface.as_ref()?;
        let top = self.top()?;
        let view = surface.render();
        Some(DeckView {
            top,
            next: self.next(),
            transform: view.transform,
            buttons: view.buttons,
        })
    }

    fn unmount_if_empty(&mut self) {
        if self.cards.borrow().is_empty()
            && let Some(surface) = self.surface.take()
        {
            surface.unmount();
        }
    }
}

impl<T: fmt::Debug, B> fmt::Debug for CardDeck<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDeck")
            .field("cards", &self.cards.borrow())
            .field("last_direction", &self.last_direction.get())
            .field("mounted", &self.surface.is_some())
            .finish()
    }
}
