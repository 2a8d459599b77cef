//! Reference swipe scenarios, exercised on a mounted widget.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use swipecard_core::geometry::Direction;
use swipecard_core::gesture::{GestureState, SwipeEffect, SwipePhase};
use swipecard_core::pointer_hub::PointerHub;
use swipecard_widgets::{SwipeDecision, Swipeable, SwipeableBuilder};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Default)]
struct Calls {
    swipes: RefCell<Vec<Direction>>,
    after: Cell<u32>,
}

fn observed(calls: &Rc<Calls>) -> SwipeableBuilder<()> {
    let (on_swipe, on_after) = (Rc::clone(calls), Rc::clone(calls));
    Swipeable::builder(())
        .on_swipe(move |direction| on_swipe.swipes.borrow_mut().push(direction))
        .on_after_swipe(move || on_after.after.set(on_after.after.get() + 1))
}

fn settle<C, B>(swipeable: &Swipeable<C, B>) {
    for _ in 0..600 {
        swipeable.advance(FRAME);
        if !swipeable.is_animating() && swipeable.phase() == SwipePhase::Idle {
            return;
        }
    }
    panic!("swipeable did not settle: {:?}", swipeable.phase());
}

#[test]
fn scenario_a_left_swipe_commits_and_resets() {
    let hub = PointerHub::new();
    let calls = Rc::new(Calls::default());
    let swipeable = observed(&calls).mount(&hub).unwrap();

    swipeable.drag_start(500.0);
    assert_eq!(
        swipeable.drag_move(0.0).effect,
        SwipeEffect::DragMoved { offset: -375.0 }
    );
    swipeable.drag_end();
    assert_eq!(*calls.swipes.borrow(), vec![Direction::Left]);
    assert_eq!(calls.after.get(), 0);
    assert_eq!(swipeable.state().offset, -120.0);

    settle(&swipeable);
    assert_eq!(*calls.swipes.borrow(), vec![Direction::Left]);
    assert_eq!(calls.after.get(), 1);
    assert_eq!(swipeable.state(), GestureState::INITIAL);
}

#[test]
fn scenario_b_right_swipe_commits() {
    let hub = PointerHub::new();
    let calls = Rc::new(Calls::default());
    let swipeable = observed(&calls).mount(&hub).unwrap();

    swipeable.drag_start(0.0);
    swipeable.drag_move(500.0);
    assert_eq!(swipeable.state().offset, 375.0);
    swipeable.drag_end();
    assert_eq!(*calls.swipes.borrow(), vec![Direction::Right]);
}

#[test]
fn scenario_c_below_limit_cancels() {
    let hub = PointerHub::new();
    let calls = Rc::new(Calls::default());
    let swipeable = observed(&calls).limit(500.0).mount(&hub).unwrap();

    // 400px of pointer travel is 300px of offset; 200px is 150px.
    swipeable.drag_start(400.0);
    swipeable.drag_move(0.0);
    assert_eq!(swipeable.state().offset, -300.0);
    swipeable.drag_move(200.0);
    assert_eq!(swipeable.state().offset, -150.0);
    assert_eq!(swipeable.drag_end().effect, SwipeEffect::Cancelled);
    settle(&swipeable);

    assert!(calls.swipes.borrow().is_empty());
    assert_eq!(calls.after.get(), 0);
    let state = swipeable.state();
    assert_eq!((state.start, state.offset, state.moving), (0.0, 0.0, false));
    assert!(!state.swiped);
}

#[test]
fn scenario_d_double_force_swipe_commits_once() {
    let hub = PointerHub::new();
    let calls = Rc::new(Calls::default());
    let pending: Rc<RefCell<Vec<SwipeDecision>>> = Rc::new(RefCell::new(Vec::new()));
    let store = Rc::clone(&pending);
    let swipeable = observed(&calls)
        .on_before_swipe(move |decision| store.borrow_mut().push(decision))
        .mount(&hub)
        .unwrap();

    swipeable.force_swipe(Direction::Left);
    let second = swipeable.force_swipe(Direction::Left);
    assert!(second.effect.is_noop());
    assert_eq!(pending.borrow().len(), 1);

    let decision = pending.borrow_mut().pop().unwrap();
    decision.confirm();
    assert!(swipeable.force_swipe(Direction::Left).effect.is_noop());
    settle(&swipeable);

    assert_eq!(*calls.swipes.borrow(), vec![Direction::Left]);
    assert_eq!(calls.after.get(), 1);
}

#[test]
fn scenario_d_without_hook() {
    let hub = PointerHub::new();
    let calls = Rc::new(Calls::default());
    let swipeable = observed(&calls).mount(&hub).unwrap();
    let controls = swipeable.controls();
    controls.left();
    controls.left();
    settle(&swipeable);
    assert_eq!(*calls.swipes.borrow(), vec![Direction::Left]);
    assert_eq!(calls.after.get(), 1);
}

#[test]
fn scenario_e_hook_cancel_keeps_widget_interactive() {
    let hub = PointerHub::new();
    let calls = Rc::new(Calls::default());
    let allow = Rc::new(Cell::new(false));
    let gate = Rc::clone(&allow);
    let swipeable = observed(&calls)
        .on_before_swipe(move |decision| {
            if gate.get() {
                decision.confirm();
            } else {
                decision.cancel();
            }
        })
        .mount(&hub)
        .unwrap();

    swipeable.drag_start(500.0);
    swipeable.drag_move(0.0);
    swipeable.drag_end();
    assert_eq!(swipeable.phase(), SwipePhase::CancellingBack);
    assert!(calls.swipes.borrow().is_empty());
    let state = swipeable.state();
    assert_eq!((state.start, state.offset, state.moving), (0.0, 0.0, false));

    settle(&swipeable);
    allow.set(true);
    swipeable.drag_start(0.0);
    swipeable.drag_move(500.0);
    swipeable.drag_end();
    assert_eq!(*calls.swipes.borrow(), vec![Direction::Right]);
}

#[test]
fn scenario_f_hook_redirects_commit() {
    let hub = PointerHub::new();
    let calls = Rc::new(Calls::default());
    let detected = Rc::new(Cell::new(None));
    let seen = Rc::clone(&detected);
    let swipeable = observed(&calls)
        .on_before_swipe(move |decision| {
            seen.set(Some(decision.direction()));
            decision.confirm_with(Direction::Right);
        })
        .mount(&hub)
        .unwrap();

    swipeable.drag_start(500.0);
    swipeable.drag_move(0.0);
    swipeable.drag_end();
    assert_eq!(detected.get(), Some(Direction::Left));
    assert_eq!(*calls.swipes.borrow(), vec![Direction::Right]);
    assert_eq!(swipeable.state().offset, 120.0);
}
