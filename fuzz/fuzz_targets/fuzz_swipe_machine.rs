#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use swipecard_core::geometry::Direction;
use swipecard_core::gesture::{
    GestureState, SwipeConfig, SwipeEffect, SwipeMachine, SwipeNoopReason,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Start(i16),
    Move(i16),
    End,
    Force(bool),
    Confirm(Option<bool>),
    Cancel,
    StaleConfirm,
    Settle,
}

fn direction(right: bool) -> Direction {
    if right { Direction::Right } else { Direction::Left }
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let (limit, ops) = input;
    let Ok(mut machine) =
        SwipeMachine::new(SwipeConfig::default().with_limit(f64::from(limit.max(1))))
    else {
        return;
    };
    let mut latest_ticket = None;
    let mut stale_ticket = None;

    for op in ops.iter().take(256) {
        let transition = match *op {
            Op::Start(x) => machine.drag_start(Some(f64::from(x))),
            Op::Move(x) => machine.drag_move(Some(f64::from(x))),
            Op::End => machine.drag_end(),
            Op::Force(right) => machine.force_swipe(direction(right)),
            Op::Confirm(redirect) => match machine.pending_decision() {
                Some(pending) => machine.confirm(pending.ticket, redirect.map(direction)),
                None => continue,
            },
            Op::Cancel => match machine.pending_decision() {
                Some(pending) => machine.cancel(pending.ticket),
                None => continue,
            },
            Op::StaleConfirm => match (stale_ticket, machine.pending_decision()) {
                (Some(old), Some(pending)) if old != pending.ticket => {
                    let t = machine.confirm(old, None);
                    assert_eq!(t.effect, SwipeEffect::Noop(SwipeNoopReason::StaleDecision));
                    t
                }
                _ => continue,
            },
            Op::Settle => machine.settle(),
        };

        if let SwipeEffect::SwipeRequested { ticket, .. } = transition.effect {
            stale_ticket = latest_ticket.replace(ticket);
        }
        if transition.effect == SwipeEffect::Reset {
            assert_eq!(machine.state(), GestureState::INITIAL);
        }
        assert_eq!(transition.to, machine.phase());
        let state = machine.state();
        assert!(!(state.moving && state.swiped));
    }
});
