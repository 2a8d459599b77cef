//! `swipe.transition` spans carry the from/to phases and the effect name.
//!
//! Run with: `cargo test -p swipecard-core --features tracing`

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};

use swipecard_core::geometry::Direction;
use swipecard_core::gesture::{SwipeConfig, SwipeMachine};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Default, Clone, PartialEq)]
struct CapturedTransition {
    from: String,
    to: String,
    effect: String,
}

struct TransitionCapture {
    spans: Arc<Mutex<Vec<CapturedTransition>>>,
}

struct FieldVisitor<'a>(&'a mut CapturedTransition);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "effect" {
            self.0.effect = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{value:?}").trim_matches('"').to_string();
        match field.name() {
            "from" => self.0.from = rendered,
            "to" => self.0.to = rendered,
            "effect" => self.0.effect = rendered,
            _ => {}
        }
    }
}

impl<S> Layer<S> for TransitionCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        if attrs.metadata().name() != "swipe.transition" {
            return;
        }
        let mut captured = CapturedTransition::default();
        attrs.record(&mut FieldVisitor(&mut captured));
        self.spans.lock().expect("capture lock").push(captured);
    }
}

fn captured(from: &str, to: &str, effect: &str) -> CapturedTransition {
    CapturedTransition {
        from: from.to_string(),
        to: to.to_string(),
        effect: effect.to_string(),
    }
}

#[test]
fn transitions_emit_spans() {
    let spans = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(TransitionCapture {
        spans: Arc::clone(&spans),
    });

    tracing::subscriber::with_default(subscriber, || {
        let mut machine = SwipeMachine::new(SwipeConfig::default()).unwrap();
        let request = machine.force_swipe(Direction::Left);
        let pending = machine.pending_decision().unwrap();
        assert_eq!(request.to.to_string(), "resolving");
        machine.confirm(pending.ticket, None);
        machine.drag_end();
        machine.settle();
    });

    let spans = spans.lock().unwrap();
    assert_eq!(
        *spans,
        vec![
            captured("idle", "resolving", "swipe_requested"),
            captured("resolving", "swiping_out", "committed"),
            captured("swiping_out", "swiping_out", "noop"),
            captured("swiping_out", "idle", "reset"),
        ]
    );
}
