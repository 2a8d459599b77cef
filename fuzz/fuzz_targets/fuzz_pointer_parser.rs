#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use swipecard_core::pointer_hub::PointerHub;
use swipecard_web::route_encoded;
use swipecard_widgets::Swipeable;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // One record per line; the parser must never panic and routing any
    // accepted record must keep the widget consistent.
    let hub = PointerHub::new();
    let Ok(surface) = Swipeable::builder(()).mount(&hub) else {
        return;
    };
    for line in text.lines() {
        let _ = route_encoded(line, &hub, &surface);
        surface.advance(Duration::from_millis(16));

        let state = surface.state();
        assert!(!(state.moving && state.swiped), "moving and swiped: {state:?}");
        if state.swiped {
            assert_eq!(state.offset.abs(), surface.config().limit);
        }
    }
});
