// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::sync::{Arc, Mutex};

use ferrum_core::prelude::*;
use ferrum_core::telemetry::{self, set_call_observer, KernelCallEvent};
use ferrum_core::EngineConfig;

// The observer is process-wide, so everything that installs one lives in a
// single test.
#[test]
fn observer_sees_successful_calls_only() {
    telemetry::init_tracing();
    telemetry::init_tracing();

    let engine = Engine::with_config(EngineConfig::default()).unwrap();
    let seen: Arc<Mutex<Vec<KernelCallEvent>>> = Arc::default();

    let sink = Arc::clone(&seen);
    let previous = set_call_observer(Some(Arc::new(move |event: &KernelCallEvent| {
        sink.lock().unwrap().push(event.clone());
    })));
    assert!(previous.is_none());

    engine.binary("mul", &[1.0f32, 2.0, 3.0], &[2.0f32; 3]).unwrap();
    engine.unary("nope", &[1.0f32]).unwrap_err();
    engine.binary_pair("swap", &[1.0f32], &[2.0f32]).unwrap();

    let events = seen.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            KernelCallEvent {
                name: "mul".into(),
                shape: Shape::Binary,
                len: 3,
                parallel: false,
            },
            KernelCallEvent {
                name: "swap".into(),
                shape: Shape::BinaryPair,
                len: 1,
                parallel: false,
            },
        ]
    );

    // A panicking observer is contained.
    set_call_observer(Some(Arc::new(|_: &KernelCallEvent| panic!("observer failure"))));
    let out = engine.unary("abs", &[-1.0f32]).unwrap();
    assert_eq!(out.into_vec(), vec![1.0f32]);

    assert!(set_call_observer(None).is_some());
}
