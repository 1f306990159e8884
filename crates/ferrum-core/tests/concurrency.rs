// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::sync::Arc;
use std::thread;

use ferrum_core::prelude::*;
use ferrum_core::{EngineConfig, EngineSection};

fn engine(parallel_threshold: usize) -> Engine {
    Engine::with_config(EngineConfig {
        engine: EngineSection {
            threads: 4,
            parallel_threshold,
        },
        ..EngineConfig::default()
    })
    .unwrap()
}

#[test]
fn shared_engine_serves_many_threads() {
    let engine = Arc::new(engine(usize::MAX));
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let base = worker as f32;
                let a: Vec<f32> = (0..257).map(|i| base + i as f32).collect();
                let b: Vec<f32> = (0..257).map(|i| i as f32 * 2.0).collect();
                for _ in 0..50 {
                    let sum = engine.binary("add", &a, &b).unwrap();
                    for (i, value) in sum.iter().enumerate() {
                        assert_eq!(*value, base + 3.0 * i as f32);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn parallel_results_match_sequential_results() {
    let sequential = engine(usize::MAX);
    let parallel = engine(1);
    let a: Vec<f32> = (0..50_000).map(|i| (i as f32 * 0.001).sin()).collect();
    let b: Vec<f32> = (0..50_000).map(|i| 1.0 + (i % 97) as f32).collect();

    for name in ["add", "mul", "div", "atan2", "frem", "hypot"] {
        let expected = sequential.binary(name, &a, &b).unwrap();
        let got = parallel.binary(name, &a, &b).unwrap();
        assert_eq!(expected, got, "{name}");
    }

    let strided = BufferView::strided(&a, 3, 7).unwrap();
    assert_eq!(
        sequential.unary("cdf_norm", strided).unwrap(),
        parallel.unary("cdf_norm", strided).unwrap()
    );
}

#[test]
fn close_during_concurrent_calls_is_observed_cleanly() {
    let engine = Arc::new(engine(usize::MAX));
    let input = vec![4.0f32; 1024];

    thread::scope(|scope| {
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            let input = &input;
            scope.spawn(move || loop {
                match engine.unary("sqrt", input) {
                    Ok(out) => assert!(out.iter().all(|v| *v == 2.0)),
                    Err(FerrumError::UseAfterClose) => break,
                    Err(other) => panic!("unexpected error: {other}"),
                }
            });
        }
        engine.close().unwrap();
    });

    assert!(!engine.is_open());
}

#[test]
fn engine_handle_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}
