// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for the planner using proptest.
//!
//! These verify that for any structurally valid request table the allocator
//! either fails cleanly or produces a plan honoring its invariants:
//! backward-only sourcing, exact dilution/buffer splits, and supply never
//! exceeded.

use proptest::prelude::*;

use crate::datamodel::{Options, Request, RequestTable};
use crate::{allocator, plan_requests};

fn requests_strategy() -> impl Strategy<Value = Vec<Request>> {
    (2usize..7)
        .prop_flat_map(|n| {
            (
                500.0f64..1000.0,
                200.0f64..2000.0,
                prop::collection::vec((0.05f64..0.9, 20.0f64..300.0), n - 1),
            )
        })
        .prop_map(|(stock_concentration, stock_volume, targets)| {
            let mut rows = vec![Request {
                concentration: stock_concentration,
                volume: stock_volume,
            }];
            let mut concentration = stock_concentration;
            for (fraction, volume) in targets {
                // each factor is < 0.9, keeping the sequence strictly
                // decreasing
                concentration *= fraction;
                rows.push(Request {
                    concentration,
                    volume,
                });
            }
            rows
        })
}

fn leaway_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), Just(1.1), Just(1.5), 1.0f64..2.0]
}

proptest! {
    #[test]
    fn plan_honors_invariants(rows in requests_strategy(), leaway in leaway_strategy()) {
        let opts = Options { minimal_volume: 2.0, leaway_factor: leaway };
        let table = RequestTable::new(rows.clone(), leaway).unwrap();
        let Ok(plan) = allocator::plan(&table, &opts) else {
            // infeasible inputs must fail cleanly, which they just did
            return Ok(());
        };

        let raw = table.raw();
        let working = table.working();
        let n = plan.rows.len();
        prop_assert_eq!(n, rows.len());

        let mut demand: Vec<f64> = (0..n)
            .map(|idx| if idx == 0 { 0.0 } else { raw[idx].volume })
            .collect();

        for (idx, row) in plan.rows.iter().enumerate().skip(1) {
            let source = row.source.expect("every target row has a source");
            prop_assert!(source < idx, "row {} sourced from {}", idx, source);

            let dilution = row.dilution_volume.unwrap();
            let buffer = row.buffer_volume.unwrap();
            prop_assert!(dilution >= 0.0 && buffer >= 0.0);
            prop_assert!(
                (dilution + buffer - row.volume).abs() < 1e-9 * row.volume.max(1.0),
                "row {}: {} + {} != {}", idx, dilution, buffer, row.volume
            );

            demand[source] += dilution;
        }

        for idx in 0..n {
            let available = if idx == 0 { raw[0].volume } else { working[idx].volume };
            prop_assert!(
                demand[idx] <= available * (1.0 + 1e-12),
                "row {} oversubscribed: {} > {}", idx, demand[idx], available
            );
        }

        prop_assert!((plan.stock_demand() - demand[0]).abs() < 1e-9 * demand[0].max(1.0));
    }

    #[test]
    fn allocation_is_deterministic(rows in requests_strategy(), leaway in leaway_strategy()) {
        let opts = Options { minimal_volume: 2.0, leaway_factor: leaway };
        let first = plan_requests(rows.clone(), &opts);
        let second = plan_requests(rows, &opts);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn working_volumes_monotonic_in_leaway(
        rows in requests_strategy(),
        lo in 1.0f64..1.5,
        delta in 0.0f64..1.0,
    ) {
        let hi = lo + delta;
        let small = RequestTable::new(rows.clone(), lo).unwrap();
        let large = RequestTable::new(rows, hi).unwrap();
        for (a, b) in small.working().iter().zip(large.working()) {
            prop_assert!(b.volume >= a.volume);
        }
        // the stock's declared upper bound is never inflated
        prop_assert_eq!(small.working()[0].volume, large.working()[0].volume);
    }
}
