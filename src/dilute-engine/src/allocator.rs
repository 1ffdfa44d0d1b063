// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The core planning pass.
//!
//! Targets are resolved from the most dilute row upward. Each one is matched
//! to a feasible source (the stock, or an already-planned intermediate), its
//! dilution and buffer volumes are computed, and the cumulative demand drawn
//! from the chosen source is checked against that source's supply.

use crate::common::Result;
use crate::datamodel::{Options, Request, RequestTable};
use crate::plan_err;
use crate::results::{Plan, PlanRow};
use crate::stock_range::feasible_range;

/// Picks the source row for a target that cannot draw directly from stock.
///
/// Candidates are the already-planned rows `1..target`; an eligible source's
/// concentration lies strictly inside `(lower, upper)`.
pub trait SourceSelector {
    fn select(&self, working: &[Request], target: usize, lower: f64, upper: f64) -> Option<usize>;
}

/// The default greedy strategy: take the first eligible row scanning from
/// index 1 upward (the highest-concentration candidate encountered first).
/// Not necessarily optimal, but stable and predictable.
pub struct FirstFit;

impl SourceSelector for FirstFit {
    fn select(&self, working: &[Request], target: usize, lower: f64, upper: f64) -> Option<usize> {
        (1..target).find(|&i| {
            let c_i = working[i].concentration;
            c_i > lower && c_i < upper
        })
    }
}

/// Plan every target using the default first-fit source selection.
pub fn plan(table: &RequestTable, opts: &Options) -> Result<Plan> {
    allocate(table, opts, &FirstFit)
}

pub fn allocate(
    table: &RequestTable,
    opts: &Options,
    selector: &dyn SourceSelector,
) -> Result<Plan> {
    let raw = table.raw();
    let working = table.working();
    let n = working.len();
    let stock_concentration = working[0].concentration;

    // cumulative demand drawn from each row, seeded with the row's own
    // requested (pre-leaway) volume; the leaway margin is what absorbs
    // draws from rows further down the chain
    let mut demand: Vec<f64> = raw
        .iter()
        .enumerate()
        .map(|(idx, row)| if idx == 0 { 0.0 } else { row.volume })
        .collect();
    // row 0's supply is its declared upper bound, targets' their working volume
    let available: Vec<f64> = working
        .iter()
        .enumerate()
        .map(|(idx, row)| if idx == 0 { raw[0].volume } else { row.volume })
        .collect();

    let mut sources: Vec<Option<usize>> = vec![None; n];
    let mut dilution_volumes: Vec<f64> = vec![0.0; n];
    let mut buffer_volumes: Vec<f64> = vec![0.0; n];

    for j in (1..n).rev() {
        let c_j = working[j].concentration;
        let v_j = working[j].volume;
        let (lower, upper) = feasible_range(c_j, v_j, opts.minimal_volume);

        let i = if lower > stock_concentration {
            // even drawing the bare pipette minimum from the strongest
            // solution we have cannot reach c_j
            return plan_err!(
                TargetTooConcentrated,
                format!(
                    "concentration request {c_j} is too large to be diluted \
                     from the original stock solution"
                )
            );
        } else if upper < stock_concentration {
            // a direct draw from stock would be below the pipette minimum;
            // route through an intermediate instead
            match selector.select(working, j, lower, upper) {
                Some(i) => i,
                None => {
                    return plan_err!(
                        NoFeasibleSource,
                        format!(
                            "concentration request {c_j} can only be diluted from a \
                             solution in range {lower:.2} to {upper:.2}, \
                             which is not available"
                        )
                    );
                }
            }
        } else {
            // best case: dilute straight from the stock solution
            0
        };

        let c_i = working[i].concentration;
        let dilution = (c_j / c_i) * v_j;
        demand[i] += dilution;
        if demand[i] > available[i] {
            return plan_err!(
                InsufficientSupply,
                format!(
                    "volume needed from row {i} (concentration {c_i}) is {:.2} but only \
                     {:.2} is available; short by {:.2}, try requesting more",
                    demand[i],
                    available[i],
                    demand[i] - available[i]
                )
            );
        }

        sources[j] = Some(i);
        dilution_volumes[j] = dilution;
        buffer_volumes[j] = ((c_i - c_j) / c_i) * v_j;
    }

    let rows = (0..n)
        .map(|idx| {
            if idx == 0 {
                PlanRow {
                    concentration: working[0].concentration,
                    // the actual stock volume consumed, which may be less
                    // than the declared upper bound
                    volume: demand[0],
                    dilution_volume: None,
                    buffer_volume: None,
                    source: None,
                }
            } else {
                PlanRow {
                    concentration: working[idx].concentration,
                    volume: working[idx].volume,
                    dilution_volume: Some(dilution_volumes[idx]),
                    buffer_volume: Some(buffer_volumes[idx]),
                    source: sources[idx],
                }
            }
        })
        .collect();

    Ok(Plan { rows })
}
