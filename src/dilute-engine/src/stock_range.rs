// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Coarse screen on the stock solution's concentration.
//!
//! For every target there is a window of source concentrations that keeps
//! both the drawn volume and the added buffer above the pipette minimum.
//! If the stock sits below every window it can never serve the requests;
//! if a common window exists but the stock sits above it, the stock should
//! first be diluted into that window. When the windows don't intersect at
//! all, intermediate solutions are needed and the allocator decides
//! per-row feasibility.

use crate::common::Result;
use crate::datamodel::{Options, RequestTable};
use crate::plan_err;

/// Outcome of the screen when it does not fail outright.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StockFit {
    /// Every target can in principle be served directly from the stock.
    Covers,
    /// No single source concentration serves every target; the allocator
    /// will have to route some targets through intermediates.
    NeedsIntermediates,
}

/// The `(lower, upper)` source-concentration window for one target.
///
/// Below `lower` the buffer volume drops under the pipette minimum; above
/// `upper` the dilution draw does.
pub fn feasible_range(concentration: f64, volume: f64, minimal_volume: f64) -> (f64, f64) {
    let lower = (volume / (volume - minimal_volume)) * concentration;
    let upper = (volume / minimal_volume) * concentration;
    (lower, upper)
}

pub fn check_stock_solution(table: &RequestTable, opts: &Options) -> Result<StockFit> {
    let working = table.working();
    let stock_concentration = working[0].concentration;

    let mut min_needed = f64::NEG_INFINITY;
    let mut max_usable = f64::INFINITY;
    for row in &working[1..] {
        let (lower, upper) = feasible_range(row.concentration, row.volume, opts.minimal_volume);
        min_needed = min_needed.max(lower);
        max_usable = max_usable.min(upper);
    }

    if stock_concentration < min_needed {
        return plan_err!(
            StockTooDilute,
            format!(
                "original stock solution's concentration needs to be at least {min_needed:.2}"
            )
        );
    }

    if min_needed < max_usable {
        if stock_concentration > max_usable {
            return plan_err!(
                StockNeedsDilution,
                format!(
                    "original stock solution needs to be diluted to \
                     {min_needed:.2} to {max_usable:.2}"
                )
            );
        }
        Ok(StockFit::Covers)
    } else {
        Ok(StockFit::NeedsIntermediates)
    }
}
