// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::import_err;

/// One row of the request table: row 0 is the stock solution, rows 1..N-1
/// are targets in strictly decreasing concentration order.
///
/// Row 0's volume is an upper bound on available stock, not a fixed demand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub concentration: f64,
    pub volume: f64,
}

/// Planner parameters.
///
/// `minimal_volume` is the smallest volume the pipette can reliably
/// transfer; it bounds both dilution and buffer volumes away from zero.
/// `leaway_factor` inflates requested volumes (rows >= 1) to absorb
/// pipetting loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    pub minimal_volume: f64,
    pub leaway_factor: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            minimal_volume: 2.0,
            leaway_factor: 1.1,
        }
    }
}

/// The raw request rows plus the working copy the planner operates on.
///
/// The working copy scales target volumes by the leaway factor; row 0 keeps
/// its declared upper-bound volume untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestTable {
    raw: Vec<Request>,
    working: Vec<Request>,
}

impl RequestTable {
    pub fn new(rows: Vec<Request>, leaway_factor: f64) -> Result<Self> {
        if rows.len() < 2 {
            return import_err!(
                TooFewRows,
                format!("need a stock row and at least one target, got {} row(s)", rows.len())
            );
        }
        if leaway_factor < 1.0 {
            return import_err!(
                NonPositiveValue,
                format!("leaway factor must be >= 1, got {leaway_factor}")
            );
        }
        for (idx, row) in rows.iter().enumerate() {
            if !(row.concentration > 0.0) || !(row.volume > 0.0) {
                return import_err!(
                    NonPositiveValue,
                    format!(
                        "row {idx} must have positive concentration and volume, got ({}, {})",
                        row.concentration, row.volume
                    )
                );
            }
        }
        for (idx, pair) in rows.windows(2).enumerate() {
            if !(pair[1].concentration < pair[0].concentration) {
                return import_err!(
                    NotStrictlyDecreasing,
                    format!(
                        "concentrations must strictly decrease: row {} ({}) vs row {} ({})",
                        idx,
                        pair[0].concentration,
                        idx + 1,
                        pair[1].concentration
                    )
                );
            }
        }

        let working = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                if idx == 0 {
                    *row
                } else {
                    Request {
                        concentration: row.concentration,
                        volume: leaway_factor * row.volume,
                    }
                }
            })
            .collect();

        Ok(RequestTable { raw: rows, working })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Rows as requested, before the leaway factor is applied.
    pub fn raw(&self) -> &[Request] {
        &self.raw
    }

    /// Leaway-adjusted rows the planner operates on.
    pub fn working(&self) -> &[Request] {
        &self.working
    }

    pub fn stock(&self) -> &Request {
        &self.raw[0]
    }
}
