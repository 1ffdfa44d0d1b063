// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod common;
pub mod datamodel;
mod validator;

mod allocator;
mod results;
mod stock_range;

#[cfg(feature = "file_io")]
pub mod file_io;

pub use self::allocator::{FirstFit, SourceSelector, allocate, plan};
pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::datamodel::{Options, Request, RequestTable};
pub use self::results::{Plan, PlanRow};
pub use self::stock_range::{StockFit, check_stock_solution, feasible_range};
pub use self::validator::check_validity;

#[cfg(test)]
mod plan_proptest;

/// Run the full pipeline on raw request rows: build the working table,
/// check the global preconditions, screen the stock concentration, then
/// allocate.
///
/// The two up-front screens are necessary-but-not-sufficient; the
/// allocator's per-row checks are authoritative and both are kept as
/// defense in depth.
pub fn plan_requests(rows: Vec<Request>, opts: &Options) -> Result<Plan> {
    let table = RequestTable::new(rows, opts.leaway_factor)?;
    check_validity(&table, opts)?;
    check_stock_solution(&table, opts)?;
    plan(&table, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_produces_a_complete_plan() {
        let rows = vec![
            Request {
                concentration: 350.0,
                volume: 1000.0,
            },
            Request {
                concentration: 300.0,
                volume: 200.0,
            },
            Request {
                concentration: 250.0,
                volume: 250.0,
            },
        ];
        let opts = Options {
            minimal_volume: 2.0,
            leaway_factor: 1.0,
        };
        let plan = plan_requests(rows, &opts).unwrap();
        assert_eq!(plan.rows.len(), 3);
        assert!(plan.rows[1..].iter().all(|row| row.source.is_some()));
    }

    #[test]
    fn pipeline_fails_fast_on_validation() {
        // mass-balance failure surfaces before any stock-range or
        // allocation diagnostics
        let rows = vec![
            Request {
                concentration: 350.0,
                volume: 100.0,
            },
            Request {
                concentration: 300.0,
                volume: 200.0,
            },
        ];
        let err = plan_requests(rows, &Options::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.code, ErrorCode::MassBalance);
    }
}
