// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Global feasibility preconditions, checked once before planning starts.
//!
//! These are quick necessary-but-not-sufficient screens; the allocator's
//! per-row supply accounting is authoritative.

use crate::common::Result;
use crate::datamodel::{Options, RequestTable};
use crate::validation_err;

pub fn check_validity(table: &RequestTable, opts: &Options) -> Result<()> {
    let working = table.working();

    // mass balance: the stock's declared solute content must exceed the
    // solute content of every target combined
    let stock = &working[0];
    let stock_mass = stock.concentration * stock.volume;
    let requested_mass: f64 = working[1..]
        .iter()
        .map(|row| row.concentration * row.volume)
        .sum();
    if !(stock_mass > requested_mass) {
        return validation_err!(
            MassBalance,
            format!(
                "not enough solution: stock holds {stock_mass:.2} concentration*volume, \
                 requests total {requested_mass:.2}"
            )
        );
    }

    // every volume must be splittable into a dilution part and a buffer
    // part that are both pipettable
    let floor = 2.0 * opts.minimal_volume;
    for (idx, row) in working.iter().enumerate() {
        if !(row.volume > floor) {
            return validation_err!(
                VolumeBelowPipetteMinimum,
                format!(
                    "row {idx}'s volume {} must exceed twice the minimal pipette volume ({floor})",
                    row.volume
                )
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::datamodel::Request;

    fn table(rows: &[(f64, f64)], leaway: f64) -> RequestTable {
        let rows = rows
            .iter()
            .map(|&(concentration, volume)| Request {
                concentration,
                volume,
            })
            .collect();
        RequestTable::new(rows, leaway).unwrap()
    }

    #[test]
    fn accepts_well_provisioned_request() {
        let table = table(&[(350.0, 1000.0), (300.0, 200.0), (250.0, 250.0)], 1.0);
        assert!(check_validity(&table, &Options::default()).is_ok());
    }

    #[test]
    fn rejects_mass_imbalance() {
        // stock: 350*100 = 35_000 < 300*200 = 60_000
        let table = table(&[(350.0, 100.0), (300.0, 200.0)], 1.0);
        let err = check_validity(&table, &Options::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MassBalance);
        assert!(err.get_details().unwrap().contains("not enough solution"));
    }

    #[test]
    fn leaway_counts_against_mass_balance() {
        // fits exactly at leaway 1, overflows at leaway 2
        let tight = table(&[(100.0, 50.0), (50.0, 99.0)], 1.0);
        assert!(check_validity(&tight, &Options::default()).is_ok());

        let inflated = table(&[(100.0, 50.0), (50.0, 99.0)], 2.0);
        let err = check_validity(&inflated, &Options::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MassBalance);
    }

    #[test]
    fn rejects_unsplittable_volume() {
        let table = table(&[(350.0, 1000.0), (300.0, 3.0)], 1.0);
        let err = check_validity(&table, &Options::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::VolumeBelowPipetteMinimum);
        assert!(err.get_details().unwrap().contains("row 1"));
    }

    #[test]
    fn minimum_volume_applies_to_stock_row_too() {
        let table = table(&[(350.0, 4.0), (1.0, 5.0)], 1.0);
        let err = check_validity(&table, &Options::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::VolumeBelowPipetteMinimum);
        assert!(err.get_details().unwrap().contains("row 0"));
    }
}
