// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::io::Write;

/// One row of the finished plan.
///
/// Row 0 (the stock) has no source and no dilution/buffer split; its
/// `volume` is the total volume the plan actually draws from the stock.
/// Target rows carry their leaway-adjusted volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanRow {
    pub concentration: f64,
    pub volume: f64,
    pub dilution_volume: Option<f64>,
    pub buffer_volume: Option<f64>,
    pub source: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub rows: Vec<PlanRow>,
}

pub(crate) const COLUMNS: [&str; 5] = [
    "concentration",
    "volume",
    "dilution volume",
    "buffer volume",
    "from",
];

impl Plan {
    pub fn stock_demand(&self) -> f64 {
        self.rows[0].volume
    }

    pub fn print_tsv(&self) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.write_tsv(&mut out).expect("failed printing to stdout");
    }

    pub fn write_tsv(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}", COLUMNS.join("\t"))?;
        for row in &self.rows {
            write!(out, "{}\t{}", row.concentration, row.volume)?;
            match (row.dilution_volume, row.buffer_volume, row.source) {
                (Some(dilution), Some(buffer), Some(source)) => {
                    writeln!(out, "\t{dilution}\t{buffer}\t{source}")?;
                }
                _ => {
                    writeln!(out, "\t\t\t")?;
                }
            }
        }
        Ok(())
    }
}
