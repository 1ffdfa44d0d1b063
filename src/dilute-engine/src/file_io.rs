// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! CSV front door for the planner: request tables in, plan tables out.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::common::Result;
use crate::datamodel::Request;
use crate::import_err;
use crate::results::{COLUMNS, Plan};

/// Read a request table from a CSV file at `path`.
pub fn load_csv(path: &Path) -> Result<Vec<Request>> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            return import_err!(CsvRead, format!("open {}: {err}", path.display()));
        }
    };
    read_requests(file)
}

/// Read a request table from any reader producing CSV bytes.
///
/// The header must be exactly `concentration,volume`; this is checked
/// before any numeric parsing happens.
pub fn read_requests(reader: impl Read) -> Result<Vec<Request>> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let header = match rdr.headers() {
        Ok(header) => header,
        Err(err) => {
            return import_err!(CsvRead, format!("{err}"));
        }
    };
    let columns: Vec<&str> = header.iter().map(|h| h.trim()).collect();
    if columns != ["concentration", "volume"] {
        return import_err!(
            BadSchema,
            format!(
                "expected columns [concentration, volume], got [{}]",
                columns.join(", ")
            )
        );
    }

    let mut rows: Vec<Request> = Vec::new();
    for (idx, record) in rdr.deserialize().enumerate() {
        let row: Request = match record {
            Ok(row) => row,
            Err(err) => {
                return import_err!(ExpectedNumber, format!("row {}: {err}", idx + 1));
            }
        };
        rows.push(row);
    }

    Ok(rows)
}

/// Write a finished plan as CSV to `path`.
pub fn save_csv(plan: &Plan, path: &Path) -> Result<()> {
    let file = match std::fs::File::create(path) {
        Ok(file) => file,
        Err(err) => {
            return import_err!(CsvWrite, format!("create {}: {err}", path.display()));
        }
    };
    write_plan(plan, file)
}

pub fn write_plan(plan: &Plan, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let emit = |wtr: &mut csv::Writer<_>, record: &[String]| -> Result<()> {
        match wtr.write_record(record) {
            Ok(()) => Ok(()),
            Err(err) => import_err!(CsvWrite, format!("{err}")),
        }
    };

    emit(&mut wtr, &COLUMNS.map(str::to_string))?;
    for row in &plan.rows {
        let record = [
            row.concentration.to_string(),
            row.volume.to_string(),
            row.dilution_volume.map(|v| v.to_string()).unwrap_or_default(),
            row.buffer_volume.map(|v| v.to_string()).unwrap_or_default(),
            row.source.map(|i| i.to_string()).unwrap_or_default(),
        ];
        emit(&mut wtr, &record)?;
    }
    match wtr.flush() {
        Ok(()) => Ok(()),
        Err(err) => import_err!(CsvWrite, format!("{err}")),
    }
}

/// Sibling output path for an input table: `requests.csv` ->
/// `requests_output.csv`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_output.csv"))
}
