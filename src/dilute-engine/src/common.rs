// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    CsvRead,
    CsvWrite,
    BadSchema,
    ExpectedNumber,
    TooFewRows,
    NonPositiveValue,
    NotStrictlyDecreasing,
    MassBalance,
    VolumeBelowPipetteMinimum,
    StockTooDilute,
    StockNeedsDilution,
    TargetTooConcentrated,
    NoFeasibleSource,
    InsufficientSupply,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            CsvRead => "csv_read",
            CsvWrite => "csv_write",
            BadSchema => "bad_schema",
            ExpectedNumber => "expected_number",
            TooFewRows => "too_few_rows",
            NonPositiveValue => "non_positive_value",
            NotStrictlyDecreasing => "not_strictly_decreasing",
            MassBalance => "mass_balance",
            VolumeBelowPipetteMinimum => "volume_below_pipette_minimum",
            StockTooDilute => "stock_too_dilute",
            StockNeedsDilution => "stock_needs_dilution",
            TargetTooConcentrated => "target_too_concentrated",
            NoFeasibleSource => "no_feasible_source",
            InsufficientSupply => "insufficient_supply",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading, writing, or structurally interpreting the tabular I/O.
    Import,
    /// Global preconditions checked before planning starts.
    Validation,
    /// Per-row feasibility and supply accounting during allocation.
    Planning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl From<Box<dyn std::error::Error>> for Error {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        Error {
            kind: ErrorKind::Planning,
            code: ErrorCode::Generic,
            details: Some(err.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Import => "ImportError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Planning => "PlanningError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! eprintln(
    ($($arg:tt)*) => {{
        use std::io::Write;
        let r = writeln!(&mut ::std::io::stderr(), $($arg)*);
        r.expect("failed printing to stderr");
    }}
);

#[macro_export]
macro_rules! import_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Import,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! validation_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Validation,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! plan_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Planning,
            ErrorCode::$code,
            Some($str),
        ))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Planning, ErrorCode::$code, None))
    }};
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Validation,
        ErrorCode::MassBalance,
        Some("stock holds 100.00, requests total 250.00".to_string()),
    );
    assert_eq!(
        format!("{err}"),
        "ValidationError{mass_balance: stock holds 100.00, requests total 250.00}"
    );

    let err = Error::new(ErrorKind::Planning, ErrorCode::NoFeasibleSource, None);
    assert_eq!(format!("{err}"), "PlanningError{no_feasible_source}");
}

#[test]
fn test_error_code_display_is_snake_case() {
    assert_eq!(format!("{}", ErrorCode::BadSchema), "bad_schema");
    assert_eq!(
        format!("{}", ErrorCode::VolumeBelowPipetteMinimum),
        "volume_below_pipette_minimum"
    );
    assert_eq!(
        format!("{}", ErrorCode::TargetTooConcentrated),
        "target_too_concentrated"
    );
}
