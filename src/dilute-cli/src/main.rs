// Copyright 2025 The Dilute Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::path::PathBuf;
use std::result::Result as StdResult;

use pico_args::Arguments;

use dilute_engine::file_io::{derive_output_path, load_csv, save_csv};
use dilute_engine::{Options, eprintln, plan_requests};

const VERSION: &str = "1.0";
const EXIT_FAILURE: i32 = 1;

#[macro_export]
macro_rules! die(
    ($($arg:tt)*) => { {
        use std;
        eprintln!($($arg)*);
        std::process::exit(EXIT_FAILURE)
    } }
);

fn usage() -> ! {
    let argv0 = std::env::args()
        .next()
        .unwrap_or_else(|| "<dilute>".to_string());
    die!(
        concat!(
            "dilute {}: Plan serial dilutions from a stock solution.\n\
         \n\
         USAGE:\n",
            "    {} [OPTION...] PATH\n",
            "\n\
         The input is a csv file with columns 'concentration' and 'volume',\n\
         rows ordered by decreasing concentration, row 0 being the stock\n\
         solution with its available volume.\n\
         \n\
         OPTIONS:\n",
            "    -h, --help            show this message\n",
            "    --minimal_volume V    minimal volume for the pipette (default 2)\n",
            "    --leaway_factor F     factor by which volumes are expanded to\n",
            "                          provide leaway (default 1.5)\n",
            "    --no_file_saving      print the plan instead of writing it next\n",
            "                          to the input file\n",
        ),
        VERSION,
        argv0
    );
}

#[derive(Clone, Debug)]
struct Args {
    path: PathBuf,
    minimal_volume: f64,
    leaway_factor: f64,
    no_file_saving: bool,
}

fn parse_args() -> StdResult<Args, Box<dyn std::error::Error>> {
    let mut parsed = Arguments::from_env();
    if parsed.contains(["-h", "--help"]) {
        usage();
    }

    let minimal_volume = parsed
        .opt_value_from_str("--minimal_volume")?
        .unwrap_or(2.0);
    let leaway_factor = parsed.opt_value_from_str("--leaway_factor")?.unwrap_or(1.5);
    let no_file_saving = parsed.contains("--no_file_saving");

    let free_arguments = parsed.finish();
    if free_arguments.is_empty() {
        eprintln!("error: input path required");
        usage();
    }

    Ok(Args {
        path: PathBuf::from(&free_arguments[0]),
        minimal_volume,
        leaway_factor,
        no_file_saving,
    })
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {}", err);
            usage();
        }
    };

    let rows = match load_csv(&args.path) {
        Ok(rows) => rows,
        Err(err) => {
            die!("table '{}' error: {}", args.path.display(), err);
        }
    };

    let opts = Options {
        minimal_volume: args.minimal_volume,
        leaway_factor: args.leaway_factor,
    };

    let plan = match plan_requests(rows, &opts) {
        Ok(plan) => plan,
        Err(err) => {
            die!("planning '{}' error: {}", args.path.display(), err);
        }
    };

    if args.no_file_saving {
        plan.print_tsv();
    } else {
        let output_path = derive_output_path(&args.path);
        if let Err(err) = save_csv(&plan, &output_path) {
            die!("writing '{}' error: {}", output_path.display(), err);
        }
    }
}
