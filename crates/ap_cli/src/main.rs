// crates/ap_cli/src/main.rs
//
// `apportion`: load a vote table, run one or several methods, print TSV or
// canonical JSON on stdout. Diagnostics go to stderr through tracing.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Usage, malformed input, invalid allocation input.
    pub const VALIDATION: i32 = 2;
    /// `--strict` and the outcome was Infeasible or Approximate.
    pub const INEXACT: i32 = 3;
    pub const IO: i32 = 4;
    /// Allocation failed (singular divisor, quota escalation exhausted).
    pub const ALLOC: i32 = 5;
}

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ap_algo::Method;
use ap_core::{AllocError, Apportionment, Completion, Limits};
use ap_io::{IoError, VoteTable};
use ap_report::{compare, render_apportionment_tsv, render_json, render_tsv, ReportError};
use args::{AllocArgs, Args, CliError, Command, CompareArgs, Format, TableArgs};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Inexact(Completion),
    Io(String),
    Alloc(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) | MainError::Alloc(m) => f.write_str(m),
            MainError::Inexact(c) => write!(f, "allocation is not exact ({c:?})"),
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(a) => a,
        Err(e) => {
            // --help / --version print to stdout and exit 0; usage errors exit 2.
            let _ = e.print();
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    init_tracing(&args);

    let rc = match run(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            if !matches!(e, MainError::Inexact(_)) {
                eprintln!("apportion: error: {e}");
            }
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// `-q` → error, default → RUST_LOG or warn, `-v` → info, `-vv` → debug.
fn init_tracing(args: &Args) {
    let filter = match (args.quiet, args.verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        (false, 1) => EnvFilter::new("info"),
        (false, _) => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &Args) -> Result<(), MainError> {
    match &args.command {
        Command::Alloc(a) => run_alloc(a),
        Command::Compare(c) => run_compare(c),
        Command::Methods => {
            print!("{}", list_methods());
            Ok(())
        }
    }
}

/// JSON envelope for a single allocation.
#[derive(Serialize)]
struct AllocOutput<'a> {
    method: String,
    label: String,
    result_id: String,
    result: &'a Apportionment,
}

fn run_alloc(a: &AllocArgs) -> Result<(), MainError> {
    let (table, limits) = load_inputs(&a.table)?;
    let bounds = a.table.bounds().map_err(map_cli_err)?;

    info!(method = %a.method.token(), entities = table.len(), seats = a.table.seats, "alloc");
    let result = a
        .method
        .apportion(&table.contenders(), a.table.seats, bounds, &limits)
        .map_err(map_alloc_err)?;

    let out = match a.table.format {
        Format::Tsv => render_apportionment_tsv(&result),
        Format::Json => {
            let envelope = AllocOutput {
                method: a.method.token(),
                label: a.method.label(),
                result_id: ap_io::result_id(&result).map_err(map_io_err)?,
                result: &result,
            };
            let mut s = render_json(&envelope).map_err(map_report_err)?;
            s.push('\n');
            s
        }
    };
    print!("{out}");

    if a.strict && result.completion != Completion::Exact {
        return Err(MainError::Inexact(result.completion));
    }
    Ok(())
}

fn run_compare(c: &CompareArgs) -> Result<(), MainError> {
    let (table, limits) = load_inputs(&c.table)?;
    let bounds = c.table.bounds().map_err(map_cli_err)?;
    let methods = c.methods_or_default();

    info!(methods = methods.len(), entities = table.len(), seats = c.table.seats, "compare");
    let report = compare(&table, &methods, c.table.seats, bounds, &limits).map_err(map_report_err)?;

    let out = match c.table.format {
        Format::Tsv => render_tsv(&report),
        Format::Json => {
            let mut s = render_json(&report).map_err(map_report_err)?;
            s.push('\n');
            s
        }
    };
    print!("{out}");
    Ok(())
}

fn load_inputs(t: &TableArgs) -> Result<(VoteTable, Limits), MainError> {
    t.check_paths().map_err(map_cli_err)?;
    let table = ap_io::load_table(&t.input).map_err(map_io_err)?;
    let limits = match &t.limits {
        Some(p) => ap_io::load_limits(p).map_err(map_io_err)?,
        None => Limits::default(),
    };
    debug!(rows = table.len(), ?limits, "inputs loaded");
    Ok((table, limits))
}

/// `token<TAB>label` for every catalog entry.
fn list_methods() -> String {
    Method::all()
        .iter()
        .map(|m| format!("{}\t{}\n", m.token(), m.label()))
        .collect()
}

/// Map our typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Inexact(_) => INEXACT,
        MainError::Io(_) => IO,
        MainError::Alloc(_) => ALLOC,
    }
}

fn map_cli_err(e: CliError) -> MainError {
    match e {
        CliError::NotFound(_) => MainError::Io(e.to_string()),
        CliError::NonLocalPath(_) | CliError::Bounds(_) => MainError::Validation(e.to_string()),
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Path(_) => MainError::Io(e.to_string()),
        IoError::Parse { .. } | IoError::Json(_) | IoError::Invalid(_) => MainError::Validation(e.to_string()),
    }
}

fn map_alloc_err(e: AllocError) -> MainError {
    match e {
        AllocError::InvalidInput(_) => MainError::Validation(e.to_string()),
        AllocError::SingularDivisor { .. } | AllocError::RetryBoundExceeded { .. } => MainError::Alloc(e.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    match e {
        ReportError::Alloc { method, source } => match map_alloc_err(source) {
            MainError::Validation(m) => MainError::Validation(format!("{method}: {m}")),
            MainError::Alloc(m) => MainError::Alloc(format!("{method}: {m}")),
            other => other,
        },
        ReportError::Io(e) => map_io_err(e),
        ReportError::Inconsistent(m) => MainError::Alloc(m),
    }
}
