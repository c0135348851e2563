// crates/ap_cli/src/args.rs
//
// Offline CLI argument surface for `apportion`.
// - Inputs are local files only (any scheme:// is rejected)
// - --min/--max are uniform bounds applied to every entity; --min > --max is a usage error
// - Method tokens are parsed here so a typo fails before any file is read

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use ap_algo::Method;
use ap_core::SeatBounds;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "apportion",
    disable_help_subcommand = true,
    about = "Seat apportionment: highest-averages, largest-remainder and adjusted-divisor methods"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// More diagnostics on stderr (-v info, -vv debug). Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Errors only on stderr.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Allocate seats with one method.
    Alloc(AllocArgs),
    /// Run several methods over the same table, one column each.
    Compare(CompareArgs),
    /// List every method token.
    Methods,
}

/// Flags shared by `alloc` and `compare`.
#[derive(Debug, ClapArgs, Clone)]
pub struct TableArgs {
    /// Tab-separated vote table: name, votes, optional reference seats.
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Number of seats to allocate.
    #[arg(long, short = 'n')]
    pub seats: u32,

    /// Minimum seats per entity.
    #[arg(long)]
    pub min: Option<u32>,

    /// Maximum seats per entity.
    #[arg(long)]
    pub max: Option<u32>,

    /// Engine limits JSON (retry and search bounds).
    #[arg(long)]
    pub limits: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Tsv)]
    pub format: Format,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct AllocArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Method token, e.g. ha:dhondt, ha:hill@rd, lr:droop, ad:nearest.
    #[arg(long, short = 'm', default_value = "ha:dhondt", value_parser = parse_method)]
    pub method: Method,

    /// Exit with status 3 unless every seat was awarded exactly.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Comma-separated method tokens. Default: the standard comparison set.
    #[arg(long, value_delimiter = ',', value_parser = parse_method)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Tsv,
    Json,
}

/// Errors surfaced by post-parse validation.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    Bounds(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            Bounds(s) => write!(f, "invalid seat bounds: {s}"),
        }
    }
}
impl std::error::Error for CliError {}

pub fn parse_method(s: &str) -> Result<Method, String> {
    s.parse::<Method>().map_err(|e| e.to_string())
}

impl TableArgs {
    pub fn bounds(&self) -> Result<SeatBounds, CliError> {
        SeatBounds::new(self.min, self.max).map_err(|e| CliError::Bounds(e.to_string()))
    }

    /// Local-path and existence checks for every file flag.
    pub fn check_paths(&self) -> Result<(), CliError> {
        for p in std::iter::once(self.input.as_path()).chain(self.limits.as_deref()) {
            ensure_local_path(p)?;
            if !p.is_file() {
                return Err(CliError::NotFound(p.display().to_string()));
            }
        }
        Ok(())
    }
}

impl CompareArgs {
    /// Requested methods, or the standard set when none were given.
    pub fn methods_or_default(&self) -> Vec<Method> {
        if self.methods.is_empty() {
            Method::standard_set()
        } else {
            self.methods.clone()
        }
    }
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}
