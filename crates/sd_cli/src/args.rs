// crates/sd_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - --stakes is required and must be an existing local file
// - --params is optional; its values are overridden by explicit flags
// - Output: --out dir, --render [json|html]*

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use sd_core::rounding::{is_negative, parse_decimal};
use sd_core::Decimal;
use thiserror::Error;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "stakedist",
    version,
    disable_help_subcommand = true,
    about = "Summarize an account's stakes into a bounded, percentage-labeled distribution"
)]
pub struct Args {
    /// Stake file JSON path.
    #[arg(long)]
    pub stakes: PathBuf,

    /// Params JSON path (max_included, display_digits, others_label, heading).
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Denominator override; defaults to the file's total, else the staked sum.
    #[arg(long, value_parser = parse_total)]
    pub total: Option<Decimal>,

    /// Maximum rows in the distribution, remainder row included.
    #[arg(long)]
    pub max_included: Option<usize>,

    /// Decimals kept in display percentages.
    #[arg(long)]
    pub digits: Option<u32>,

    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Renderer(s) to emit. Choose up to 2 (json, html). Omit to skip rendering.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,

    /// Language tag for the HTML report (en, fr).
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Validate inputs only; write nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// Only log errors.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("path must be local file (no scheme): {0}")]
    NonLocalPath(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("output path is not a directory: {0}")]
    NotADirectory(String),
}

/// `--total` parser: plain or scientific decimal, non-negative.
pub fn parse_total(s: &str) -> Result<Decimal, String> {
    let d = parse_decimal(s.trim()).map_err(|e| e.to_string())?;
    if is_negative(d) {
        return Err("total must be non-negative".into());
    }
    Ok(d)
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Check paths, then normalize them.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }

    ensure_local_exists(&args.stakes, "--stakes")?;
    if let Some(p) = &args.params {
        ensure_local_exists(p, "--params")?;
    }
    if args.out.exists() && !args.out.is_dir() {
        return Err(CliError::NotADirectory(args.out.display().to_string()));
    }

    args.stakes = normalize_path(&args.stakes);
    args.params = args.params.take().map(|p| normalize_path(&p));
    args.out = normalize_path(&args.out);
    Ok(args)
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

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [Some(args.stakes.as_path()), args.params.as_deref(), Some(args.out.as_path())]
        .into_iter()
        .flatten()
}

fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort absolute path; falls back to CWD-relative when the path doesn't exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["stakedist"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let a = parse(&["--stakes", "s.json"]);
        assert_eq!(a.out, PathBuf::from("."));
        assert!(a.render.is_empty());
        assert_eq!(a.lang, "en");
        assert_eq!(a.verbose, 0);
        assert_eq!(a.total, None);
    }

    #[test]
    fn render_accepts_up_to_two() {
        let a = parse(&["--stakes", "s.json", "--render", "json", "html", "-vv"]);
        assert_eq!(a.render, vec!["json", "html"]);
        assert_eq!(a.verbose, 2);
        assert!(Args::try_parse_from(["stakedist", "--stakes", "s", "--render", "pdf"]).is_err());
    }

    #[test]
    fn total_parser() {
        assert_eq!(parse_total("12.5").unwrap(), Decimal::new(125, 1));
        assert_eq!(parse_total("1e3").unwrap(), Decimal::new(1000, 0));
        assert!(parse_total("-1").is_err());
        assert!(parse_total("lots").is_err());
    }

    #[test]
    fn stakes_is_required() {
        assert!(Args::try_parse_from(["stakedist"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["stakedist", "--stakes", "s", "--quiet", "-v"]).is_err());
    }

    #[test]
    fn ensure_local_path_rejects_schemes() {
        assert!(ensure_local_path(Path::new("http://x")).is_err());
        assert!(ensure_local_path(Path::new("file:///tmp/x.json")).is_err());
        assert!(ensure_local_path(Path::new("/tmp/file.json")).is_ok());
    }

    #[test]
    fn missing_stakes_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let a = parse(&["--stakes", dir.path().join("nope.json").to_str().unwrap()]);
        assert!(matches!(validate(a), Err(CliError::NotFound(_))));
    }

    #[test]
    fn normalize_path_returns_absolute() {
        assert!(normalize_path(Path::new("does/not/exist.txt")).is_absolute());
    }
}
