// crates/sd_cli/src/main.rs
//
// Exit codes, typed error mapping, logging setup, the validate-only
// short-circuit and the full run path (load → layer flags → pipeline →
// distribution.json → optional renderings).

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const IO: u8 = 4;
    pub const CONTRACT: u8 = 5;
}

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};
use sd_io::canonical_json;
use sd_io::IoError;
use sd_pipeline::{load_ctx, run, validate_ctx, DistributionReport, PipelineCtx, PipelineError};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug, Error)]
enum MainError {
    /// Input shape, ids, params domains, denominator checks.
    #[error("validation: {0}")]
    Validation(String),
    /// Read/write/path/limit failures.
    #[error("io: {0}")]
    Io(String),
    /// The summarizer or a renderer refused its own contract.
    #[error("contract violation: {0}")]
    Contract(String),
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("stakedist: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION);
        }
    };
    init_tracing(&args);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    match outcome {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            error!("{e}");
            ExitCode::from(map_error(&e))
        }
    }
}

/// stderr subscriber; `RUST_LOG` wins over the verbosity flags.
fn init_tracing(args: &Args) {
    let level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn map_error(e: &MainError) -> u8 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Contract(_) => exitcodes::CONTRACT,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Invalid(m) => MainError::Validation(m),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Limit(m) => MainError::Io(format!("limit: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Validation(report) => MainError::Validation(report.to_string()),
        // summarize / rounding / aggregate / label
        other => MainError::Contract(other.to_string()),
    }
}

/// Load inputs and apply flag overrides on top of the params file.
fn load(args: &Args) -> Result<PipelineCtx, MainError> {
    let mut ctx = load_ctx(&args.stakes, args.params.as_deref()).map_err(map_pipeline_err)?;
    if let Some(n) = args.max_included {
        ctx.params.max_included = n;
    }
    if let Some(d) = args.digits {
        ctx.params.display_digits = d;
    }
    if let Some(t) = args.total {
        ctx.stakes.total = Some(t);
    }
    Ok(ctx)
}

/// Validate-only path: load + checks, no summarizing, no artifacts.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let ctx = load(args)?;
    let report = validate_ctx(&ctx);
    for w in report.warnings() {
        warn!(code = w.code, at = %w.where_, "{}", w.message);
    }
    if !report.pass {
        return Err(MainError::Validation(report.to_string()));
    }
    if !args.quiet {
        eprintln!("validate-only: inputs OK ({} stakes)", ctx.stakes.stakes.len());
    }
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let ctx = load(args)?;
    let report = run(ctx).map_err(map_pipeline_err)?;

    let distribution = serde_json::to_value(&report)
        .map_err(|e| MainError::Contract(format!("serialize report: {e}")))?;
    canonical_json::write_canonical_file(&args.out.join("distribution.json"), &distribution)
        .map_err(map_io_err)?;

    maybe_render_reports(args, &report, &args.out)?;

    info!(out = %args.out.display(), "artifacts written");
    if !args.quiet {
        eprintln!("run: artifacts written to {}", args.out.display());
    }
    Ok(())
}

fn maybe_render_reports(args: &Args, report: &DistributionReport, out_dir: &Path) -> Result<(), MainError> {
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => render_json_report(report, out_dir)?,
            "html" => render_html_report(report, out_dir, &args.lang)?,
            other => return Err(MainError::Validation(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

fn render_json_report(report: &DistributionReport, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let v = sd_report::render_json(report).map_err(|e| MainError::Contract(e.to_string()))?;
        let mut bytes = serde_json::to_vec_pretty(&v)
            .map_err(|e| MainError::Contract(format!("serialize report.json: {e}")))?;
        bytes.push(b'\n');
        canonical_json::write_bytes_atomic(&out_dir.join("report.json"), &bytes).map_err(map_io_err)
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (report, out_dir);
        Err(MainError::Validation("json renderer not enabled (build with feature `report-json`)".into()))
    }
}

fn render_html_report(report: &DistributionReport, out_dir: &Path, lang: &str) -> Result<(), MainError> {
    #[cfg(feature = "report-html")]
    {
        let html = sd_report::render_html(report, lang).map_err(|e| MainError::Contract(e.to_string()))?;
        canonical_json::write_bytes_atomic(&out_dir.join("report.html"), html.as_bytes()).map_err(map_io_err)
    }
    #[cfg(not(feature = "report-html"))]
    {
        let _ = (report, out_dir, lang);
        Err(MainError::Validation("html renderer not enabled (build with feature `report-html`)".into()))
    }
}
