mod cli;
mod preview;

use anyhow::Result;
use cli::{Cli, Commands};
use lalificador_core::{FilenameFormatter, OrgCode, Period};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting lalificador");

    match cli.command {
        Commands::Scan { target, org } => {
            handle_scan_command(target, org)?;
        }
        Commands::Apply { target, org, yes, interactive } => {
            handle_apply_command(target, org, yes, interactive)?;
        }
        Commands::Format { name, period, org } => {
            handle_format_command(&name, period, org)?;
        }
        Commands::Examples => {
            println!("{}", preview::EXAMPLES);
        }
    }

    info!("Lalificador completed successfully");
    Ok(())
}

fn resolve_target(target: Option<PathBuf>) -> Result<PathBuf> {
    let target_dir = match target {
        Some(target) => target,
        None => std::env::current_dir()?,
    };

    if !target_dir.exists() {
        anyhow::bail!("Target directory does not exist: {:?}", target_dir);
    }

    if !target_dir.is_dir() {
        anyhow::bail!("Target must be a directory: {:?}", target_dir);
    }

    Ok(target_dir)
}

fn handle_scan_command(target: Option<PathBuf>, org: OrgCode) -> Result<()> {
    let target_dir = resolve_target(target)?;

    info!("Target directory: {:?}", target_dir);
    info!("Organization code: {}", org.to_upper());

    let plan = lalificador_core::scan(&target_dir, &org)?;
    preview::show_plan(&plan)?;

    Ok(())
}

fn handle_apply_command(
    target: Option<PathBuf>,
    org: OrgCode,
    yes: bool,
    interactive: bool,
) -> Result<()> {
    let target_dir = resolve_target(target)?;

    info!("Target directory: {:?}", target_dir);
    info!("Organization code: {}", org.to_upper());
    info!("Interactive mode: {}", interactive);

    let plan = lalificador_core::scan(&target_dir, &org)?;
    preview::show_plan(&plan)?;

    if plan.is_empty() {
        return Ok(());
    }

    let report = if interactive {
        lalificador_core::apply_plan_interactive(plan, preview::confirm_rename)?
    } else {
        if !yes && !preview::confirm_batch(plan.len())? {
            warn!("Cancelled - no changes were made");
            return Ok(());
        }
        lalificador_core::apply(plan)
    };

    preview::show_report(&report);

    println!();
    rescan(&target_dir, &org)?;

    if !report.is_success() {
        anyhow::bail!("{} of {} renames failed", report.failed(), report.total());
    }

    Ok(())
}

fn rescan(target_dir: &Path, org: &OrgCode) -> Result<()> {
    let plan = lalificador_core::scan(target_dir, org)?;
    preview::show_plan(&plan)
}

fn handle_format_command(name: &str, period: Option<Period>, org: OrgCode) -> Result<()> {
    let period = period.unwrap_or_else(Period::current);
    let formatter = FilenameFormatter::new(org)?;

    println!("{}", formatter.format(name, &period));

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
