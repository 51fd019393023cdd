//! `stockroom sweep` command - reclaim expired requests
//!
//! Intended to be run from cron or a systemd timer; safe to re-run.

use chrono::Duration;
use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, require_role};
use crate::entities::Role;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Expiration threshold in hours (default: config expiration_hours)
    #[arg(long)]
    pub hours: Option<i64>,
}

pub fn run(args: SweepArgs, acting_as: Option<&str>) -> Result<()> {
    let (project, mut store) = open_store()?;
    require_role(&store, acting_as, &[Role::Admin])?;

    let hours = args
        .hours
        .unwrap_or(project.config().expiration_hours as i64);
    let outcome = store
        .sweep_expired(Duration::hours(hours))
        .into_diagnostic()?;

    println!(
        "{} Swept {} expired request(s), {} unit(s) back in the pool",
        style("✓").green().bold(),
        outcome.deleted,
        outcome.released
    );
    for failure in &outcome.failures {
        eprintln!(
            "{} line {}: {}",
            style("warning:").yellow().bold(),
            failure.line_item_id,
            failure.error
        );
    }
    Ok(())
}
