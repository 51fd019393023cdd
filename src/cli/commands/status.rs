//! `stockroom status` command - line item status changes

use clap::{Args, Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, require_role};
use crate::core::lifecycle::allowed_transitions;
use crate::entities::{LineStatus, Role};

/// CLI-friendly line status enum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliStatus {
    Requested,
    Loaned,
    Returned,
    Denied,
}

impl From<CliStatus> for LineStatus {
    fn from(cli: CliStatus) -> Self {
        match cli {
            CliStatus::Requested => LineStatus::Requested,
            CliStatus::Loaned => LineStatus::Loaned,
            CliStatus::Returned => LineStatus::Returned,
            CliStatus::Denied => LineStatus::Denied,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum StatusCommands {
    /// Change one line item's status
    Set(SetArgs),

    /// Apply several changes as one all-or-nothing batch
    Batch(BatchArgs),

    /// Show the legal next statuses for a line item
    Allowed(AllowedArgs),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Line item id
    pub line_item: i64,

    #[arg(value_enum)]
    pub status: CliStatus,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Changes as LINE=STATUS pairs, e.g. "3=loaned 5=denied"
    #[arg(required = true, value_name = "LINE=STATUS")]
    pub changes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AllowedArgs {
    /// Line item id
    pub line_item: i64,
}

fn parse_change(raw: &str) -> Result<(i64, LineStatus)> {
    let (id, status) = raw
        .split_once('=')
        .ok_or_else(|| miette::miette!("Expected LINE=STATUS, got '{raw}'"))?;
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| miette::miette!("Invalid line item id '{id}'"))?;
    let status: LineStatus = status
        .trim()
        .parse()
        .map_err(|e: String| miette::miette!("{e}"))?;
    Ok((id, status))
}

pub fn run(cmd: StatusCommands, acting_as: Option<&str>) -> Result<()> {
    let (_project, mut store) = open_store()?;
    match cmd {
        StatusCommands::Set(args) => {
            require_role(&store, acting_as, &[Role::Admin])?;
            let line = store
                .transition(args.line_item, args.status.into())
                .into_diagnostic()?;
            println!(
                "{} Line {} is now {}",
                style("✓").green().bold(),
                line.id,
                style(line.status).bold()
            );
        }
        StatusCommands::Batch(args) => {
            require_role(&store, acting_as, &[Role::Admin])?;
            let changes = args
                .changes
                .iter()
                .map(|raw| parse_change(raw))
                .collect::<Result<Vec<_>>>()?;
            let updated = store.batch_transition(&changes).into_diagnostic()?;
            println!(
                "{} Applied {} change(s)",
                style("✓").green().bold(),
                updated.len()
            );
        }
        StatusCommands::Allowed(args) => {
            let line = store.line_item(args.line_item).into_diagnostic()?;
            let next = allowed_transitions(line.status)
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("{} -> {}", line.status, next);
        }
    }
    Ok(())
}
