//! `stockroom export` command - CSV dump of the order ledger

use std::path::PathBuf;

use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_store;
use crate::core::store::Store;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

fn write_ledger<W: std::io::Write>(store: &Store, writer: W) -> Result<u64> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "order", "group", "requesters", "line", "item", "code", "quantity", "status",
        "requested_at",
    ])
    .into_diagnostic()?;

    let mut rows = 0u64;
    for order in store.list_orders().into_diagnostic()? {
        let requesters = store
            .order_members(order.id)
            .into_diagnostic()?
            .iter()
            .map(|u| u.email.clone())
            .collect::<Vec<_>>()
            .join(";");
        for line in store.order_lines(order.id).into_diagnostic()? {
            let unit = store.unit(line.unit_id).into_diagnostic()?;
            csv.write_record([
                order.id.to_string(),
                order.group_id.to_string(),
                requesters.clone(),
                line.id.to_string(),
                unit.name.clone(),
                unit.code.clone().unwrap_or_default(),
                line.quantity.to_string(),
                line.status.to_string(),
                line.requested_at.to_rfc3339(),
            ])
            .into_diagnostic()?;
            rows += 1;
        }
    }
    csv.flush().into_diagnostic()?;
    Ok(rows)
}

pub fn run(args: ExportArgs) -> Result<()> {
    let (_project, store) = open_store()?;
    match args.output {
        Some(path) => {
            let file = std::fs::File::create(&path).into_diagnostic()?;
            let rows = write_ledger(&store, file)?;
            println!(
                "{} Exported {} line(s) to {}",
                style("✓").green().bold(),
                rows,
                path.display()
            );
        }
        None => {
            write_ledger(&store, std::io::stdout().lock())?;
        }
    }
    Ok(())
}
