//! `stockroom item` command - unit catalog management

use clap::{Args, Subcommand};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::{open_store, require_role};
use crate::entities::Role;

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add units to the catalog
    Add(AddArgs),

    /// List stock, grouped by name
    List,

    /// Show every unit of one name
    Units(UnitsArgs),

    /// Show how many units of a name are available
    Available(AvailableArgs),

    /// Delete a unit permanently
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Item name, e.g. "Resistor 100"
    pub name: String,

    /// Number of identical units to create
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u32,

    /// Assign sequential serial codes starting here
    #[arg(long, value_name = "CODE")]
    pub first_code: Option<u32>,
}

#[derive(Args, Debug)]
pub struct UnitsArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct AvailableArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Unit id to delete
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Tabled)]
struct StockRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Total")]
    total: u32,
    #[tabled(rename = "Available")]
    available: u32,
    #[tabled(rename = "Coded")]
    coded: u32,
}

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Available")]
    available: &'static str,
}

pub fn run(cmd: ItemCommands, acting_as: Option<&str>) -> Result<()> {
    let (_project, mut store) = open_store()?;
    match cmd {
        ItemCommands::Add(args) => {
            require_role(&store, acting_as, &[Role::Admin])?;
            let units = store
                .create_units(&args.name, args.count, args.first_code)
                .into_diagnostic()?;
            print!(
                "{} Created {} unit(s) of '{}'",
                style("✓").green().bold(),
                units.len(),
                args.name
            );
            if let (Some(first), Some(last)) = (
                units.first().and_then(|u| u.code.clone()),
                units.last().and_then(|u| u.code.clone()),
            ) {
                print!(" with codes {first}..={last}");
            }
            println!();
        }
        ItemCommands::List => {
            let summary = store.stock_summary().into_diagnostic()?;
            if summary.is_empty() {
                println!("No items in the catalog");
                return Ok(());
            }
            let rows: Vec<StockRow> = summary
                .into_iter()
                .map(|line| StockRow {
                    name: line.name,
                    total: line.total,
                    available: line.available,
                    coded: line.coded,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::psql()));
        }
        ItemCommands::Units(args) => {
            let units = store.units_named(&args.name).into_diagnostic()?;
            if units.is_empty() {
                println!("No units named '{}'", args.name);
                return Ok(());
            }
            let rows: Vec<UnitRow> = units
                .into_iter()
                .map(|unit| UnitRow {
                    id: unit.id,
                    code: unit.code.unwrap_or_default(),
                    available: if unit.is_available { "yes" } else { "no" },
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::psql()));
        }
        ItemCommands::Available(args) => {
            let count = store.count_available(&args.name).into_diagnostic()?;
            println!("{count}");
        }
        ItemCommands::Delete(args) => {
            require_role(&store, acting_as, &[Role::Admin])?;
            let unit = store.unit(args.id).into_diagnostic()?;
            if !args.yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete unit {} ({})?", unit.id, unit.label()))
                    .default(false)
                    .interact()
                    .into_diagnostic()?;
                if !confirmed {
                    println!("Aborted");
                    return Ok(());
                }
            }
            store.delete_unit(args.id).into_diagnostic()?;
            println!("{} Deleted unit {}", style("✓").green().bold(), args.id);
        }
    }
    Ok(())
}
