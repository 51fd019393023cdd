//! Top-level argument definitions

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    completions, course, export, group, init, item, letter, order, status, sweep, user,
};

#[derive(Parser, Debug)]
#[command(
    name = "stockroom",
    version,
    about = "Supply-room equipment loan tracker",
    long_about = "Track physical lab stock through request, loan, return and denial,\n\
                  with atomic reservation and automatic reclamation of stale requests."
)]
pub struct Cli {
    /// Act as this user (email); admin-only commands check the role
    #[arg(long = "as", global = true, value_name = "EMAIL", env = "STOCKROOM_USER")]
    pub acting_as: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a stockroom project in the current directory
    Init(init::InitArgs),

    /// Manage the unit catalog
    #[command(subcommand)]
    Item(item::ItemCommands),

    /// Manage user accounts
    #[command(subcommand)]
    User(user::UserCommands),

    /// Manage the course catalog
    #[command(subcommand)]
    Course(course::CourseCommands),

    /// Manage class groups and enrollment
    #[command(subcommand)]
    Group(group::GroupCommands),

    /// Create orders and reserve stock
    #[command(subcommand)]
    Order(order::OrderCommands),

    /// Change line item statuses
    #[command(subcommand)]
    Status(status::StatusCommands),

    /// Reclaim stock from expired requests
    Sweep(sweep::SweepArgs),

    /// Render a student's pending/loaned item summary
    Letter(letter::LetterArgs),

    /// Export the order ledger as CSV
    Export(export::ExportArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
