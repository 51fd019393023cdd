//! `stockroom user` command - account management

use clap::{Args, Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::open_store;
use crate::entities::Role;

/// CLI-friendly role enum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliRole {
    Student,
    Teacher,
    Admin,
}

impl From<CliRole> for Role {
    fn from(cli: CliRole) -> Self {
        match cli {
            CliRole::Student => Role::Student,
            CliRole::Teacher => Role::Teacher,
            CliRole::Admin => Role::Admin,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user
    Add(AddArgs),

    /// List users
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Full name
    pub name: String,

    /// Email (login identity, unique)
    pub email: String,

    #[arg(long, value_enum, default_value_t = CliRole::Student)]
    pub role: CliRole,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show users with this role
    #[arg(long, value_enum)]
    pub role: Option<CliRole>,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
}

pub fn run(cmd: UserCommands) -> Result<()> {
    let (_project, mut store) = open_store()?;
    match cmd {
        UserCommands::Add(args) => {
            let user = store
                .add_user(&args.name, &args.email, args.role.into())
                .into_diagnostic()?;
            println!(
                "{} Added {} <{}> as {}",
                style("✓").green().bold(),
                user.name,
                user.email,
                user.role
            );
        }
        UserCommands::List(args) => {
            let users = store
                .list_users(args.role.map(Into::into))
                .into_diagnostic()?;
            if users.is_empty() {
                println!("No users");
                return Ok(());
            }
            let rows: Vec<UserRow> = users
                .into_iter()
                .map(|user| UserRow {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    role: user.role.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::psql()));
        }
    }
    Ok(())
}
