//! `stockroom course` command - course catalog

use clap::{Args, Subcommand};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::open_store;

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// Add a course
    Add(AddArgs),

    /// List courses
    List,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Course name, e.g. "Circuits I"
    pub name: String,

    /// Unique course code, e.g. "EE101"
    pub code: String,
}

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
}

pub fn run(cmd: CourseCommands) -> Result<()> {
    let (_project, mut store) = open_store()?;
    match cmd {
        CourseCommands::Add(args) => {
            let course = store.add_course(&args.name, &args.code).into_diagnostic()?;
            println!("{} Added course {}", style("✓").green().bold(), course);
        }
        CourseCommands::List => {
            let courses = store.list_courses().into_diagnostic()?;
            if courses.is_empty() {
                println!("No courses");
                return Ok(());
            }
            let rows: Vec<CourseRow> = courses
                .into_iter()
                .map(|course| CourseRow {
                    code: course.code,
                    name: course.name,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::psql()));
        }
    }
    Ok(())
}
