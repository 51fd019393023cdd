//! `stockroom init` command - create a new project

use std::path::PathBuf;

use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::Project;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

pub fn run(args: InitArgs) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().into_diagnostic()?,
    };
    let project = Project::init(&dir).into_diagnostic()?;
    println!(
        "{} Initialized stockroom project in {}",
        style("✓").green().bold(),
        style(project.db_path().parent().unwrap_or(project.root()).display()).cyan()
    );
    Ok(())
}
