//! `stockroom letter` command - render a student's loan summary
//!
//! The core only supplies the pending-items query; this renders the plain
//! text an email collaborator would send. Delivery is out of scope.

use clap::Args;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, short_ts};
use crate::core::PendingLine;
use crate::entities::User;

#[derive(Args, Debug)]
pub struct LetterArgs {
    /// Student email
    pub email: String,
}

fn render(user: &User, lines: &[PendingLine]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Dear {},\n\n", user.name));
    if lines.is_empty() {
        out.push_str("You have no pending or loaned supply-room items.\n");
        return out;
    }
    out.push_str("These supply-room items are registered to you:\n\n");
    for line in lines {
        let code = line
            .code
            .as_deref()
            .map(|c| format!(" [{c}]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "  - {} x {}{} ({}, requested {})\n",
            line.quantity,
            line.item_name,
            code,
            line.status,
            short_ts(line.requested_at)
        ));
    }
    out.push_str("\nPlease return loaned items to the supply room when finished.\n");
    out
}

pub fn run(args: LetterArgs) -> Result<()> {
    let (_project, store) = open_store()?;
    let user = store.user_by_email(&args.email).into_diagnostic()?;
    let lines = store.pending_items_for(user.id).into_diagnostic()?;
    print!("{}", render(&user, &lines));
    Ok(())
}
