//! Shared helper functions for CLI commands

use chrono::{DateTime, Utc};
use miette::{IntoDiagnostic, Result};

use crate::core::{Project, Store};
use crate::entities::Role;

/// Locate the enclosing project and open its store.
pub fn open_store() -> Result<(Project, Store)> {
    let project = Project::find().into_diagnostic()?;
    let store = project.open_store().into_diagnostic()?;
    Ok((project, store))
}

/// Guard for privileged commands. Only enforced when an acting identity was
/// supplied; a bare invocation is treated as the local operator.
pub fn require_role(store: &Store, acting_as: Option<&str>, required: &[Role]) -> Result<()> {
    let Some(email) = acting_as else {
        return Ok(());
    };
    let user = store.user_by_email(email).into_diagnostic()?;
    if !user.role.permits(required) {
        let wanted = required
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(miette::miette!(
            "{} has role '{}' but this command requires {}",
            email,
            user.role,
            wanted
        ));
    }
    Ok(())
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Short timestamp for table columns.
pub fn short_ts(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Short optional timestamp, empty when unset.
pub fn short_ts_opt(dt: Option<DateTime<Utc>>) -> String {
    dt.map(short_ts).unwrap_or_default()
}
