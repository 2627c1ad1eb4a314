//! Flag-level validation shared by all commands.
//!
//! Everything here runs before a request is built; failures name the
//! offending flag so the user can fix the invocation.

use uuid::Uuid;

use crate::cli::GlobalArgs;
use crate::error::CliError;

/// Every remote command requires a project ID, resolved from flag, env,
/// or config file before this runs.
pub fn project_id(global: &GlobalArgs) -> Result<String, CliError> {
    match global.project_id.as_deref() {
        Some(id) if !id.is_empty() => {
            uuid("project-id", id)?;
            Ok(id.to_string())
        }
        _ => Err(CliError::MissingProjectId),
    }
}

/// Identifier flags are shape-checked at parse time, not at call time.
pub fn uuid(flag: &'static str, value: &str) -> Result<(), CliError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| CliError::validation(flag, "must be a valid UUID"))
}

pub fn limit(limit: Option<i64>) -> Result<(), CliError> {
    if let Some(limit) = limit {
        if limit < 1 {
            return Err(CliError::validation("limit", "must be greater than 0"));
        }
    }
    Ok(())
}

pub fn maintenance_window(hours: i64) -> Result<(), CliError> {
    if !(1..=24).contains(&hours) {
        return Err(CliError::validation(
            "maintenance-window",
            "must be between 1 and 24",
        ));
    }
    Ok(())
}
