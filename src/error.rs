//! Error taxonomy shared by every command.
//!
//! Validation failures happen before any network call and are always fixable
//! by correcting flags. Execution failures wrap the single API call with the
//! action that was attempted. Nothing is retried.

use thiserror::Error;

/// Failure of the one outbound API call: transport-level or service-side.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed or missing flag value, caught at parse time.
    #[error("invalid value for --{flag}: {details}")]
    Validation { flag: &'static str, details: String },

    #[error("project ID missing: set --project-id, NIMBUS_PROJECT_ID, or run `nimbus config set --project-id`")]
    MissingProjectId,

    /// The single API call for this invocation failed.
    #[error("{action}: {source}")]
    Execution {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("{action}: {source}")]
    Render {
        action: &'static str,
        #[source]
        source: RenderError,
    },

    #[error("missing credentials: {0}")]
    Auth(String),

    #[error("operation aborted")]
    Aborted,

    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

impl CliError {
    pub fn validation(flag: &'static str, details: impl Into<String>) -> Self {
        CliError::Validation {
            flag,
            details: details.into(),
        }
    }

    pub fn execution(action: &'static str, source: ApiError) -> Self {
        CliError::Execution { action, source }
    }

    pub fn render(action: &'static str, source: impl Into<RenderError>) -> Self {
        CliError::Render {
            action,
            source: source.into(),
        }
    }

    /// Process exit code: 1 for user input problems, 3 for missing
    /// credentials, 2 for everything that failed past validation.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } | CliError::MissingProjectId | CliError::Aborted => 1,
            CliError::Auth(_) => 3,
            _ => 2,
        }
    }
}
