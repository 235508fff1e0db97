use std::fmt;

/// Published spreadsheet holding the daily plan, exported as CSV.
pub const SHEET_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRKGGAzH4TH8kL-868ITJn-oJ5TubHVJasslgxXabdyDvCksIYeo92FtMchhBYggloM5r7SqH5BDgN4/pub?output=csv";

/// Endpoint for creating a single task.
pub const TODOIST_TASKS_URL: &str = "https://api.todoist.com/api/v1/tasks";

/// Environment variable holding the Todoist API token.
pub const TOKEN_ENV_VAR: &str = "TODOIST_API";

pub const COL_DATE: &str = "DATE";
pub const COL_BREAKFAST: &str = "BREAKFAST";
pub const COL_LUNCH: &str = "LUNCH";
pub const COL_DINNER: &str = "DINNER";
pub const COL_SUPPORT: &str = "SUPPORT";
pub const COL_TRAINING: &str = "TRAINING";
pub const COL_CALORIES: &str = "KAL_GAP";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The token variable is unset, blank or not valid unicode.
    #[error("environment variable '{0}' is missing, no tasks can be created")]
    MissingCredential(&'static str),
}

/// API token for the task service, read once at startup.
///
/// The value is never shown by `Debug` so it can't leak into logs.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    /// Read [TOKEN_ENV_VAR] from the process environment.
    pub fn from_env() -> Result<Credential, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the token through `lookup`; blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Credential, ConfigError> {
        match lookup(TOKEN_ENV_VAR) {
            Some(token) if !token.trim().is_empty() => Ok(Credential::new(token.trim())),
            _ => Err(ConfigError::MissingCredential(TOKEN_ENV_VAR)),
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
