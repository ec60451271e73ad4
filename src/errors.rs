use colored::*;
use std::fmt;

#[derive(Debug)]
pub enum OkrDashError {
    // Configuration errors
    ConfigValidationFailed(String),

    // Jira errors
    JiraAuthFailed(u16),
    JiraApiError(u16, String),

    // Dashboard errors
    UnknownAssignee(String, String),

    // Network errors
    NetworkError(String),

    // Generic error
    Other(String),
}

impl fmt::Display for OkrDashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration errors
            OkrDashError::ConfigValidationFailed(msg) => {
                write!(f, "{}\n", "Configuration validation failed".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check your API token is valid\n")?;
                write!(f, "   2. Verify network connectivity\n")?;
                write!(f, "   3. Reinitialize if needed: {}", "okrdash init".green())
            }

            // Jira errors
            OkrDashError::JiraAuthFailed(status) => {
                write!(f, "{}\n", format!("Jira authentication failed ({})", status).red().bold())?;
                write!(f, "   {}\n\n", "Your API token may have expired or is invalid".dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Generate new token: {}\n", "https://id.atlassian.com/manage-profile/security/api-tokens".cyan())?;
                write!(f, "   2. Update config: {}\n", "okrdash init".green())?;
                write!(f, "   3. Or edit manually: ~/.okrdash/config.toml")
            }
            OkrDashError::JiraApiError(status, msg) => {
                write!(f, "{}\n", format!("Jira API error ({})", status).red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   Try again or check your network connection")
            }

            // Dashboard errors
            OkrDashError::UnknownAssignee(name, available) => {
                write!(f, "{}\n", format!("No tickets for assignee '{}'", name).red().bold())?;
                write!(f, "   {}\n\n", "The name must match an assignee in the current snapshot".dimmed())?;
                write!(f, "   Team members with tickets:\n")?;
                write!(f, "   {}", available.dimmed())
            }

            // Network errors
            OkrDashError::NetworkError(msg) => {
                write!(f, "{}\n", "Network error".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check your internet connection\n")?;
                write!(f, "   2. Verify you can reach your Jira instance\n")?;
                write!(f, "   3. Try again in a moment")
            }

            // Generic
            OkrDashError::Other(msg) => {
                write!(f, "{}\n", "Error".red().bold())?;
                write!(f, "   {}", msg.dimmed())
            }
        }
    }
}

impl std::error::Error for OkrDashError {}

// Conversion from anyhow::Error
impl From<anyhow::Error> for OkrDashError {
    fn from(err: anyhow::Error) -> Self {
        OkrDashError::Other(err.to_string())
    }
}

// Helper to convert common error types
impl From<std::io::Error> for OkrDashError {
    fn from(err: std::io::Error) -> Self {
        OkrDashError::Other(err.to_string())
    }
}

impl From<reqwest::Error> for OkrDashError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            OkrDashError::NetworkError(err.to_string())
        } else if let Some(status) = err.status() {
            if status == 401 || status == 403 {
                OkrDashError::JiraAuthFailed(status.as_u16())
            } else {
                OkrDashError::JiraApiError(status.as_u16(), err.to_string())
            }
        } else {
            OkrDashError::Other(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, OkrDashError>;
