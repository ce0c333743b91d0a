//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for user agent.
const MIN_USER_AGENT_LENGTH: usize = 10;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_folder("image_folder", &config.options.image_folder)?;
    validate_folder("video_folder", &config.options.video_folder)?;
    validate_user_agent(&config.network.user_agent)?;

    Ok(())
}

/// Validate a download folder setting.
///
/// Folders are always relative to the download directory.
pub fn validate_folder(field: &str, folder: &str) -> Result<()> {
    if folder.contains('\0') {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Null bytes not allowed in folder".to_string(),
        });
    }

    let trimmed = folder.trim();
    let is_absolute = trimmed.starts_with('/')
        || trimmed.starts_with('\\')
        || trimmed.chars().nth(1) == Some(':');

    if is_absolute {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "Folder '{}' must be relative to the download directory",
                folder
            ),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.trim().len()
            ),
        });
    }

    Ok(())
}
