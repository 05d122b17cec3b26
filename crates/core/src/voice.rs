//! Voice name normalization.
//!
//! A voice asset is keyed by user id and a voice id derived from
//! the display name. The id doubles as a directory component, so
//! normalization also rejects anything that could escape the voice
//! library root.

use crate::error::CoreError;

/// Normalize a display name into a voice id: lowercased, spaces
/// replaced with underscores.
///
/// Fails with [`CoreError::Validation`] when the result is empty or
/// contains path separators or traversal components.
pub fn voice_slug(name: &str) -> Result<String, CoreError> {
    let slug = name.trim().to_lowercase().replace(' ', "_");

    if slug.is_empty() {
        return Err(CoreError::Validation("Voice name must not be empty".into()));
    }
    if slug.contains('/') || slug.contains('\\') || slug.contains("..") {
        return Err(CoreError::Validation(format!(
            "Invalid voice name: {name}"
        )));
    }

    Ok(slug)
}

/// Validate a user id for use as a directory component.
pub fn validate_user_id(user_id: &str) -> Result<(), CoreError> {
    if user_id.trim().is_empty() {
        return Err(CoreError::Validation("User id must not be empty".into()));
    }
    if user_id.contains('/') || user_id.contains('\\') || user_id.contains("..") {
        return Err(CoreError::Validation(format!("Invalid user id: {user_id}")));
    }
    Ok(())
}
