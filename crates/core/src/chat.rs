//! Chat message rules.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum chat message length (characters).
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Validate and trim a chat message body.
pub fn normalize_body(body: &str) -> Result<String, CoreError> {
    let text = body.trim();
    if text.is_empty() {
        return Err(CoreError::Validation("Message body must not be empty".into()));
    }
    let len = text.chars().count();
    if len > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters (got {len})"
        )));
    }
    Ok(text.to_string())
}

/// Reject messages addressed to the sender.
pub fn validate_recipient(sender_id: DbId, recipient_id: DbId) -> Result<(), CoreError> {
    if sender_id == recipient_id {
        return Err(CoreError::Validation("Cannot send a message to yourself".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_trimmed() {
        assert_eq!(normalize_body("  olá  ").unwrap(), "olá");
    }

    #[test]
    fn blank_body_rejected() {
        assert!(normalize_body("").is_err());
        assert!(normalize_body(" \n\t ").is_err());
    }

    #[test]
    fn long_body_rejected() {
        assert!(normalize_body(&"x".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
        assert!(normalize_body(&"x".repeat(MAX_MESSAGE_LENGTH)).is_ok());
    }

    #[test]
    fn self_messages_rejected() {
        assert!(validate_recipient(3, 3).is_err());
        assert!(validate_recipient(3, 4).is_ok());
    }
}
