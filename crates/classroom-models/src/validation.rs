//! Custom `validator` rules.

use std::borrow::Cow;

use validator::ValidationError;

/// Rejects values that are empty once trimmed. Names are trimmed before
/// they are stored, so `"   "` counts as missing.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Attaches `message` to a rule failure built by hand.
pub(crate) fn with_message(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Ana").is_ok());
        assert!(not_blank(" Ana ").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t ").is_err());
    }
}
