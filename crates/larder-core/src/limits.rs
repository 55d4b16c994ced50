//! Input validation limits for resource protection

use crate::error::ValidationError;

/// Maximum length for entity names (256 chars)
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length for a recipe summary (4KB)
pub const MAX_SUMMARY_LEN: usize = 4 * 1024;

/// Maximum length for recipe instructions (64KB)
pub const MAX_INSTRUCTIONS_LEN: usize = 64 * 1024;

/// Maximum length for an ingredient quantity ("2 tbsp", "250g")
pub const MAX_QUANTITY_LEN: usize = 64;

/// Maximum size of a recipe image payload (8MB)
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Minimum serving count and time estimate
pub const MIN_SERVING: u32 = 1;
pub const MIN_TIME: u32 = 1;

/// Validate a name: non-blank and bounded
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate a free-text field against its limit
pub fn validate_text(field: &'static str, text: &str, max: usize) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len > max {
        return Err(ValidationError::TextTooLong { field, len, max });
    }
    Ok(())
}

/// Validate a counter that must be at least `min`
pub fn validate_minimum(field: &'static str, value: u32, min: u32) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::BelowMinimum { field, value, min });
    }
    Ok(())
}

/// Validate an image payload
pub fn validate_image(image: Option<&[u8]>) -> Result<(), ValidationError> {
    match image {
        Some(bytes) if bytes.len() > MAX_IMAGE_BYTES => Err(ValidationError::ImageTooLarge {
            len: bytes.len(),
            max: MAX_IMAGE_BYTES,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Flour").is_ok());
        assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert!(validate_name(&"x".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_minimum() {
        assert!(validate_minimum("serving", 1, MIN_SERVING).is_ok());
        assert!(validate_minimum("serving", 0, MIN_SERVING).is_err());
    }

    #[test]
    fn test_validate_image() {
        assert!(validate_image(None).is_ok());
        assert!(validate_image(Some(&[0u8; 16])).is_ok());
        assert!(validate_image(Some(&vec![0u8; MAX_IMAGE_BYTES + 1])).is_err());
    }
}
