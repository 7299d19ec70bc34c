//! Input validation utilities

use crate::error::{ApiError, ApiResult};

/// Maximum note length in characters, after trimming
pub const NOTE_MAX_CHARS: usize = 1000;

/// Maximum stored length of a Pokémon display name
pub const POKEMON_NAME_MAX_CHARS: usize = 100;

/// Validate note content and return the trimmed text to store
pub fn validate_note_content(content: &str) -> ApiResult<String> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err(ApiError::Validation("Note content is required".to_string()));
    }

    if trimmed.chars().count() > NOTE_MAX_CHARS {
        return Err(ApiError::Validation(format!(
            "Note content must be at most {} characters long",
            NOTE_MAX_CHARS
        )));
    }

    Ok(trimmed.to_string())
}

/// Validate a favourite request, returning the trimmed display name
pub fn validate_favourite(pokemon_id: i32, pokemon_name: &str) -> ApiResult<String> {
    if pokemon_id <= 0 {
        return Err(ApiError::Validation(
            "Pokemon id must be a positive integer".to_string(),
        ));
    }

    let name = pokemon_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Pokemon name is required".to_string()));
    }

    if name.chars().count() > POKEMON_NAME_MAX_CHARS {
        return Err(ApiError::Validation(format!(
            "Pokemon name must be at most {} characters long",
            POKEMON_NAME_MAX_CHARS
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_length_bounds() {
        assert!(validate_note_content("").is_err());
        assert!(validate_note_content("   \n\t ").is_err());
        assert!(validate_note_content(&"x".repeat(1001)).is_err());

        assert_eq!(validate_note_content("x").unwrap(), "x");
        assert_eq!(validate_note_content(&"x".repeat(1000)).unwrap().len(), 1000);
    }

    #[test]
    fn test_note_is_trimmed_before_counting() {
        let padded = format!("  {}  ", "x".repeat(1000));
        assert_eq!(validate_note_content(&padded).unwrap(), "x".repeat(1000));
        assert_eq!(validate_note_content("  shiny hunt ").unwrap(), "shiny hunt");
    }

    #[test]
    fn test_note_length_counts_characters_not_bytes() {
        // 1000 two-byte characters
        let accented = "é".repeat(1000);
        assert!(validate_note_content(&accented).is_ok());
    }

    #[test]
    fn test_favourite_validation() {
        assert_eq!(validate_favourite(25, " Pikachu ").unwrap(), "Pikachu");
        assert!(validate_favourite(0, "Missingno").is_err());
        assert!(validate_favourite(-4, "Pikachu").is_err());
        assert!(validate_favourite(25, "  ").is_err());
        assert!(validate_favourite(25, &"a".repeat(101)).is_err());
    }
}
