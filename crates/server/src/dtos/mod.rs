pub mod directory;
pub mod schedule;
pub mod user;

use crate::error::AppError;

/// Longest free-text name the directory tables accept
pub const MAX_NAME_LEN: usize = 255;

/// Longest group or classroom name
pub const MAX_SHORT_NAME_LEN: usize = 50;

/// Trims a submitted name and checks it is non-empty and at most `max` characters
pub fn validate_name(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod test {
    use super::{MAX_SHORT_NAME_LEN, validate_name};

    #[test]
    fn test_names_are_trimmed() {
        assert_eq!(validate_name("name", "  ИВТ-21 ", 50).unwrap(), "ИВТ-21");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(validate_name("name", "   ", 50).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        let cyrillic = "Б".repeat(MAX_SHORT_NAME_LEN);
        assert!(validate_name("name", &cyrillic, MAX_SHORT_NAME_LEN).is_ok());
        assert!(validate_name("name", &format!("{cyrillic}Б"), MAX_SHORT_NAME_LEN).is_err());
    }
}
