use regex::Regex;
use std::sync::LazyLock;

use super::ApiError;
use crate::entities::crops::CropType;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation_field("email", "Email is required"));
    }

    if trimmed.len() > 254 || !EMAIL_RE.is_match(trimmed) {
        return Err(ApiError::validation_field(
            "email",
            "Enter a valid email address",
        ));
    }

    Ok(trimmed)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation_field(
            "username",
            "Username is required",
        ));
    }

    if trimmed.len() > 150 {
        return Err(ApiError::validation_field(
            "username",
            "Username must be 150 characters or less",
        ));
    }

    Ok(trimmed)
}

pub fn validate_password(password: &str, min_length: usize) -> Result<&str, ApiError> {
    if password.len() < min_length {
        return Err(ApiError::validation_field(
            "password",
            format!("Password must be at least {min_length} characters"),
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::validation_field(
            "password",
            "Password cannot be entirely numeric",
        ));
    }

    Ok(password)
}

pub fn parse_crop_type(raw: &str) -> Result<CropType, ApiError> {
    CropType::ALL
        .iter()
        .copied()
        .find(|t| t.as_key() == raw)
        .ok_or_else(|| {
            ApiError::validation_field("crop_type", format!("Unknown crop type: {raw}"))
        })
}

pub fn validate_quantity(quantity: i64) -> Result<i32, ApiError> {
    if quantity < 0 {
        return Err(ApiError::validation_field(
            "quantity",
            "Quantity must be a non-negative integer",
        ));
    }

    i32::try_from(quantity).map_err(|_| {
        ApiError::validation_field("quantity", format!("Quantity too large: {quantity}"))
    })
}

pub fn validate_crop_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation_field("name", "Name is required"));
    }

    if trimmed.len() > 100 {
        return Err(ApiError::validation_field(
            "name",
            "Name must be 100 characters or less",
        ));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("farmer@example.com").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("two@at@example.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Testpass@123", 8).is_ok());
        assert!(validate_password("short1", 8).is_err());
        assert!(validate_password("123456789", 8).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("farmer1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_parse_crop_type() {
        assert_eq!(parse_crop_type("cereal").unwrap(), CropType::Cereal);
        assert_eq!(parse_crop_type("root_tuber").unwrap(), CropType::RootTuber);
        assert!(parse_crop_type("mineral").is_err());
        assert!(parse_crop_type("Cereal").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(0).unwrap(), 0);
        assert_eq!(validate_quantity(150).unwrap(), 150);
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn test_validate_crop_name() {
        assert!(validate_crop_name("Wheat").is_ok());
        assert!(validate_crop_name("   ").is_err());
        assert!(validate_crop_name(&"x".repeat(101)).is_err());
    }
}
