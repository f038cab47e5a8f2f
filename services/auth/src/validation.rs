//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::NewUser;

const MAX_NAME_LENGTH: usize = 150;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if !has_upper {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !has_lower {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !has_digit {
        return Err("Password must contain at least one digit".to_string());
    }

    if !has_special {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

fn validate_person_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "{} must be at most {} characters long",
            field, MAX_NAME_LENGTH
        ));
    }

    Ok(())
}

/// Validate a whole registration payload, reporting the first problem found
pub fn validate_new_user(user: &NewUser) -> Result<(), String> {
    validate_email(user.email.trim())?;
    validate_username(&user.username)?;
    validate_person_name("First name", &user.first_name)?;
    validate_person_name("Last name", &user.last_name)?;
    validate_password(&user.password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            email: "cook@example.com".to_string(),
            username: "cook_42".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Cook".to_string(),
            password: "Str0ng!pass".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_new_user(&new_user()).is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("chef_01").is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("chef@kitchen.io").is_ok());
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(
            validate_password("Sh0rt!"),
            Err("Password must be at least 8 characters long".to_string())
        );
        assert!(validate_password("alllowercase1!").is_err());
        assert!(validate_password("NoDigitsHere!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
        assert!(validate_password("Str0ng!pass").is_ok());
    }

    #[test]
    fn test_blank_last_name_rejected() {
        let mut user = new_user();
        user.last_name = "   ".to_string();
        assert_eq!(
            validate_new_user(&user),
            Err("Last name is required".to_string())
        );
    }
}
