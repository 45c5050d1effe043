use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::error::{ServiceError, ServiceResult};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_DESCRIPTION_LEN: usize = 5;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn require_non_empty(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn require_min_len(field: &str, value: &str, min: usize) -> ServiceResult<()> {
    if value.trim().chars().count() < min {
        return Err(ServiceError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

pub fn require_email(email: &str) -> ServiceResult<()> {
    require_non_empty("email", email)?;
    if !EMAIL_RE.is_match(email) {
        return Err(ServiceError::validation("email is not a valid address"));
    }
    Ok(())
}

pub fn place_details(title: &str, description: &str) -> ServiceResult<()> {
    require_non_empty("title", title)?;
    require_min_len("description", description, MIN_DESCRIPTION_LEN)
}
