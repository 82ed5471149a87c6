use super::ApiError;
use crate::constants::catalog::CATEGORIES;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

/// Light-touch email check; the storefront does the strict validation and
/// the unique index has the final say.
pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }

    let valid = trimmed.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });

    if !valid || trimmed.contains(char::is_whitespace) {
        return Err(ApiError::validation("Invalid email address"));
    }

    Ok(trimmed)
}

pub fn validate_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    Ok(password)
}

pub fn validate_title(title: &str) -> Result<&str, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    Ok(trimmed)
}

pub fn validate_price(price: f64) -> Result<f64, ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::validation("Price must be zero or greater"));
    }
    Ok(price)
}

pub fn validate_category(category: &str) -> Result<&str, ApiError> {
    if !CATEGORIES.contains(&category) {
        return Err(ApiError::validation(format!(
            "Invalid category: {}. Must be one of: {}",
            category,
            CATEGORIES.join(", ")
        )));
    }
    Ok(category)
}

pub fn validate_image(image: &str) -> Result<&str, ApiError> {
    let trimmed = image.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Image is required"));
    }
    Ok(trimmed)
}

pub fn validate_stock(stock: i32) -> Result<i32, ApiError> {
    if stock < 0 {
        return Err(ApiError::validation("Stock must be zero or greater"));
    }
    Ok(stock)
}

pub fn validate_rating(rating: f64) -> Result<f64, ApiError> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(ApiError::validation("Rating must be between 0 and 5"));
    }
    Ok(rating)
}
