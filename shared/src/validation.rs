//! Validation utilities for the Supply Chain Management Platform

use rust_decimal::Decimal;

use crate::pricing::MAX_MONEY;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

// ============================================================================
// Order Validations
// ============================================================================

/// Validate an order line quantity (positive integer)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be a positive integer");
    }
    Ok(())
}

/// Validate a catalog price
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    if price > MAX_MONEY {
        return Err("Price cannot exceed 99999999.99");
    }
    Ok(())
}

/// Validate a stock count or threshold
pub fn validate_stock(stock: i32) -> Result<(), &'static str> {
    if stock < 0 {
        return Err("Stock cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (single `@`, dotted domain)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("Invalid email format");
    };

    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Validate a required free-text field
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Field cannot be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(99999, 2)).is_ok());
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
        assert!(validate_price(MAX_MONEY).is_ok());
        assert!(validate_price(Decimal::new(10_000_000_000, 2)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("contact@techsolutions.com").is_ok());
        assert!(validate_email("first.last@mail.co.uk").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
        assert!(validate_email("a@.example.com").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("admin123").is_ok());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("Widget").is_ok());
        assert!(validate_required("   ").is_err());
    }
}
