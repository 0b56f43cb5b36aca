//! Business logic services

pub mod auth;
pub mod catalog;
pub mod order;
pub mod seed;
pub mod shipment;
pub mod supplier;
pub mod user;

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use shared::types::UnknownVariant;
use validator::ValidationError;

use crate::error::AppError;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use order::OrderService;
pub use seed::seed_demo_data;
pub use shipment::ShipmentService;
pub use supplier::SupplierService;
pub use user::UserService;

/// Parse a status or role string supplied by a client
pub(crate) fn parse_field<T>(field: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.parse()
        .map_err(|e: UnknownVariant| AppError::validation(field, format!("Invalid {}", e.kind)))
}

/// Adapt a `shared::validation` rule to the `validator` custom hook
pub(crate) fn rule(code: &'static str, result: Result<(), &'static str>) -> Result<(), ValidationError> {
    result.map_err(|message| {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Borrowed(message));
        err
    })
}

pub(crate) fn check_email(email: &str) -> Result<(), ValidationError> {
    rule("email", shared::validation::validate_email(email))
}

pub(crate) fn check_password(password: &str) -> Result<(), ValidationError> {
    rule("password", shared::validation::validate_password(password))
}

pub(crate) fn check_required(value: &str) -> Result<(), ValidationError> {
    rule("required", shared::validation::validate_required(value))
}

pub(crate) fn check_price(price: &Decimal) -> Result<(), ValidationError> {
    rule("price", shared::validation::validate_price(*price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderStatus;

    #[test]
    fn test_parse_field_rejects_unknown() {
        let err = parse_field::<OrderStatus>("Status", "Lost").unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "Status"));
        assert_eq!(
            parse_field::<OrderStatus>("Status", "Shipped").unwrap(),
            OrderStatus::Shipped
        );
    }

    #[test]
    fn test_check_email_carries_message() {
        let err = check_email("not-an-email").unwrap_err();
        assert!(err.message.is_some());
        assert!(check_email("ops@example.com").is_ok());
    }
}
