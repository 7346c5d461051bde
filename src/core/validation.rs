//! Form field validation.
//!
//! Every validator is a total function: malformed input produces
//! `is_valid: false` with a user-facing message, never an error or panic.
//! Numeric validators additionally return the coerced value, falling back
//! to the field's default (price 0, quantity 1, budget 0) when invalid.

use once_cell::sync::Lazy;
use regex::Regex;

/// Result of validating a text field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldValidation {
    /// Whether the input passed every rule
    pub is_valid: bool,
    /// User-facing message; empty when valid
    pub message: String,
}

impl FieldValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Result of validating a numeric field, with the coerced value.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberValidation {
    /// Whether the input passed every rule
    pub is_valid: bool,
    /// User-facing message; empty when valid
    pub message: String,
    /// Parsed value when valid, the field default otherwise
    pub value: f64,
}

impl NumberValidation {
    fn valid(value: f64) -> Self {
        Self {
            is_valid: true,
            message: String::new(),
            value,
        }
    }

    fn invalid(message: impl Into<String>, default: f64) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            value: default,
        }
    }
}

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z\s]+$").unwrap()
});

// At most two decimal places, no sign, no exponent
static TWO_DECIMALS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\d+(\.\d{1,2})?$").unwrap()
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap()
});

const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&";
const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 50;
const LIST_NAME_MAX_LENGTH: usize = 100;
const ITEM_NAME_MAX_LENGTH: usize = 200;
const PRICE_MAX: f64 = 99_999.99;
const QUANTITY_MIN: f64 = 0.01;
const QUANTITY_MAX: f64 = 9_999.0;
const BUDGET_MAX: f64 = 999_999.99;

/// Validates an email address (required, `local@domain` shape).
#[must_use]
pub fn validate_email(email: &str) -> FieldValidation {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return FieldValidation::invalid("Email is required");
    }
    if !EMAIL_PATTERN.is_match(trimmed) {
        return FieldValidation::invalid("Please enter a valid email address");
    }
    FieldValidation::valid()
}

/// Validates a password: at least 8 characters with one lowercase letter,
/// one uppercase letter, one digit, and one of `@$!%*?&`.
#[must_use]
pub fn validate_password(password: &str) -> FieldValidation {
    if password.is_empty() {
        return FieldValidation::invalid("Password is required");
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return FieldValidation::invalid(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters long"
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));
    if !(has_lower && has_upper && has_digit && has_special) {
        return FieldValidation::invalid(
            "Password must be at least 8 characters with uppercase, lowercase, number, and special character",
        );
    }
    FieldValidation::valid()
}

/// Validates that a password confirmation matches the original.
#[must_use]
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> FieldValidation {
    if confirmation.is_empty() {
        return FieldValidation::invalid("Password confirmation is required");
    }
    if password != confirmation {
        return FieldValidation::invalid("Passwords do not match");
    }
    FieldValidation::valid()
}

/// Validates a personal name field (first name, last name).
///
/// `field_name` labels the error messages, e.g. `"First name"`.
#[must_use]
pub fn validate_name(name: &str, field_name: &str) -> FieldValidation {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return FieldValidation::invalid(format!("{field_name} is required"));
    }
    if trimmed.chars().count() < NAME_MIN_LENGTH {
        return FieldValidation::invalid(format!(
            "{field_name} must be at least {NAME_MIN_LENGTH} characters long"
        ));
    }
    if trimmed.chars().count() > NAME_MAX_LENGTH {
        return FieldValidation::invalid(format!(
            "{field_name} must be no more than {NAME_MAX_LENGTH} characters long"
        ));
    }
    if !NAME_PATTERN.is_match(trimmed) {
        return FieldValidation::invalid("Name must contain only letters and spaces");
    }
    FieldValidation::valid()
}

/// Validates a shopping list name (non-empty, at most 100 characters).
#[must_use]
pub fn validate_list_name(name: &str) -> FieldValidation {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return FieldValidation::invalid("List name cannot be empty");
    }
    if trimmed.chars().count() > LIST_NAME_MAX_LENGTH {
        return FieldValidation::invalid(format!(
            "List name must be no more than {LIST_NAME_MAX_LENGTH} characters long"
        ));
    }
    FieldValidation::valid()
}

/// Validates an item name (non-empty, at most 200 characters).
#[must_use]
pub fn validate_item_name(name: &str) -> FieldValidation {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return FieldValidation::invalid("Item name cannot be empty");
    }
    if trimmed.chars().count() > ITEM_NAME_MAX_LENGTH {
        return FieldValidation::invalid(format!(
            "Item name must be no more than {ITEM_NAME_MAX_LENGTH} characters long"
        ));
    }
    FieldValidation::valid()
}

/// Validates an optional price. Empty input is valid with value `0`.
#[must_use]
pub fn validate_price(price: &str) -> NumberValidation {
    if price.is_empty() {
        return NumberValidation::valid(0.0);
    }
    let Ok(parsed) = price.parse::<f64>() else {
        return NumberValidation::invalid("Please enter a valid price", 0.0);
    };
    if !parsed.is_finite() {
        return NumberValidation::invalid("Please enter a valid price", 0.0);
    }
    if parsed < 0.0 {
        return NumberValidation::invalid("Price cannot be negative", 0.0);
    }
    if parsed > PRICE_MAX {
        return NumberValidation::invalid(format!("Price cannot exceed {PRICE_MAX}"), 0.0);
    }
    if !TWO_DECIMALS_PATTERN.is_match(price) {
        return NumberValidation::invalid("Price can have at most 2 decimal places", 0.0);
    }
    NumberValidation::valid(parsed)
}

/// Validates an optional quantity. Empty input is valid with value `1`.
#[must_use]
pub fn validate_quantity(quantity: &str) -> NumberValidation {
    if quantity.is_empty() {
        return NumberValidation::valid(1.0);
    }
    let Ok(parsed) = quantity.parse::<f64>() else {
        return NumberValidation::invalid("Please enter a valid quantity", 1.0);
    };
    if !parsed.is_finite() {
        return NumberValidation::invalid("Please enter a valid quantity", 1.0);
    }
    if parsed < QUANTITY_MIN {
        return NumberValidation::invalid("Quantity must be greater than 0", 1.0);
    }
    if parsed > QUANTITY_MAX {
        return NumberValidation::invalid(format!("Quantity cannot exceed {QUANTITY_MAX}"), 1.0);
    }
    if !TWO_DECIMALS_PATTERN.is_match(quantity) {
        return NumberValidation::invalid("Quantity can have at most 2 decimal places", 1.0);
    }
    NumberValidation::valid(parsed)
}

/// Validates an optional budget amount. Empty input is valid with value `0`.
///
/// Unlike price and quantity there is no decimal-places rule.
#[must_use]
pub fn validate_budget(budget: &str) -> NumberValidation {
    if budget.is_empty() {
        return NumberValidation::valid(0.0);
    }
    let Ok(parsed) = budget.parse::<f64>() else {
        return NumberValidation::invalid("Please enter a valid budget amount", 0.0);
    };
    if !parsed.is_finite() {
        return NumberValidation::invalid("Please enter a valid budget amount", 0.0);
    }
    if parsed < 0.0 {
        return NumberValidation::invalid("Budget cannot be negative", 0.0);
    }
    if parsed > BUDGET_MAX {
        return NumberValidation::invalid("Budget amount is too large", 0.0);
    }
    NumberValidation::valid(parsed)
}

/// Validates an optional phone number. Empty input is valid.
///
/// Separators (spaces, dashes, parentheses) are stripped before matching.
#[must_use]
pub fn validate_phone(phone: &str) -> FieldValidation {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return FieldValidation::valid();
    }
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if !PHONE_PATTERN.is_match(&digits) {
        return FieldValidation::invalid("Please enter a valid phone number");
    }
    FieldValidation::valid()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    #[test]
    fn test_email_accepts_standard_addresses() {
        assert!(validate_email("foo@example.com").is_valid);
        assert!(validate_email("  foo@example.com  ").is_valid);
    }

    #[test]
    fn test_email_rejects_empty_and_malformed() {
        assert_eq!(validate_email("").message, "Email is required");
        assert_eq!(validate_email("   ").message, "Email is required");
        let result = validate_email("not-an-email");
        assert!(!result.is_valid);
        assert_eq!(result.message, "Please enter a valid email address");
        assert!(!validate_email("foo@nodot").is_valid);
        assert!(!validate_email("foo bar@example.com").is_valid);
    }

    #[test]
    fn test_password_length_rule() {
        let result = validate_password("Ab1!");
        assert!(!result.is_valid);
        assert_eq!(result.message, "Password must be at least 8 characters long");
    }

    #[test]
    fn test_password_character_class_rules() {
        assert!(validate_password("Passw0rd!").is_valid);
        // Missing one class each
        assert!(!validate_password("passw0rd!").is_valid);
        assert!(!validate_password("PASSW0RD!").is_valid);
        assert!(!validate_password("Password!").is_valid);
        assert!(!validate_password("Passw0rdd").is_valid);
    }

    #[test]
    fn test_password_confirmation() {
        assert!(validate_password_confirmation("abc", "abc").is_valid);
        assert_eq!(
            validate_password_confirmation("abc", "abd").message,
            "Passwords do not match"
        );
        assert_eq!(
            validate_password_confirmation("abc", "").message,
            "Password confirmation is required"
        );
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("Jane Doe", "First name").is_valid);
        assert_eq!(
            validate_name("", "First name").message,
            "First name is required"
        );
        assert_eq!(
            validate_name("J", "First name").message,
            "First name must be at least 2 characters long"
        );
        assert!(!validate_name(&"a".repeat(51), "First name").is_valid);
        assert_eq!(
            validate_name("J4ne", "First name").message,
            "Name must contain only letters and spaces"
        );
    }

    #[test]
    fn test_list_name_rules() {
        assert!(validate_list_name("Weekly Groceries").is_valid);
        assert_eq!(validate_list_name("   ").message, "List name cannot be empty");
        assert!(validate_list_name(&"x".repeat(100)).is_valid);
        assert!(!validate_list_name(&"x".repeat(101)).is_valid);
    }

    #[test]
    fn test_item_name_rules() {
        assert!(validate_item_name("Milk").is_valid);
        assert_eq!(validate_item_name("").message, "Item name cannot be empty");
        assert!(validate_item_name(&"x".repeat(200)).is_valid);
        assert!(!validate_item_name(&"x".repeat(201)).is_valid);
    }

    #[test]
    fn test_price_empty_defaults_to_zero() {
        let result = validate_price("");
        assert!(result.is_valid);
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(validate_price("12.34").value, 12.34);
        assert_eq!(validate_price("12").value, 12.0);

        let result = validate_price("12.345");
        assert!(!result.is_valid);
        assert_eq!(result.message, "Price can have at most 2 decimal places");
        assert_eq!(result.value, 0.0);

        assert_eq!(validate_price("abc").message, "Please enter a valid price");
        assert_eq!(validate_price("-1").message, "Price cannot be negative");
        assert!(!validate_price("100000").is_valid);
        assert!(!validate_price("inf").is_valid);
    }

    #[test]
    fn test_quantity_empty_defaults_to_one() {
        let result = validate_quantity("");
        assert!(result.is_valid);
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_quantity_rules() {
        assert_eq!(validate_quantity("2.5").value, 2.5);
        assert_eq!(
            validate_quantity("0").message,
            "Quantity must be greater than 0"
        );
        assert!(!validate_quantity("10000").is_valid);
        assert_eq!(
            validate_quantity("1.005").message,
            "Quantity can have at most 2 decimal places"
        );
        let result = validate_quantity("abc");
        assert!(!result.is_valid);
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_budget_rules() {
        let empty = validate_budget("");
        assert!(empty.is_valid);
        assert_eq!(empty.value, 0.0);

        assert_eq!(validate_budget("150.75").value, 150.75);
        // No decimal-places restriction on budgets
        assert!(validate_budget("10.999").is_valid);
        assert_eq!(validate_budget("-5").message, "Budget cannot be negative");
        assert_eq!(
            validate_budget("1000000").message,
            "Budget amount is too large"
        );
        assert_eq!(
            validate_budget("abc").message,
            "Please enter a valid budget amount"
        );
    }

    #[test]
    fn test_phone_is_optional_and_strips_separators() {
        assert!(validate_phone("").is_valid);
        assert!(validate_phone("   ").is_valid);
        assert!(validate_phone("+1 (555) 123-4567").is_valid);
        assert!(!validate_phone("0123").is_valid);
        assert!(!validate_phone("phone").is_valid);
    }
}
