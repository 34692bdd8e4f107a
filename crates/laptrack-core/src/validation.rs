//! # Validation Module
//!
//! Input validation for LapTrack.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                   │
//! │  ├── Types: numbers are numbers, condition is New/Used                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: laptrack-core                                                 │
//! │  └── THIS MODULE: business rules (price > 0, 1 ≤ qty ≤ available)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK constraints (ram_gb > 0, buying_cost_cents > 0)              │
//! │  └── UNIQUE ids                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use laptrack_core::money::Money;
//! use laptrack_core::validation::{validate_sale_quantity, validate_unit_price};
//!
//! assert!(validate_sale_quantity(2, 3).is_ok());
//! assert!(validate_sale_quantity(4, 3).is_err());
//! assert!(validate_unit_price(Money::zero()).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, MAX_AMOUNT};
use crate::MAX_BATCH_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted free-text attribute.
pub const MAX_TEXT_LEN: usize = 100;

/// Largest RAM size accepted, in GB.
pub const MAX_RAM_GB: u32 = 1024;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text attribute (brand, model, ...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most `max` characters
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

pub fn validate_ram_gb(ram_gb: u32) -> ValidationResult<()> {
    if ram_gb == 0 || ram_gb > MAX_RAM_GB {
        return Err(ValidationError::OutOfRange {
            field: "ram_gb".to_string(),
            min: 1,
            max: i64::from(MAX_RAM_GB),
        });
    }
    Ok(())
}

/// Checks `0 < amount <= MAX_AMOUNT`.
fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Buying cost must be positive and at most [`MAX_AMOUNT`].
pub fn validate_buying_cost(cost: Money) -> ValidationResult<()> {
    validate_amount("buying cost", cost)
}

/// Target selling price is optional, but when present it follows the
/// buying cost rules.
pub fn validate_target_price(price: Option<Money>) -> ValidationResult<()> {
    match price {
        Some(p) => validate_amount("target selling price", p),
        None => Ok(()),
    }
}

/// Validates the quantity for an "add N" action.
///
/// ## Rules
/// - At least 1
/// - At most [`MAX_BATCH_QUANTITY`]
pub fn validate_batch_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 || quantity > MAX_BATCH_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_BATCH_QUANTITY),
        });
    }
    Ok(())
}

/// Validates the quantity to sell from a group.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  laptrack sell 3 --quantity 5 --price 52000                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_sale_quantity(5, 4) ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── qty == 0?        → "quantity must be between 1 and 4"         │
/// │       ├── qty > available? → "quantity must be between 1 and 4"         │
/// │       └── OK → settle()                                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_sale_quantity(requested: u32, available: u32) -> ValidationResult<()> {
    if requested == 0 || requested > available {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(available),
        });
    }
    Ok(())
}

/// Final selling price per unit must be positive and at most [`MAX_AMOUNT`].
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    validate_amount("unit price", price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("brand", "Dell", MAX_TEXT_LEN).is_ok());
        assert!(validate_required_text("brand", "", MAX_TEXT_LEN).is_err());
        assert!(validate_required_text("brand", "   ", MAX_TEXT_LEN).is_err());
        assert!(validate_required_text("brand", &"A".repeat(101), MAX_TEXT_LEN).is_err());
    }

    #[test]
    fn test_validate_ram_gb() {
        assert!(validate_ram_gb(8).is_ok());
        assert!(validate_ram_gb(0).is_err());
        assert!(validate_ram_gb(MAX_RAM_GB + 1).is_err());
    }

    #[test]
    fn test_validate_prices() {
        assert!(validate_buying_cost(Money::from_cents(1)).is_ok());
        assert!(validate_buying_cost(Money::zero()).is_err());
        assert!(validate_buying_cost(Money::from_cents(-5)).is_err());

        assert!(validate_target_price(None).is_ok());
        assert!(validate_target_price(Some(Money::from_cents(100))).is_ok());
        assert!(validate_target_price(Some(Money::zero())).is_err());

        assert!(validate_unit_price(Money::from_cents(1)).is_ok());
        assert!(validate_unit_price(Money::zero()).is_err());
        assert!(validate_unit_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_amounts_capped_at_max() {
        let over = Money::from_cents(MAX_AMOUNT.cents() + 1);

        assert!(validate_buying_cost(MAX_AMOUNT).is_ok());
        assert!(matches!(
            validate_buying_cost(over),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(validate_target_price(Some(over)).is_err());
        assert!(validate_unit_price(MAX_AMOUNT).is_ok());

        let err = validate_unit_price(over).unwrap_err();
        assert_eq!(err.to_string(), "unit price must be at most 1000000000.00");
    }

    #[test]
    fn test_validate_batch_quantity() {
        assert!(validate_batch_quantity(1).is_ok());
        assert!(validate_batch_quantity(MAX_BATCH_QUANTITY).is_ok());
        assert!(validate_batch_quantity(0).is_err());
        assert!(validate_batch_quantity(MAX_BATCH_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_sale_quantity() {
        assert!(validate_sale_quantity(1, 1).is_ok());
        assert!(validate_sale_quantity(3, 3).is_ok());
        assert!(validate_sale_quantity(0, 3).is_err());
        assert!(validate_sale_quantity(4, 3).is_err());
        assert!(validate_sale_quantity(1, 0).is_err());

        let err = validate_sale_quantity(5, 4).unwrap_err();
        assert_eq!(err.to_string(), "quantity must be between 1 and 4");
    }
}
