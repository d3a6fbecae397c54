// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Validadores customizados para campos Decimal (o `range` do validator não cobre Decimal)

// Tetos de quantidade e preço: o produto dos dois cabe com folga num Decimal
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

fn range_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

/// Preço: zero ou positivo, até `MAX_PRICE`.
pub fn price_in_range(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(range_error("negative_value"));
    }
    if *value > MAX_PRICE {
        return Err(range_error("max_price"));
    }
    Ok(())
}

/// Quantidade: de 1 até `MAX_QUANTITY`.
pub fn quantity_in_range(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ONE {
        return Err(range_error("min_one"));
    }
    if *value > MAX_QUANTITY {
        return Err(range_error("max_quantity"));
    }
    Ok(())
}

/// Limite em módulo, para o editor de linhas (que aceita negativos).
pub fn magnitude_within(value: &Decimal, max: Decimal, message: &'static str) -> Result<(), ValidationError> {
    if value.abs() > max {
        return Err(range_error(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_and_quantity_have_a_ceiling() {
        assert!(price_in_range(&MAX_PRICE).is_ok());
        assert!(price_in_range(&(MAX_PRICE + Decimal::ONE)).is_err());
        assert!(price_in_range(&Decimal::NEGATIVE_ONE).is_err());

        assert!(quantity_in_range(&MAX_QUANTITY).is_ok());
        assert!(quantity_in_range(&(MAX_QUANTITY + Decimal::ONE)).is_err());
        assert!(quantity_in_range(&Decimal::ZERO).is_err());
    }

    #[test]
    fn magnitude_accepts_negatives_inside_the_limit() {
        assert!(magnitude_within(&-MAX_QUANTITY, MAX_QUANTITY, "max_quantity").is_ok());
        let err = magnitude_within(&(-MAX_QUANTITY - Decimal::ONE), MAX_QUANTITY, "max_quantity").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("max_quantity"));
    }
}
