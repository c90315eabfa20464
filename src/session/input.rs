use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Num;
use crate::crypto_error::CryptoError;

// ============================================================================
// Protection DoS parsing : un champ de plusieurs Mo coûterait O(n²) à
// convertir. Largement suffisant pour des nombres saisis à la main.
// ============================================================================
pub const MAX_DECIMAL_FIELD_LEN: usize = 64;

/// Convertit une saisie décimale signée en BigInt.
///
/// Refuse : champ vide, trop long, fractionnaire ("1.5"), exposant ("1e3"),
/// séparateurs ("1_000") ou tout caractère non numérique.
pub fn parse_integer(field: &'static str, raw: &str) -> Result<BigInt, CryptoError> {
    let trimmed = raw.trim();
    let invalid = || CryptoError::InvalidNumericInput { field, value: raw.to_string() };

    if trimmed.len() > MAX_DECIMAL_FIELD_LEN {
        return Err(invalid());
    }

    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    BigInt::from_str_radix(trimmed, 10).map_err(|_| invalid())
}

/// Comme parse_integer, mais la valeur doit être >= 0 (OutOfRange sinon).
pub fn parse_natural(field: &'static str, raw: &str) -> Result<BigUint, CryptoError> {
    let value = parse_integer(field, raw)?;
    match value.into_parts() {
        (Sign::Minus, _) => Err(CryptoError::OutOfRange {
            field,
            reason: "must not be negative".to_string(),
        }),
        (_, magnitude) => Ok(magnitude),
    }
}

/// Valeur strictement inférieure à max, ou OutOfRange.
pub fn verify_ceiling(
    field: &'static str,
    value: BigUint,
    max: &BigUint,
) -> Result<BigUint, CryptoError> {
    if &value < max {
        Ok(value)
    } else {
        Err(CryptoError::OutOfRange { field, reason: format!("must be less than {max}") })
    }
}
