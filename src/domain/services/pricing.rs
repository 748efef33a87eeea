use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub original_cents: i64,
    pub discount_percent: i32,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Largest amount a quote or a promo validation will price.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

pub fn validate_amount(amount_cents: i64) -> Result<i64, String> {
    if amount_cents < 0 {
        return Err("amount_cents must not be negative".into());
    }
    if amount_cents > MAX_AMOUNT_CENTS {
        return Err(format!("amount_cents must not exceed {}", MAX_AMOUNT_CENTS));
    }
    Ok(amount_cents)
}

/// Percent is clamped to 0..=100, the discount is rounded half-up to whole cents.
pub fn apply_percent_discount(amount_cents: i64, percent: i32) -> PriceBreakdown {
    let amount = amount_cents.max(0);
    let pct = percent.clamp(0, 100);
    // The discount never exceeds the amount, so narrowing back is lossless.
    let discount = ((amount as i128 * pct as i128 + 50) / 100) as i64;

    PriceBreakdown {
        original_cents: amount,
        discount_percent: pct,
        discount_cents: discount,
        total_cents: amount - discount,
    }
}

pub fn no_discount(amount_cents: i64) -> PriceBreakdown {
    apply_percent_discount(amount_cents, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_percentages() {
        let p = apply_percent_discount(20_000, 25);
        assert_eq!(p.discount_cents, 5_000);
        assert_eq!(p.total_cents, 15_000);
    }

    #[test]
    fn test_rounds_half_up() {
        // 999 * 15% = 149.85
        assert_eq!(apply_percent_discount(999, 15).discount_cents, 150);
        // 10 * 5% = 0.5
        assert_eq!(apply_percent_discount(10, 5).discount_cents, 1);
        // 10 * 4% = 0.4
        assert_eq!(apply_percent_discount(10, 4).discount_cents, 0);
    }

    #[test]
    fn test_clamps_inputs() {
        let p = apply_percent_discount(5_000, 150);
        assert_eq!(p.discount_percent, 100);
        assert_eq!(p.total_cents, 0);

        let p = apply_percent_discount(-100, 10);
        assert_eq!(p.original_cents, 0);
        assert_eq!(p.total_cents, 0);

        assert_eq!(no_discount(4_200).total_cents, 4_200);
    }

    #[test]
    fn test_extreme_amounts_do_not_overflow() {
        let p = apply_percent_discount(i64::MAX, 50);
        assert_eq!(p.discount_cents, i64::MAX / 2 + 1);
        assert_eq!(p.total_cents, i64::MAX / 2);

        let p = apply_percent_discount(i64::MAX, 100);
        assert_eq!(p.total_cents, 0);
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert_eq!(validate_amount(0), Ok(0));
        assert_eq!(validate_amount(MAX_AMOUNT_CENTS), Ok(MAX_AMOUNT_CENTS));
        assert!(validate_amount(-1).is_err());
        assert!(validate_amount(MAX_AMOUNT_CENTS + 1).is_err());
        assert!(validate_amount(i64::MAX).is_err());
    }
}
