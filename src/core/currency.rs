use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round an amount for display, half away from zero.
///
/// This is the only place amounts lose precision. Settlement itself runs
/// on unrounded values.
pub fn round_for_display(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// How amounts are presented to people: a currency symbol and a number of
/// decimal places.
///
/// A pool has exactly one currency, so this carries no conversion logic.
///
/// # Examples
///
/// ```
/// use pool_settlement::core::currency::DisplayCurrency;
/// use rust_decimal_macros::dec;
///
/// let inr = DisplayCurrency::default();
/// assert_eq!(inr.format(dec!(1234.5)), "₹1234.50");
///
/// let usd = DisplayCurrency::new("$", 2);
/// assert_eq!(usd.format(dec!(-3.14159)), "-$3.14");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCurrency {
    pub symbol: String,
    pub scale: u32,
}

impl DisplayCurrency {
    pub fn new(symbol: impl Into<String>, scale: u32) -> Self {
        Self {
            symbol: symbol.into(),
            scale,
        }
    }

    /// Round to this currency's scale.
    pub fn round(&self, amount: Decimal) -> Decimal {
        round_for_display(amount, self.scale)
    }

    /// Format with symbol and fixed decimal places. The sign goes before the symbol.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = self.round(amount);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        format!(
            "{}{}{:.*}",
            sign,
            self.symbol,
            self.scale as usize,
            rounded.abs()
        )
    }

    /// Wrap an amount so it can be used directly in `format!`/`write!`.
    pub fn display(&self, amount: Decimal) -> Money<'_> {
        Money {
            currency: self,
            amount,
        }
    }
}

impl Default for DisplayCurrency {
    fn default() -> Self {
        Self::new("₹", 2)
    }
}

/// An amount paired with the currency used to show it.
#[derive(Debug, Clone, Copy)]
pub struct Money<'a> {
    currency: &'a DisplayCurrency,
    amount: Decimal,
}

impl fmt::Display for Money<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.currency.format(self.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_for_display() {
        assert_eq!(round_for_display(dec!(33.335), 2), dec!(33.34));
        assert_eq!(round_for_display(dec!(-33.335), 2), dec!(-33.34));
        assert_eq!(round_for_display(dec!(33.3333333), 2), dec!(33.33));
    }

    #[test]
    fn test_format_pads_decimals() {
        let cur = DisplayCurrency::default();
        assert_eq!(cur.format(dec!(100)), "₹100.00");
        assert_eq!(cur.format(Decimal::ZERO), "₹0.00");
    }

    #[test]
    fn test_negative_rounding_to_zero_has_no_sign() {
        let cur = DisplayCurrency::default();
        assert_eq!(cur.format(dec!(-0.001)), "₹0.00");
    }

    #[test]
    fn test_custom_scale() {
        let cur = DisplayCurrency::new("¥", 0);
        assert_eq!(cur.format(dec!(1500.6)), "¥1501");
        assert_eq!(format!("{}", cur.display(dec!(2))), "¥2");
    }
}
