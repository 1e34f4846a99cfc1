//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are always `rust_decimal::Decimal` in the currency's standard unit
//! (rupees, dollars). Display formatting is fixed at two fractional digits
//! with comma thousands grouping regardless of the amount's scale.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "₹1,113.00", "$29.98").
    #[must_use]
    pub fn display(&self) -> String {
        let formatted = format_amount(self.amount.abs());
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            format!("-{}{formatted}", self.currency_code.symbol())
        } else {
            format!("{}{formatted}", self.currency_code.symbol())
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Currency symbol used as a display prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

/// Delivery and service fees applied on top of an item subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
}

impl Fees {
    /// Flat delivery fee charged on every new order.
    pub const DELIVERY_FEE: Decimal = Decimal::from_parts(299, 0, 0, false, 2);
    /// Flat service fee charged on every new order.
    pub const SERVICE_FEE: Decimal = Decimal::from_parts(199, 0, 0, false, 2);

    /// The fee schedule used for carts and orders that are not yet placed.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            delivery_fee: Self::DELIVERY_FEE,
            service_fee: Self::SERVICE_FEE,
        }
    }

    /// Sum of both fees.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.delivery_fee + self.service_fee
    }
}

impl Default for Fees {
    fn default() -> Self {
        Self::standard()
    }
}

/// Format a non-negative amount with two fractional digits and comma grouping.
///
/// Rounds half away from zero before formatting.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{rounded:.2}");
    let (sign, digits) = plain
        .strip_prefix('-')
        .map_or(("", plain.as_str()), |rest| ("-", rest));
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{fraction}")
}
