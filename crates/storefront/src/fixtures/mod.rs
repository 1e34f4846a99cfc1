//! Fixture data substituted when the backend is unreachable.
//!
//! Catalog prices are authored in US dollars and shown in rupees using a flat
//! conversion rate. Restaurant delivery fees and minimum orders are shown as
//! two fixed rupee tiers instead of converted amounts.

mod catalog;
pub mod images;
mod orders;

pub use catalog::{
    menu_items, menu_items_by_category, restaurant, restaurants, restaurants_by_cuisine,
    search_restaurants, special_offers,
};
pub use orders::{
    CAMPUS_CITY, CAMPUS_FEES, CAMPUS_LOCATION, CAMPUS_STATE, CAMPUS_ZIP, MOCK_TOKEN,
    generate_order_number, mock_addresses, mock_order, mock_orders, mock_profile, mock_sign_in,
    placed_order,
};

use rust_decimal::{Decimal, RoundingStrategy};

/// Rupees per US dollar used for fixture prices.
pub const USD_TO_INR: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Rupee delivery fee for restaurants that charge one.
pub const INR_DELIVERY_FEE: Decimal = Decimal::from_parts(49, 0, 0, false, 0);

/// Rupee minimum order for restaurants that set one.
pub const INR_MIN_ORDER: Decimal = Decimal::from_parts(199, 0, 0, false, 0);

/// Convert a dollar price to whole rupees, rounding half up.
#[must_use]
pub fn to_inr(usd: Decimal) -> Decimal {
    (usd * USD_TO_INR).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rupee delivery fee tier for a dollar delivery fee: free stays free.
#[must_use]
pub fn inr_delivery_fee(usd: Decimal) -> Decimal {
    if usd.is_zero() {
        Decimal::ZERO
    } else {
        INR_DELIVERY_FEE
    }
}

/// Rupee minimum order tier for a dollar minimum order.
#[must_use]
pub fn inr_min_order(usd: Decimal) -> Decimal {
    if usd.is_zero() {
        Decimal::ZERO
    } else {
        INR_MIN_ORDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_inr_rounds_to_whole_rupees() {
        assert_eq!(to_inr(Decimal::new(1299, 2)), Decimal::from(1039));
        assert_eq!(to_inr(Decimal::new(99, 2)), Decimal::from(79));
        // 0.05625 * 80 = 4.5
        assert_eq!(to_inr(Decimal::new(5625, 5)), Decimal::from(5));
    }

    #[test]
    fn test_fee_tiers() {
        assert_eq!(inr_delivery_fee(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(inr_delivery_fee(Decimal::new(299, 2)), INR_DELIVERY_FEE);
        assert_eq!(inr_min_order(Decimal::new(1000, 2)), INR_MIN_ORDER);
    }
}
