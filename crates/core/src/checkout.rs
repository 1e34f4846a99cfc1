//! Checkout form validation and order request building.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;
use crate::order::{OrderItemRequest, OrderRequest};
use crate::types::{AddressId, PaymentMethod};

/// Card fields collected when paying by card.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvc: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &"[REDACTED]")
            .field("card_name", &self.card_name)
            .field("expiry", &"[REDACTED]")
            .field("cvc", &"[REDACTED]")
            .finish()
    }
}

/// Checkout form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub delivery_address_id: Option<AddressId>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub card: CardDetails,
    #[serde(default)]
    pub delivery_instructions: Option<String>,
}

/// Why a checkout was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please select a delivery address")]
    MissingAddress,

    #[error("Please enter your card number")]
    MissingCardNumber,

    #[error("Please enter the name on your card")]
    MissingCardName,

    #[error("Please enter your card's expiry date")]
    MissingExpiry,

    #[error("Please enter your card's security code")]
    MissingCvc,
}

impl CheckoutForm {
    /// Check the form, reporting the first problem found.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` for a missing address or, when paying by card,
    /// a blank card field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self
            .delivery_address_id
            .as_ref()
            .is_none_or(|id| id.as_str().trim().is_empty())
        {
            return Err(CheckoutError::MissingAddress);
        }

        if self.payment_method.requires_card() {
            let card = &self.card;
            let checks = [
                (&card.card_number, CheckoutError::MissingCardNumber),
                (&card.card_name, CheckoutError::MissingCardName),
                (&card.expiry, CheckoutError::MissingExpiry),
                (&card.cvc, CheckoutError::MissingCvc),
            ];
            if let Some((_, err)) = checks.into_iter().find(|(v, _)| v.trim().is_empty()) {
                return Err(err);
            }
        }

        Ok(())
    }

    /// Validate the form and build the order submission for `items`.
    ///
    /// The order is placed with the restaurant of the first cart item.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart, otherwise any
    /// error from [`CheckoutForm::validate`].
    pub fn build_request(&self, items: &[CartItem]) -> Result<OrderRequest, CheckoutError> {
        let first = items.first().ok_or(CheckoutError::EmptyCart)?;
        self.validate()?;

        let delivery_address_id = self
            .delivery_address_id
            .clone()
            .ok_or(CheckoutError::MissingAddress)?;

        Ok(OrderRequest {
            restaurant_id: first.restaurant_id.clone(),
            delivery_address_id,
            items: convert_cart_to_order_items(items),
            payment_method: self.payment_method,
            delivery_instructions: self
                .delivery_instructions
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Map cart lines to order submission lines.
#[must_use]
pub fn convert_cart_to_order_items(items: &[CartItem]) -> Vec<OrderItemRequest> {
    items.iter().map(OrderItemRequest::from).collect()
}
