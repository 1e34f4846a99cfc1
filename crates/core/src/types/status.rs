//! Order status, delivery progress and payment method enums.
//!
//! Status moves strictly forward:
//!
//! ```text
//! RECEIVED -> PREPARING -> READY -> OUT_FOR_DELIVERY -> DELIVERED
//!     \__________\___________\____________\______________> CANCELLED
//! ```
//!
//! DELIVERED and CANCELLED are terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Received,
    Preparing,
    #[serde(alias = "READY_FOR_PICKUP")]
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The forward delivery path, in order.
    pub const FORWARD: [Self; 5] = [
        Self::Received,
        Self::Preparing,
        Self::Ready,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Progress percentage for this status.
    ///
    /// `None` for `Cancelled`, whose progress is whatever it was when the
    /// order was cancelled.
    #[must_use]
    pub const fn progress(self) -> Option<u8> {
        match self {
            Self::Received => Some(0),
            Self::Preparing => Some(25),
            Self::Ready => Some(50),
            Self::OutForDelivery => Some(75),
            Self::Delivered => Some(100),
            Self::Cancelled => None,
        }
    }

    /// Estimated minutes until delivery.
    #[must_use]
    pub const fn eta_minutes(self) -> u32 {
        match self {
            Self::Received => 35,
            Self::Preparing => 30,
            Self::Ready => 20,
            Self::OutForDelivery => 10,
            Self::Delivered | Self::Cancelled => 0,
        }
    }

    /// Tracking label shown next to the progress bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Received => "Order received",
            Self::Preparing => "Preparing your food",
            Self::Ready => "Food is ready",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Short badge name used in order lists.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Received => "Order Received",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready for Pickup",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the order is still in flight.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// The next status on the forward path, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether `target` is a legal single-step transition from `self`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == Self::Cancelled || self.next() == Some(target)
    }

    const fn as_wire(self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVED" => Ok(Self::Received),
            "PREPARING" => Ok(Self::Preparing),
            "READY" | "READY_FOR_PICKUP" => Ok(Self::Ready),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Rejected status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The order already reached a terminal status.
    #[error("order is already {0} and cannot change status")]
    Terminal(OrderStatus),
    /// The target is not the next step on the forward path.
    #[error("cannot move order from {from} to {to}")]
    NotForward { from: OrderStatus, to: OrderStatus },
}

/// Tracking snapshot: a status plus the progress bar value it displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProgress {
    pub status: OrderStatus,
    pub progress: u8,
}

impl OrderProgress {
    /// Start tracking at `status`.
    ///
    /// A cancelled order observed without history shows zero progress.
    #[must_use]
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            progress: status.progress().unwrap_or(0),
        }
    }

    /// Estimated minutes until delivery.
    #[must_use]
    pub const fn eta_minutes(&self) -> u32 {
        self.status.eta_minutes()
    }

    /// Tracking label for the current status.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.status.label()
    }

    /// Move to `target`, enforcing the forward-only rule.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if the current status is terminal or
    /// `target` is not the immediate successor or `Cancelled`.
    pub fn advance_to(&mut self, target: OrderStatus) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Terminal(self.status));
        }
        if !self.status.can_transition_to(target) {
            return Err(TransitionError::NotForward {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        if let Some(progress) = target.progress() {
            self.progress = progress;
        }
        Ok(())
    }

    /// Step to the next status on the forward path.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::Terminal` if there is no next status.
    pub fn advance(&mut self) -> Result<OrderStatus, TransitionError> {
        let next = self.status.next().ok_or(TransitionError::Terminal(self.status))?;
        self.advance_to(next)?;
        Ok(next)
    }

    /// Cancel the order, freezing the progress value.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::Terminal` if already delivered or cancelled.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.advance_to(OrderStatus::Cancelled)
    }
}

/// How the customer pays at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    Cash,
}

impl PaymentMethod {
    /// Whether card details must be collected.
    #[must_use]
    pub const fn requires_card(self) -> bool {
        matches!(self, Self::CreditCard)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "CREDIT_CARD"),
            Self::Paypal => write!(f, "PAYPAL"),
            Self::Cash => write!(f, "CASH"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREDIT_CARD" | "CARD" => Ok(Self::CreditCard),
            "PAYPAL" => Ok(Self::Paypal),
            "CASH" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_table() {
        let expected = [(0, 35), (25, 30), (50, 20), (75, 10), (100, 0)];
        for (status, (progress, eta)) in OrderStatus::FORWARD.iter().zip(expected) {
            assert_eq!(status.progress(), Some(progress));
            assert_eq!(status.eta_minutes(), eta);
        }
        assert_eq!(OrderStatus::Cancelled.progress(), None);
    }

    #[test]
    fn test_forward_only_transitions() {
        for (i, from) in OrderStatus::FORWARD.iter().enumerate() {
            for (j, to) in OrderStatus::FORWARD.iter().enumerate() {
                assert_eq!(
                    from.can_transition_to(*to),
                    j == i + 1,
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_cancel_from_non_terminal_only() {
        for status in OrderStatus::FORWARD {
            assert_eq!(
                status.can_transition_to(OrderStatus::Cancelled),
                !status.is_terminal()
            );
        }
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_advance_walks_to_delivered() {
        let mut progress = OrderProgress::new(OrderStatus::Received);
        while progress.advance().is_ok() {}
        assert_eq!(progress.status, OrderStatus::Delivered);
        assert_eq!(progress.progress, 100);
        assert_eq!(progress.eta_minutes(), 0);
    }

    #[test]
    fn test_advance_to_rejects_skip_and_backward() {
        let mut progress = OrderProgress::new(OrderStatus::Preparing);
        assert_eq!(
            progress.advance_to(OrderStatus::OutForDelivery),
            Err(TransitionError::NotForward {
                from: OrderStatus::Preparing,
                to: OrderStatus::OutForDelivery,
            })
        );
        assert!(progress.advance_to(OrderStatus::Received).is_err());
        assert_eq!(progress.status, OrderStatus::Preparing);
    }

    #[test]
    fn test_cancel_freezes_progress() {
        let mut progress = OrderProgress::new(OrderStatus::Ready);
        progress.cancel().unwrap();
        assert_eq!(progress.status, OrderStatus::Cancelled);
        assert_eq!(progress.progress, 50);
        assert_eq!(
            progress.advance(),
            Err(TransitionError::Terminal(OrderStatus::Cancelled))
        );
    }

    #[test]
    fn test_delivered_is_final() {
        let mut progress = OrderProgress::new(OrderStatus::Delivered);
        assert!(progress.cancel().is_err());
        assert_eq!(progress.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_ready_for_pickup_alias() {
        let status: OrderStatus = serde_json::from_str("\"READY_FOR_PICKUP\"").unwrap();
        assert_eq!(status, OrderStatus::Ready);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"READY\"");
        assert_eq!("READY_FOR_PICKUP".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
    }

    #[test]
    fn test_status_display_round_trip() {
        for status in OrderStatus::FORWARD {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_payment_method() {
        assert!(PaymentMethod::CreditCard.requires_card());
        assert!(!PaymentMethod::Cash.requires_card());
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
    }
}
