//! Payment intents.
//!
//! The provider is reached through [`PaymentGateway`]; the API only ever
//! needs the client secret of a freshly created intent.

pub mod stripe;

use async_trait::async_trait;
use thiserror::Error;

pub use stripe::StripeGateway;

/// Payment errors.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment provider is not configured")]
    NotConfigured,

    #[error("Payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeIntent {
    pub id: String,
    pub client_secret: String,
}

/// Creates card payment intents.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `amount_minor` units of `currency`, card only.
    async fn create_charge_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ChargeIntent, PaymentError>;
}

/// Gateway used when no provider key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn create_charge_intent(
        &self,
        _amount_minor: i64,
        _currency: &str,
    ) -> Result<ChargeIntent, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}

/// Convert a major-unit price to minor units, truncating toward zero.
pub fn to_minor_units(price: f64) -> Result<i64, PaymentError> {
    if !price.is_finite() || price < 0.0 {
        return Err(PaymentError::InvalidAmount(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    let cents = (price * 100.0).trunc();
    if cents > i64::MAX as f64 {
        return Err(PaymentError::InvalidAmount(format!("price {price} is too large")));
    }
    Ok(cents as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_truncate() {
        assert_eq!(to_minor_units(19.99).unwrap(), 1998);
        assert_eq!(to_minor_units(10.0).unwrap(), 1000);
        assert_eq!(to_minor_units(0.015).unwrap(), 1);
        assert_eq!(to_minor_units(0.0).unwrap(), 0);
    }

    #[test]
    fn invalid_prices_are_rejected() {
        for price in [-1.0, f64::NAN, f64::INFINITY, 1e300] {
            assert!(matches!(
                to_minor_units(price),
                Err(PaymentError::InvalidAmount(_))
            ));
        }
    }

    #[tokio::test]
    async fn unconfigured_gateway_refuses() {
        let err = UnconfiguredGateway
            .create_charge_intent(100, "usd")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NotConfigured));
    }
}
