//! Stripe Checkout Integration
//!
//! Implements the hosted-checkout flow: one line item per unique cart
//! variant, priced with the server-side catalog amount.

use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionId, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};

use shop_core::VariantLine;

use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeClient {
    pub(crate) client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(&secret_key))
    }

    /// Create a Stripe Checkout session for a validated, variant-grouped cart.
    ///
    /// Returns the session id for client-side redirect, plus the hosted
    /// checkout URL when Stripe provides one.
    pub async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSessionHandle> {
        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.metadata = Some(request.metadata.iter().cloned().collect());

        params.line_items = Some(
            request
                .lines
                .iter()
                .map(|line| CreateCheckoutSessionLineItems {
                    quantity: Some(u64::from(line.quantity)),
                    price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                        currency: Currency::USD,
                        unit_amount: Some(dollars_to_cents(line.unit_price)),
                        product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                            name: line.product_name(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
        );

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::info!(
            session_id = %session.id,
            line_count = request.lines.len(),
            "Created checkout session"
        );

        Ok(CheckoutSessionHandle {
            id: session.id.to_string(),
            checkout_url: session.url,
        })
    }

    /// Look up a session's status for the post-payment return page.
    pub async fn retrieve_checkout_session(&self, session_id: &str) -> Result<SessionStatus> {
        let id = session_id
            .parse::<CheckoutSessionId>()
            .map_err(|e| PaymentError::InvalidId(e.to_string()))?;

        let session = StripeCheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let customer_email = session
            .customer_details
            .and_then(|details| details.email)
            .or(session.customer_email);

        Ok(SessionStatus {
            status: session
                .status
                .map_or_else(|| "unknown".to_string(), |s| s.to_string()),
            customer_email,
        })
    }
}

/// Convert a whole-dollar catalog price into Stripe cents.
pub const fn dollars_to_cents(dollars: u64) -> i64 {
    (dollars * 100) as i64
}

/// Everything needed to build a checkout session.
#[derive(Clone, Debug)]
pub struct CheckoutSessionRequest {
    /// Unique variants, quantities already merged.
    pub lines: Vec<VariantLine>,

    /// Order metadata (totals, cart summary, order type).
    pub metadata: Vec<(String, String)>,

    /// URL to redirect after successful payment
    pub success_url: String,

    /// URL to redirect if checkout is cancelled
    pub cancel_url: String,
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSessionHandle {
    /// Stripe session ID
    pub id: String,

    /// Hosted checkout URL, when returned by Stripe
    pub checkout_url: Option<String>,
}

/// Session state reported to the return page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionStatus {
    pub status: String,
    pub customer_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollars_to_cents() {
        assert_eq!(dollars_to_cents(30), 3000);
        assert_eq!(dollars_to_cents(0), 0);
        assert_eq!(dollars_to_cents(65), 6500);
    }

    #[test]
    fn test_product_name_reads_naturally() {
        let line = VariantLine {
            design: "Drinks".into(),
            size: "M".into(),
            color: "Black".into(),
            variant: "Drinks-M-Black".into(),
            quantity: 2,
            unit_price: 30,
        };
        assert_eq!(line.product_name(), "Drinks T-Shirt (Black, M)");
    }
}
