//! Stripe Payment Intent Integration
//!
//! Implements the on-page checkout flow: the server creates a Payment
//! Intent for the repriced cart total and hands the client secret back for
//! confirmation with Stripe.js.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stripe::{
    CreatePaymentIntent, CreatePaymentIntentAutomaticPaymentMethods, Currency, PaymentIntent,
    PaymentIntentId, PaymentIntentStatus,
};

use crate::checkout::StripeClient;
use crate::error::{PaymentError, Result};

impl StripeClient {
    /// Create a Payment Intent for a server-priced cart total.
    ///
    /// `amount_cents` must already include shipping. Automatic payment
    /// methods are enabled so Stripe picks what to offer.
    pub async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntentHandle> {
        let mut params = CreatePaymentIntent::new(request.amount_cents, Currency::USD);
        params.automatic_payment_methods = Some(CreatePaymentIntentAutomaticPaymentMethods {
            allow_redirects: None,
            enabled: true,
        });
        params.metadata = Some(request.metadata.iter().cloned().collect());

        let intent = PaymentIntent::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::info!(
            intent_id = %intent.id,
            amount = intent.amount,
            "Created payment intent"
        );

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::IncompleteResponse("payment intent has no client secret".into())
        })?;

        Ok(PaymentIntentHandle {
            id: intent.id.to_string(),
            client_secret,
            amount: intent.amount,
        })
    }

    /// Retrieve a Payment Intent to confirm whether payment succeeded.
    pub async fn retrieve_payment_intent(&self, intent_id: &str) -> Result<ConfirmedIntent> {
        let id = intent_id
            .parse::<PaymentIntentId>()
            .map_err(|e| PaymentError::InvalidId(e.to_string()))?;

        let intent = PaymentIntent::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        Ok(ConfirmedIntent {
            id: intent.id.to_string(),
            amount: intent.amount,
            succeeded: matches!(intent.status, PaymentIntentStatus::Succeeded),
            status: intent.status.to_string(),
            metadata: intent.metadata,
        })
    }
}

/// Everything needed to create a Payment Intent.
#[derive(Clone, Debug)]
pub struct PaymentIntentRequest {
    /// Total charge in cents, shipping included.
    pub amount_cents: i64,

    /// Order metadata, plus flattened shipping address fields when present.
    pub metadata: Vec<(String, String)>,
}

/// Result of creating a Payment Intent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentIntentHandle {
    /// Stripe Payment Intent ID
    pub id: String,

    /// Secret the client uses to confirm the payment
    pub client_secret: String,

    /// Amount in cents, as echoed by Stripe
    pub amount: i64,
}

/// A retrieved Payment Intent, reduced to what the confirm endpoint reports.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfirmedIntent {
    pub id: String,
    pub amount: i64,
    pub status: String,
    pub succeeded: bool,
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_request_metadata_collects_to_map() {
        let request = PaymentIntentRequest {
            amount_cents: 6500,
            metadata: vec![
                ("totalItems".into(), "2".into()),
                ("shipping_country".into(), "US".into()),
            ],
        };
        let map: HashMap<String, String> = request.metadata.iter().cloned().collect();
        assert_eq!(map.get("totalItems").map(String::as_str), Some("2"));
        assert_eq!(map.len(), 2);
    }
}
