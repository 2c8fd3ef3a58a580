//! HTTP Handlers
//!
//! Every checkout path runs the same gauntlet: shape-check the payload,
//! re-price it against the catalog, then talk to Stripe. Stripe failures
//! are logged with the request's correlation id and surfaced to the client
//! as generic 400s.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use shop_core::{
    group_variants, order_metadata, price_cart, CartItem, ShippingAddress,
};
use shop_payments::{CheckoutSessionRequest, PaymentIntentRequest};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutPayload {
    #[serde(rename = "cartItems")]
    pub cart_items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub status: String,
    pub customer_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntentPayload {
    #[serde(rename = "cartItems")]
    pub cart_items: Vec<CartItem>,
    #[serde(rename = "shippingAddress", default)]
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct ConfirmedPayment {
    pub id: String,
    pub amount: i64,
    pub status: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub success: bool,
    #[serde(rename = "paymentIntent", skip_serializing_if = "Option::is_none")]
    pub payment_intent: Option<ConfirmedPayment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn correlation_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-correlation-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
}

// ============================================================================
// Cart Shape Validation
// ============================================================================

/// Field-presence checks run before catalog validation. `require_price`
/// matches the on-page checkout contract, where the client echoes a price
/// it was shown; the echoed value is still never used in a total.
fn check_cart_shape(
    items: &[CartItem],
    max_cart_items: usize,
    require_price: bool,
) -> Result<(), String> {
    if items.is_empty() {
        return Err("Cart items are required".into());
    }

    if items.len() > max_cart_items {
        return Err(format!("Too many items in cart (max {max_cart_items})"));
    }

    for item in items {
        if item.size.trim().is_empty() {
            return Err("Size is required for all items".into());
        }
        if item.color.trim().is_empty() {
            return Err("Color is required for all items".into());
        }
        if item.design.trim().is_empty() {
            return Err("Design is required for all items".into());
        }
        if item.quantity < 1 || item.quantity > 10 {
            return Err("Invalid quantity for item (must be 1-10)".into());
        }
        if require_price && !item.price.is_some_and(|price| price >= 1) {
            return Err("Invalid price for item".into());
        }
    }

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: true,
    })
}

/// Create a hosted Checkout Session for the submitted cart.
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckoutPayload>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let items = payload.cart_items;

    check_cart_shape(&items, state.catalog.limits().max_cart_items, false)
        .map_err(bad_request)?;

    let cart = price_cart(state.catalog.as_ref(), &items).map_err(|errors| bad_request(errors.join("; ")))?;
    let lines = group_variants(&cart.items);
    let metadata = order_metadata(&lines, &cart);

    let request = CheckoutSessionRequest {
        lines,
        metadata,
        success_url: state.config.success_url(),
        cancel_url: state.config.cancel_url(),
    };

    let session = state
        .stripe
        .create_checkout_session(request)
        .await
        .map_err(|e| {
            tracing::error!(
                correlation_id = %correlation_id(&headers),
                error = %e,
                item_count = items.len(),
                "Checkout session creation failed"
            );
            bad_request("Stripe session failed")
        })?;

    Ok(Json(CheckoutResponse {
        session_id: session.id,
    }))
}

/// Report a Checkout Session's status to the return page.
pub async fn checkout_session_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let session = state
        .stripe
        .retrieve_checkout_session(&query.session_id)
        .await
        .map_err(|e| {
            tracing::error!(
                correlation_id = %correlation_id(&headers),
                error = %e,
                "Checkout session retrieval failed"
            );
            bad_request("Failed to retrieve session details")
        })?;

    Ok(Json(SessionStatusResponse {
        status: session.status,
        customer_email: session.customer_email,
    }))
}

/// Create a Payment Intent for on-page checkout.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PaymentIntentPayload>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let items = payload.cart_items;

    check_cart_shape(&items, state.catalog.limits().max_cart_items, true)
        .map_err(bad_request)?;

    if let Some(ref address) = payload.shipping_address {
        address.validate().map_err(bad_request)?;
    }

    let cart = price_cart(state.catalog.as_ref(), &items).map_err(|errors| bad_request(errors.join("; ")))?;
    let lines = group_variants(&cart.items);

    let mut metadata = order_metadata(&lines, &cart);
    if let Some(ref address) = payload.shipping_address {
        metadata.extend(address.metadata_fields());
    }

    let intent = state
        .stripe
        .create_payment_intent(PaymentIntentRequest {
            amount_cents: cart.total_cents(),
            metadata,
        })
        .await
        .map_err(|e| {
            tracing::error!(
                correlation_id = %correlation_id(&headers),
                error = %e,
                item_count = items.len(),
                "Payment Intent creation failed"
            );
            bad_request("Payment Intent creation failed")
        })?;

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
        amount: intent.amount,
    }))
}

/// Confirm payment success and report intent details.
pub async fn confirm_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(payment_intent_id): Path<String>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    if payment_intent_id.trim().is_empty() {
        return Err(bad_request("Payment Intent ID is required"));
    }

    let intent = state
        .stripe
        .retrieve_payment_intent(&payment_intent_id)
        .await
        .map_err(|e| {
            // Truncate: a mistyped id should not flood the logs.
            let id_prefix: String = payment_intent_id.chars().take(20).collect();
            tracing::error!(
                correlation_id = %correlation_id(&headers),
                error = %e,
                payment_intent_id = %id_prefix,
                "Payment Intent retrieval failed"
            );
            bad_request("Failed to retrieve payment details")
        })?;

    if intent.succeeded {
        Ok(Json(ConfirmResponse {
            success: true,
            payment_intent: Some(ConfirmedPayment {
                id: intent.id,
                amount: intent.amount,
                status: intent.status,
                metadata: intent.metadata,
            }),
            status: None,
        }))
    } else {
        Ok(Json(ConfirmResponse {
            success: false,
            payment_intent: None,
            status: Some(intent.status),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(design: &str, size: &str, color: &str, quantity: i64, price: Option<i64>) -> CartItem {
        CartItem {
            design: design.into(),
            size: size.into(),
            color: color.into(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert_eq!(
            check_cart_shape(&[], 10, false).unwrap_err(),
            "Cart items are required"
        );
    }

    #[test]
    fn test_oversized_cart_rejected() {
        let items: Vec<CartItem> = (0..11)
            .map(|_| item("Drinks", "M", "Black", 1, None))
            .collect();
        assert_eq!(
            check_cart_shape(&items, 10, false).unwrap_err(),
            "Too many items in cart (max 10)"
        );
    }

    #[test]
    fn test_blank_fields_rejected() {
        let items = [item("Drinks", "  ", "Black", 1, None)];
        assert_eq!(
            check_cart_shape(&items, 10, false).unwrap_err(),
            "Size is required for all items"
        );

        let items = [item("", "M", "Black", 1, None)];
        assert_eq!(
            check_cart_shape(&items, 10, false).unwrap_err(),
            "Design is required for all items"
        );
    }

    #[test]
    fn test_quantity_out_of_range_rejected() {
        for quantity in [0, 11, -3] {
            let items = [item("Drinks", "M", "Black", quantity, None)];
            assert_eq!(
                check_cart_shape(&items, 10, false).unwrap_err(),
                "Invalid quantity for item (must be 1-10)"
            );
        }
    }

    #[test]
    fn test_price_required_only_for_payment_intents() {
        let items = [item("Drinks", "M", "Black", 1, None)];
        assert!(check_cart_shape(&items, 10, false).is_ok());
        assert_eq!(
            check_cart_shape(&items, 10, true).unwrap_err(),
            "Invalid price for item"
        );

        let items = [item("Drinks", "M", "Black", 1, Some(0))];
        assert_eq!(
            check_cart_shape(&items, 10, true).unwrap_err(),
            "Invalid price for item"
        );

        let items = [item("Drinks", "M", "Black", 1, Some(30))];
        assert!(check_cart_shape(&items, 10, true).is_ok());
    }

    #[test]
    fn test_confirm_response_shape() {
        let success = ConfirmResponse {
            success: true,
            payment_intent: Some(ConfirmedPayment {
                id: "pi_123".into(),
                amount: 6500,
                status: "succeeded".into(),
                metadata: HashMap::new(),
            }),
            status: None,
        };
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["paymentIntent"]["amount"], 6500);
        assert!(json.get("status").is_none());

        let pending = ConfirmResponse {
            success: false,
            payment_intent: None,
            status: Some("processing".into()),
        };
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["status"], "processing");
        assert!(json.get("paymentIntent").is_none());
    }
}
