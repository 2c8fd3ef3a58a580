//! # shop-payments
//!
//! Stripe integration for the t-shirt storefront. Two flows are supported,
//! mirroring the two checkout surfaces the frontend offers:
//!
//! ### 1. Stripe Checkout (Hosted)
//!
//! **Flow:** cart page → redirect to Stripe's hosted page → return page
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │  Cart Page  │────▶│  Stripe Hosted  │────▶│   Return    │
//! │             │     │  Checkout Page  │     │    Page     │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//! ```
//!
//! The server builds one line item per unique variant at the catalog price
//! and returns the session id; the return page asks the server for the
//! session status.
//!
//! ### 2. Payment Intents (Embedded)
//!
//! **Flow:** payment form on the checkout page, confirmed with Stripe.js
//!
//! The server re-prices the cart, creates a Payment Intent for the total
//! (shipping included) and returns the client secret. A confirm endpoint
//! reports whether the intent reached `succeeded`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shop_payments::{CheckoutSessionRequest, StripeClient};
//!
//! let client = StripeClient::from_env()?;
//!
//! let session = client.create_checkout_session(CheckoutSessionRequest {
//!     lines,
//!     metadata,
//!     success_url: "https://shop.example/success?sid={CHECKOUT_SESSION_ID}".into(),
//!     cancel_url: "https://shop.example/cart".into(),
//! }).await?;
//!
//! // Hand session.id to the client for redirect
//! ```

mod checkout;
mod error;
mod intent;

pub use checkout::{
    dollars_to_cents, CheckoutSessionHandle, CheckoutSessionRequest, SessionStatus, StripeClient,
};
pub use error::{PaymentError, Result};
pub use intent::{ConfirmedIntent, PaymentIntentHandle, PaymentIntentRequest};
