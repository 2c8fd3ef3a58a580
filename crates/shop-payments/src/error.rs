//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Stripe returned an object missing an expected field
    #[error("Incomplete Stripe response: {0}")]
    IncompleteResponse(String),

    /// Malformed session or payment-intent identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Client-safe message. Stripe internals never reach the caller.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Stripe(_) | Self::IncompleteResponse(_) => {
                "Payment processing failed. Please try again."
            }
            Self::InvalidId(_) => "Invalid payment identifier.",
            Self::Config(_) => "Service configuration error.",
        }
    }
}
