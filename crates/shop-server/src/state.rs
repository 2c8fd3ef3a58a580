//! Application State

use std::sync::Arc;

use shop_core::Catalog;
use shop_payments::StripeClient;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog, the source of pricing truth
    pub catalog: Arc<Catalog>,

    /// Stripe client
    pub stripe: Arc<StripeClient>,

    /// Runtime configuration
    pub config: Arc<Config>,
}
