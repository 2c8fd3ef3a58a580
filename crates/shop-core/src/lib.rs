//! # shop-core
//!
//! Catalog, cart validation and pricing for the t-shirt storefront.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Checkout Request                         │
//! │  ┌─────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │   Catalog   │──│  Validator/  │──│  Variant Grouping  │  │
//! │  │  (pricing)  │  │   Pricer     │  │  (line items)      │  │
//! │  └─────────────┘  └──────────────┘  └────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is the only source of pricing truth: client-submitted prices
//! are never used in a total. Everything here is pure and synchronous; the
//! Stripe boundary lives in `shop-payments`.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod variant;

pub use address::{is_valid_email, ShippingAddress};
pub use cart::{price_cart, validate_item, CartItem, ItemValidation, PricedCart, ValidatedCartItem};
pub use catalog::{Catalog, Limits};
pub use variant::{
    cart_summary, group_variants, order_metadata, order_type, total_items, variant_key,
    VariantLine,
};
