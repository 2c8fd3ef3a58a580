//! Cart Validation and Pricing
//!
//! Re-derives the authoritative price of every cart item from the catalog.
//! A client-submitted price is deserialized for shape-checking but never
//! used in any total.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// A cart item as submitted by the client.
///
/// `price` is whatever the client claims the item costs. It is carried so
/// handlers can reject malformed payloads, but pricing always comes from
/// the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub design: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
    #[serde(default)]
    pub price: Option<i64>,
}

/// A cart item that passed validation, with its server-side price attached.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidatedCartItem {
    pub design: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    /// Catalog price for this item's size, in dollars.
    pub server_price: u64,
    /// `server_price * quantity`, in dollars.
    pub item_total: u64,
}

/// Outcome of validating a single cart item.
#[derive(Clone, Debug)]
pub struct ItemValidation {
    pub errors: Vec<String>,
    /// Catalog price for the item's size, when the size is valid.
    pub price: Option<u64>,
}

impl ItemValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A fully validated, server-priced cart.
#[derive(Clone, Debug, Serialize)]
pub struct PricedCart {
    pub subtotal: u64,
    pub shipping: u64,
    pub total: u64,
    pub items: Vec<ValidatedCartItem>,
}

impl PricedCart {
    /// Total in cents, as charged through Stripe.
    pub const fn total_cents(&self) -> i64 {
        (self.total * 100) as i64
    }
}

/// Validate one cart item against the catalog.
///
/// Collects every field error for the item. The returned price is the
/// catalog price for the size, present whenever the size itself is valid.
pub fn validate_item(catalog: &Catalog, item: &CartItem) -> ItemValidation {
    let mut errors = Vec::new();

    let price = catalog.price_for_size(&item.size);
    if price.is_none() {
        errors.push(format!(
            "Invalid size: {}. Valid sizes: {}",
            item.size,
            catalog.size_names().join(", ")
        ));
    }

    if !catalog.is_valid_design(&item.design) {
        errors.push(format!(
            "Invalid design: {}. Valid designs: {}",
            item.design,
            catalog.design_names().join(", ")
        ));
    }

    if !catalog.is_valid_color(&item.color) {
        errors.push(format!(
            "Invalid color: {}. Valid colors: {}",
            item.color,
            catalog.color_names().join(", ")
        ));
    }

    let limits = catalog.limits();
    if item.quantity < i64::from(limits.min_quantity)
        || item.quantity > i64::from(limits.max_quantity)
    {
        errors.push(format!(
            "Invalid quantity: {}. Must be between {} and {}",
            item.quantity, limits.min_quantity, limits.max_quantity
        ));
    }

    ItemValidation { errors, price }
}

/// Validate and price a whole cart.
///
/// Returns the errors of the first invalid item. For a valid cart the total
/// is `sum(server_price * quantity) + shipping`, in dollars.
pub fn price_cart(catalog: &Catalog, items: &[CartItem]) -> Result<PricedCart, Vec<String>> {
    let mut subtotal = 0u64;
    let mut validated = Vec::with_capacity(items.len());

    for item in items {
        let validation = validate_item(catalog, item);
        if !validation.is_valid() {
            return Err(validation.errors);
        }

        // Quantity range was just checked, so the cast is lossless.
        let quantity = u32::try_from(item.quantity).unwrap_or_default();
        let server_price = validation.price.unwrap_or_default();
        let item_total = server_price * u64::from(quantity);
        subtotal += item_total;

        validated.push(ValidatedCartItem {
            design: item.design.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            quantity,
            server_price,
            item_total,
        });
    }

    let shipping = catalog.shipping();
    Ok(PricedCart {
        subtotal,
        shipping,
        total: subtotal + shipping,
        items: validated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(design: &str, size: &str, color: &str, quantity: i64) -> CartItem {
        CartItem {
            design: design.into(),
            size: size.into(),
            color: color.into(),
            quantity,
            price: None,
        }
    }

    #[test]
    fn test_valid_item_gets_catalog_price() {
        let catalog = Catalog::default();
        let validation = validate_item(&catalog, &item("Drinks", "M", "Black", 2));
        assert!(validation.is_valid());
        assert_eq!(validation.price, Some(30));
    }

    #[test]
    fn test_invalid_size_rejected() {
        let catalog = Catalog::default();
        let validation = validate_item(&catalog, &item("Drinks", "XXL", "Black", 1));
        assert!(!validation.is_valid());
        assert!(validation.errors[0].starts_with("Invalid size: XXL"));
        assert_eq!(validation.price, None);
    }

    #[test]
    fn test_invalid_design_and_color_collected_together() {
        let catalog = Catalog::default();
        let validation = validate_item(&catalog, &item("Unicorns", "M", "Neon", 1));
        assert_eq!(validation.errors.len(), 2);
        assert!(validation.errors[0].starts_with("Invalid design: Unicorns"));
        assert!(validation.errors[1].starts_with("Invalid color: Neon"));
    }

    #[test]
    fn test_quantity_bounds() {
        let catalog = Catalog::default();
        for quantity in [0, -1, 11] {
            let validation = validate_item(&catalog, &item("Drinks", "M", "Black", quantity));
            assert!(!validation.is_valid(), "quantity {quantity} should fail");
        }
        for quantity in [1, 10] {
            let validation = validate_item(&catalog, &item("Drinks", "M", "Black", quantity));
            assert!(validation.is_valid(), "quantity {quantity} should pass");
        }
    }

    #[test]
    fn test_client_price_is_ignored() {
        let catalog = Catalog::default();
        let mut cheap = item("Drinks", "XL", "Gray", 1);
        cheap.price = Some(1);

        let cart = price_cart(&catalog, &[cheap]).unwrap();
        assert_eq!(cart.items[0].server_price, 32);
        assert_eq!(cart.subtotal, 32);
    }

    #[test]
    fn test_price_cart_example_from_storefront() {
        let catalog = Catalog::default();
        let cart = price_cart(&catalog, &[item("Drinks", "M", "Black", 2)]).unwrap();
        assert_eq!(cart.subtotal, 60);
        assert_eq!(cart.shipping, 5);
        assert_eq!(cart.total, 65);
        assert_eq!(cart.total_cents(), 6500);
    }

    #[test]
    fn test_price_cart_mixed_sizes() {
        let catalog = Catalog::default();
        let cart = price_cart(
            &catalog,
            &[
                item("Drinks", "M", "Black", 2),
                item("Gender", "2XL", "Purple", 1),
            ],
        )
        .unwrap();
        // 2*30 + 1*32 + 5 shipping
        assert_eq!(cart.total, 97);
        assert_eq!(cart.items[1].item_total, 32);
    }

    #[test]
    fn test_cart_item_json_shape() {
        let item: CartItem = serde_json::from_str(
            r#"{"design":"Drinks","size":"M","color":"Black","quantity":2,"price":30}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Some(30));

        // price is optional on the wire
        let item: CartItem =
            serde_json::from_str(r#"{"design":"Drinks","size":"M","color":"Black","quantity":2}"#)
                .unwrap();
        assert_eq!(item.price, None);
    }

    #[test]
    fn test_price_cart_short_circuits_on_first_invalid_item() {
        let catalog = Catalog::default();
        let errors = price_cart(
            &catalog,
            &[
                item("Drinks", "XXL", "Black", 1),
                item("Unicorns", "M", "Black", 1),
            ],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Invalid size"));
    }
}
