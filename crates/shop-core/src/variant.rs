//! Variant Grouping
//!
//! A variant is a unique (design, size, color) combination. Duplicate cart
//! entries for the same variant are merged before anything is sent to
//! Stripe, so each line item carries the summed quantity.

use crate::cart::{PricedCart, ValidatedCartItem};

/// One Stripe line item's worth of cart content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantLine {
    pub design: String,
    pub size: String,
    pub color: String,
    /// `"{design}-{size}-{color}"`, components trimmed.
    pub variant: String,
    pub quantity: u32,
    /// Server-side price per unit, in dollars.
    pub unit_price: u64,
}

impl VariantLine {
    /// Display name used for the Stripe product.
    pub fn product_name(&self) -> String {
        format!("{} T-Shirt ({}, {})", self.design, self.color, self.size)
    }
}

/// Build the variant key for an item, trimming each component.
pub fn variant_key(design: &str, size: &str, color: &str) -> String {
    format!("{}-{}-{}", design.trim(), size.trim(), color.trim())
}

/// Merge validated items into unique variants, summing quantities.
/// First-seen order is preserved.
pub fn group_variants(items: &[ValidatedCartItem]) -> Vec<VariantLine> {
    let mut lines: Vec<VariantLine> = Vec::new();

    for item in items {
        let key = variant_key(&item.design, &item.size, &item.color);
        if let Some(existing) = lines.iter_mut().find(|line| line.variant == key) {
            existing.quantity += item.quantity;
        } else {
            lines.push(VariantLine {
                design: item.design.trim().to_string(),
                size: item.size.trim().to_string(),
                color: item.color.trim().to_string(),
                variant: key,
                quantity: item.quantity,
                unit_price: item.server_price,
            });
        }
    }

    lines
}

/// `"key(xN), key2(xM)"` summary attached to Stripe metadata.
pub fn cart_summary(lines: &[VariantLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}(x{})", line.variant, line.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Total units across all variants.
pub fn total_items(lines: &[VariantLine]) -> u32 {
    lines.iter().map(|line| line.quantity).sum()
}

/// Order classification recorded in Stripe metadata.
pub fn order_type(lines: &[VariantLine]) -> &'static str {
    if lines.len() == 1 {
        "single_variant"
    } else {
        "mixed_cart"
    }
}

/// Metadata shared by checkout sessions and payment intents.
pub fn order_metadata(lines: &[VariantLine], cart: &PricedCart) -> Vec<(String, String)> {
    vec![
        ("totalItems".into(), total_items(lines).to_string()),
        ("uniqueVariants".into(), lines.len().to_string()),
        ("cartSummary".into(), cart_summary(lines)),
        ("orderType".into(), order_type(lines).into()),
        ("subtotal".into(), cart.subtotal.to_string()),
        ("shipping".into(), cart.shipping.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{price_cart, CartItem};
    use crate::catalog::Catalog;

    fn validated(design: &str, size: &str, color: &str, quantity: u32) -> ValidatedCartItem {
        ValidatedCartItem {
            design: design.into(),
            size: size.into(),
            color: color.into(),
            quantity,
            server_price: 30,
            item_total: 30 * u64::from(quantity),
        }
    }

    #[test]
    fn test_duplicate_variants_merge_quantities() {
        let lines = group_variants(&[
            validated("Drinks", "M", "Black", 2),
            validated("Drinks", "M", "Black", 3),
        ]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].variant, "Drinks-M-Black");
    }

    #[test]
    fn test_distinct_variants_stay_separate() {
        let lines = group_variants(&[
            validated("Drinks", "M", "Black", 1),
            validated("Drinks", "L", "Black", 1),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].variant, "Drinks-M-Black");
        assert_eq!(lines[1].variant, "Drinks-L-Black");
    }

    #[test]
    fn test_variant_key_trims_components() {
        assert_eq!(variant_key(" Drinks ", "M ", " Black"), "Drinks-M-Black");
        let lines = group_variants(&[
            validated("Drinks", "M", "Black", 1),
            validated(" Drinks ", "M", "Black ", 1),
        ]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn test_summary_and_order_type() {
        let single = group_variants(&[validated("Drinks", "M", "Black", 2)]);
        assert_eq!(cart_summary(&single), "Drinks-M-Black(x2)");
        assert_eq!(order_type(&single), "single_variant");
        assert_eq!(total_items(&single), 2);

        let mixed = group_variants(&[
            validated("Drinks", "M", "Black", 2),
            validated("Gender", "S", "Gray", 1),
        ]);
        assert_eq!(
            cart_summary(&mixed),
            "Drinks-M-Black(x2), Gender-S-Gray(x1)"
        );
        assert_eq!(order_type(&mixed), "mixed_cart");
        assert_eq!(total_items(&mixed), 3);
    }

    #[test]
    fn test_order_metadata_fields() {
        let catalog = Catalog::default();
        let cart = price_cart(
            &catalog,
            &[CartItem {
                design: "Drinks".into(),
                size: "M".into(),
                color: "Black".into(),
                quantity: 2,
                price: None,
            }],
        )
        .unwrap();
        let lines = group_variants(&cart.items);
        let metadata = order_metadata(&lines, &cart);

        let get = |key: &str| {
            metadata
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("totalItems"), Some("2"));
        assert_eq!(get("uniqueVariants"), Some("1"));
        assert_eq!(get("orderType"), Some("single_variant"));
        assert_eq!(get("subtotal"), Some("60"));
        assert_eq!(get("shipping"), Some("5"));
    }
}
