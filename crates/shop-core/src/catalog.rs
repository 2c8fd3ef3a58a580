//! Product Catalog
//!
//! Canonical source of truth for pricing and available options. Prices are
//! whole dollars; conversion to cents happens at the payment boundary.

/// Quantity and cart-size limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub max_cart_items: usize,
}

/// Product catalog: size-based pricing plus the enumerated design and
/// color options a cart item may reference.
#[derive(Clone, Debug)]
pub struct Catalog {
    // Ordered: error messages list sizes in display order.
    sizes: Vec<(&'static str, u64)>,
    designs: Vec<&'static str>,
    colors: Vec<&'static str>,
    shipping: u64,
    limits: Limits,
}

impl Catalog {
    /// Look up the server-side price for a size, in dollars.
    pub fn price_for_size(&self, size: &str) -> Option<u64> {
        self.sizes
            .iter()
            .find(|(name, _)| *name == size)
            .map(|(_, price)| *price)
    }

    pub fn is_valid_design(&self, design: &str) -> bool {
        self.designs.iter().any(|name| *name == design)
    }

    pub fn is_valid_color(&self, color: &str) -> bool {
        self.colors.iter().any(|name| *name == color)
    }

    /// Fixed shipping cost in dollars.
    pub const fn shipping(&self) -> u64 {
        self.shipping
    }

    pub const fn limits(&self) -> Limits {
        self.limits
    }

    /// Valid size names in display order, for error messages.
    pub fn size_names(&self) -> Vec<&'static str> {
        self.sizes.iter().map(|(name, _)| *name).collect()
    }

    pub fn design_names(&self) -> &[&'static str] {
        &self.designs
    }

    pub fn color_names(&self) -> &[&'static str] {
        &self.colors
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            sizes: vec![("S", 30), ("M", 30), ("L", 30), ("XL", 32), ("2XL", 32)],
            designs: vec![
                "Cats and Dogs",
                "Drinks",
                "Elephant Donkey",
                "Gender",
                "Religion",
            ],
            colors: vec!["Black", "Gray", "Purple"],
            shipping: 5,
            limits: Limits {
                min_quantity: 1,
                max_quantity: 10,
                max_cart_items: 10,
            },
        }
    }
}
