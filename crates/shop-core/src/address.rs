//! Shipping Address Validation
//!
//! Optional on payment-intent requests. When present, every field except
//! `line2` must be a non-empty string and the email must be structurally
//! valid: no whitespace, exactly one `@`, non-empty local part, and a
//! domain with an interior dot.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub email: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Check required fields and email shape. Returns the first failure,
    /// with the field name humanized ("postal_code" reads "postal code").
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("Shipping {} is required", field.replace('_', " ")));
            }
        }

        if !is_valid_email(self.email.trim()) {
            return Err("Invalid email address format".to_string());
        }

        Ok(())
    }

    /// Flattened `shipping_*` fields for Stripe metadata.
    pub fn metadata_fields(&self) -> Vec<(String, String)> {
        vec![
            ("shipping_name".into(), self.name.clone()),
            ("shipping_email".into(), self.email.clone()),
            ("shipping_line1".into(), self.line1.clone()),
            (
                "shipping_line2".into(),
                self.line2.clone().unwrap_or_default(),
            ),
            ("shipping_city".into(), self.city.clone()),
            ("shipping_state".into(), self.state.clone()),
            ("shipping_postal_code".into(), self.postal_code.clone()),
            ("shipping_country".into(), self.country.clone()),
        ]
    }
}

/// Structural email check: `local@domain` where neither part is empty,
/// nothing contains whitespace, and the domain has a dot with characters
/// on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}
