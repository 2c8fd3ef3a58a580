//! Server Configuration
//!
//! All configuration comes from environment variables. The two required
//! ones gate startup: without them the process exits before binding.

/// Runtime configuration loaded at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Stripe secret key (`STRIPE_SECRET_KEY`, required)
    pub stripe_secret_key: String,

    /// Frontend origin for CORS and redirect URLs (`FRONTEND_URL`, required)
    pub frontend_url: String,

    /// Listen port (`PORT`, default 8080)
    pub port: u16,

    /// Production switches CORS from localhost to the frontend origin
    /// (`APP_ENV=production`)
    pub production: bool,
}

impl Config {
    /// Load configuration, reporting every missing required variable at once.
    pub fn from_env() -> anyhow::Result<Self> {
        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY").ok();
        let frontend_url = std::env::var("FRONTEND_URL").ok();

        let missing: Vec<&str> = [
            ("STRIPE_SECRET_KEY", stripe_secret_key.is_none()),
            ("FRONTEND_URL", frontend_url.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}. \
                 Copy .env.example to .env and fill in the values",
                missing.join(", ")
            );
        }

        let port = std::env::var("PORT")
            .ok()
            .map(|raw| raw.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid PORT: {e}"))?
            .unwrap_or(8080);

        let production = std::env::var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            // Both verified present above.
            stripe_secret_key: stripe_secret_key.unwrap_or_default(),
            frontend_url: frontend_url.unwrap_or_default(),
            port,
            production,
        })
    }

    /// Success redirect for hosted checkout. Stripe substitutes the
    /// `{CHECKOUT_SESSION_ID}` placeholder itself.
    pub fn success_url(&self) -> String {
        format!("{}/success?sid={{CHECKOUT_SESSION_ID}}", self.frontend_url)
    }

    /// Cancel redirect for hosted checkout.
    pub fn cancel_url(&self) -> String {
        format!("{}/cart", self.frontend_url)
    }
}
