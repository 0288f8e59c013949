//! Pricing tier model.

use serde::Serialize;

/// A subscription tier shown on the pricing page.
#[derive(Debug, Clone, Serialize)]
pub struct PricingTier {
    pub id: &'static str,
    pub name: &'static str,
    /// Monthly price in euro cents; zero for the free tier
    pub monthly_price_cents: u32,
    pub features: Vec<&'static str>,
    /// Stripe price id, set for paid tiers when payments are configured
    pub stripe_price_id: Option<String>,
    /// Rendered as the recommended plan
    pub highlighted: bool,
}

impl PricingTier {
    pub fn is_free(&self) -> bool {
        self.monthly_price_cents == 0
    }

    pub fn price_label(&self) -> String {
        if self.is_free() {
            return "Free".to_string();
        }
        let euros = self.monthly_price_cents / 100;
        let cents = self.monthly_price_cents % 100;
        if cents == 0 {
            format!("€{}/month", euros)
        } else {
            format!("€{}.{:02}/month", euros, cents)
        }
    }
}
