//! The pricing catalog shown on the pricing page.

use crate::config::Config;
use crate::models::PricingTier;

pub const FREE_TIER: &str = "free";
pub const PROFESSIONAL_TIER: &str = "professional";
pub const BUSINESS_TIER: &str = "business";

/// All tiers in display order. Paid tiers take their Stripe price ids from config.
pub fn catalog(config: &Config) -> Vec<PricingTier> {
    vec![
        PricingTier {
            id: FREE_TIER,
            name: "Beta",
            monthly_price_cents: 0,
            features: vec![
                "Early access to the regulation assistant",
                "Limited monthly questions",
                "Building code and urban planning documents",
                "Feedback channel with the team",
            ],
            stripe_price_id: None,
            highlighted: false,
        },
        PricingTier {
            id: PROFESSIONAL_TIER,
            name: "Professional",
            monthly_price_cents: 2900,
            features: vec![
                "Unlimited questions",
                "Full regulation library",
                "Cited answers with article references",
                "Project history",
                "Email support",
            ],
            stripe_price_id: config.stripe_price_professional.clone(),
            highlighted: true,
        },
        PricingTier {
            id: BUSINESS_TIER,
            name: "Business",
            monthly_price_cents: 7900,
            features: vec![
                "Everything in Professional",
                "Up to 10 team members",
                "Private document uploads",
                "Priority support",
            ],
            stripe_price_id: config.stripe_price_business.clone(),
            highlighted: false,
        },
    ]
}

pub fn find_tier(config: &Config, id: &str) -> Option<PricingTier> {
    catalog(config).into_iter().find(|tier| tier.id == id)
}
