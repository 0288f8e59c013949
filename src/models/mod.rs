//! Data models for the arquinorma-web application.
//!
//! All records are owned by external services and only read here:
//! - [`SessionUser`] / [`Role`] - the signed-in visitor
//! - [`BetaRegistration`] - a confirmed beta user
//! - [`PricingTier`] - a plan on the pricing page
//! - [`UploadStats`] - backend report after a document upload

pub mod beta;
pub mod pricing;
pub mod upload;
pub mod user;

pub use beta::{BetaRegisterResponse, BetaRegistration, BetaSignup, ConfirmedUsersResponse};
pub use pricing::PricingTier;
pub use upload::UploadStats;
pub use user::{Role, SessionUser};
