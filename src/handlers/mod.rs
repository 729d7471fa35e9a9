//! API handlers for Vigente

pub mod attestation;
pub mod health;
pub mod score;

pub use attestation::create_attestation;
pub use health::{health_check, root};
pub use score::get_score;
