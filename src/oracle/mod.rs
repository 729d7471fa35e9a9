//! Remittance oracle domain module
//!
//! I'm housing the transaction history models and providers here.

mod model;
mod service;

pub use model::*;
pub use service::*;
