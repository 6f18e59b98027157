pub mod gamma_client;
pub mod types;

pub use gamma_client::{GammaClient, GAMMA_API_BASE};
pub use types::{GammaEvent, GammaMarket};
