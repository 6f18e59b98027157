pub mod cache;
pub mod health;
pub mod lookup;
pub mod metrics;
