pub mod event;
pub mod market;
pub mod record;

pub use event::{Event, EventRef, MarketRef};
pub use market::{Market, Outcome, TokenId};
pub use record::{CanonicalKey, Entity, ResolvedRecord};
