pub mod cache;
pub mod classifier;
pub mod normalizer;
pub mod query;
pub mod resolver;
pub mod source;

pub use cache::{CacheEntry, ResultCache, CACHE_TTL};
pub use classifier::{classify, ClassificationError, Identifier, IdentifierKind};
pub use normalizer::{normalize, NormalizationError, Normalized};
pub use query::{build_query, QueryKind, QuerySpec, ResourceKind};
pub use resolver::{ResolutionError, Resolver};
pub use source::{FetchError, Fetched, MarketDataSource};
