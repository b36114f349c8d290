pub use crate::builder::{Cache, CacheBuilder, EvictionPolicy};
pub use crate::ds::{BucketChain, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::lfu::{DEFAULT_EVICTION_FACTOR, LfuCache};
pub use crate::policy::lru::LruCache;
pub use crate::stats::CacheStats;
pub use crate::traits::ConcurrentCache;
