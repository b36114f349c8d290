pub mod bucket_chain;
pub mod slot_arena;

pub use bucket_chain::BucketChain;
pub use slot_arena::{SlotArena, SlotId};
