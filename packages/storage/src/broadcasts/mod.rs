pub mod storage;
pub mod types;

pub use storage::BroadcastStorage;
pub use types::{
    Audience, Broadcast, BroadcastCreateInput, BroadcastPriority, BroadcastStatus, BroadcastType,
    BroadcastUpdateInput,
};
