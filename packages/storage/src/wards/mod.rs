pub mod storage;
pub mod types;

pub use storage::WardStorage;
pub use types::{NearbyWard, Ward, WardCreateInput, WardMapEntry, WardUpdateInput};
