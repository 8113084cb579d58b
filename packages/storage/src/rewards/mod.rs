pub mod storage;
pub mod types;

pub use storage::RewardStorage;
pub use types::{
    RedemptionStatus, RedemptionUpdateInput, Reward, RewardCategory, RewardCreateInput, RewardRef,
    UserReward,
};
