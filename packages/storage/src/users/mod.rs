// ABOUTME: User accounts and API token authentication
// ABOUTME: Tokens are handed out once; only their SHA-256 hash is stored

pub mod storage;
pub mod types;

pub use storage::UserStorage;
pub use types::{
    ProfileUpdateInput, RegisterInput, User, UserCreateInput, UserRole, UserStatus, UserWithToken,
};
