pub mod storage;
pub mod types;

pub use storage::TaskStorage;
pub use types::{ActionDetails, Task, TaskCreateInput, TaskPriority, TaskStatus, TaskUpdateInput};
