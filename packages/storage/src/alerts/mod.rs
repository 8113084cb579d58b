pub mod storage;
pub mod types;

pub use storage::AlertStorage;
pub use types::{Alert, AlertCreateInput, AlertSeverity, AlertStatus, AlertType, AlertUpdateInput, TargetGroup};
