pub mod storage;
pub mod types;

pub use storage::ReportStorage;
pub use types::{
    PollutionType, Report, ReportAssignInput, ReportComment, ReportCreateInput, ReportSeverity,
    ReportStatus, ReportStatusInput,
};
