pub mod storage;
pub mod types;

pub use storage::{AqiStorage, MAX_TREND_DAYS, MAX_WINDOW_HOURS};
pub use types::{AqiReading, AqiSource, CityAqi, DailyTrend, HistoryInterval, ReadingCreateInput, WardAqiWindow};
