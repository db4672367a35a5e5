//! 공용 유틸리티

pub mod logging;

pub use logging::{EventLogger, FacadeLogger, LogEvent, MemoryLogger};
