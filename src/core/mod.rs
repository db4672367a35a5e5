//! 주문 실행 엔진과 분할 전략 계획

pub mod engine;
pub mod grid_splitter;
pub mod pacing;
pub mod twap_splitter;

pub use engine::ExecutionEngine;
pub use grid_splitter::GridPlan;
pub use pacing::{Pacer, RecordingPacer, TokioPacer};
pub use twap_splitter::TwapPlan;
