//! 선물 주문 실행 라이브러리
//!
//! 거래소 정밀도 규칙에 맞춘 주문 생성과 단일 주문, TWAP, 그리드 실행을 지원합니다.

pub mod config;
pub mod core;
pub mod error;
pub mod exchange;
pub mod models;
pub mod order_core;
pub mod utils;

// 핵심 타입 재노출
pub use crate::core::{ExecutionEngine, GridPlan, TwapPlan};
pub use crate::error::{ConstructionError, StrategyError, TradingError};
pub use crate::exchange::traits::ExchangeClient;
pub use crate::models::order::{OrderId, OrderRequest, OrderResponse, OrderSide, OrderStatus, OrderType, TimeInForce};
pub use crate::models::symbol_rules::{PrecisionKind, SymbolFilters, SymbolRules};
pub use crate::order_core::{normalize, OrderRequestBuilder};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, TradingError>;
