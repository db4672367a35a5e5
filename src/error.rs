/**
* filename : error
* author : HAMA
* date: 2026. 10. 19.
* description: 주문 생성 오류와 거래소 오류를 구분하는 오류 타입
**/

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::order::OrderResponse;

/// 네트워크 호출 전에 발생하는 주문/전략 구성 오류
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("Price must be provided for LIMIT and STOP_LIMIT orders")]
    MissingPrice,

    #[error("Stop price must be provided for STOP_LIMIT orders")]
    MissingStopPrice,

    #[error("Unsupported order type: {0}")]
    UnsupportedKind(String),

    #[error("Unsupported order side: {0}")]
    UnsupportedSide(String),

    #[error("Quantity must be positive after precision adjustment, got {0}")]
    NonPositiveQuantity(Decimal),

    #[error("Price must be positive after precision adjustment, got {0}")]
    NonPositivePrice(Decimal),

    #[error("TWAP interval count must be at least 1")]
    ZeroIntervals,

    #[error("Grid level count must be at least 1")]
    ZeroGridLevels,

    #[error("Grid lower price {lower} is above upper price {upper}")]
    InvertedPriceBounds { lower: Decimal, upper: Decimal },
}

#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Invalid order: {0}")]
    Construction(#[from] ConstructionError),

    #[error("Exchange error {status_code} (code {code}): {message}")]
    Exchange {
        status_code: u16,
        code: i64,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Execution cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl TradingError {
    pub fn is_construction(&self) -> bool {
        matches!(self, TradingError::Construction(_))
    }

    pub fn is_exchange(&self) -> bool {
        matches!(self, TradingError::Exchange { .. })
    }
}

impl From<reqwest::Error> for TradingError {
    fn from(err: reqwest::Error) -> Self {
        TradingError::Transport(err.to_string())
    }
}

/// 전략 실행 중단 오류. 중단 전까지 체결된 응답을 함께 보관한다.
#[derive(Error, Debug)]
#[error("{strategy} aborted after {} of {planned} orders: {source}", .completed.len())]
pub struct StrategyError {
    pub strategy: &'static str,
    pub planned: usize,
    pub completed: Vec<OrderResponse>,
    #[source]
    pub source: TradingError,
}

impl StrategyError {
    /// 제출 전에 거부된 전략
    pub fn rejected(strategy: &'static str, planned: usize, source: impl Into<TradingError>) -> Self {
        StrategyError {
            strategy,
            planned,
            completed: Vec::new(),
            source: source.into(),
        }
    }

    pub fn error(&self) -> &TradingError {
        &self.source
    }

    pub fn into_parts(self) -> (Vec<OrderResponse>, TradingError) {
        (self.completed, self.source)
    }
}
