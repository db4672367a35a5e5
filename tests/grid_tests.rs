//! 그리드 관련 테스트
//!
//! 가격 레벨, 레벨별 수량, 실패 시 중단 확인

use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;
use xExec::core::{ExecutionEngine, RecordingPacer};
use xExec::exchange::MockExchange;
use xExec::utils::MemoryLogger;
use xExec::{ConstructionError, OrderSide, OrderType, SymbolFilters, TimeInForce, TradingError};

async fn setup(exchange: MockExchange) -> (Arc<MockExchange>, Arc<RecordingPacer>, ExecutionEngine) {
  let exchange = Arc::new(exchange);
  let pacer = Arc::new(RecordingPacer::new());
  let engine = ExecutionEngine::new(exchange.clone(), Arc::new(MemoryLogger::new()))
    .await
    .unwrap()
    .with_pacer(pacer.clone());
  (exchange, pacer, engine)
}

#[tokio::test]
async fn test_grid_levels_ascending() {
  let (exchange, pacer, engine) = setup(MockExchange::new()).await;

  let results = engine
    .execute_grid("BTCUSDT", OrderSide::Buy, dec!(10), dec!(100), dec!(200), 5)
    .await
    .unwrap();

  assert_eq!(results.len(), 5);
  let submitted = exchange.submitted().await;
  let prices: Vec<_> = submitted.iter().map(|r| r.price().unwrap()).collect();
  assert_eq!(prices, vec![dec!(100), dec!(125), dec!(150), dec!(175), dec!(200)]);
  for req in &submitted {
    assert_eq!(req.order_type(), OrderType::Limit);
    assert_eq!(req.quantity(), dec!(2));
    assert_eq!(req.time_in_force(), Some(TimeInForce::Gtc));
  }
  // 그리드는 대기 없이 연속 제출
  assert!(pacer.pauses().is_empty());
}

#[tokio::test]
async fn test_grid_single_level() {
  let (exchange, _, engine) = setup(MockExchange::new()).await;

  engine
    .execute_grid("BTCUSDT", OrderSide::Sell, dec!(10), dec!(100), dec!(200), 1)
    .await
    .unwrap();

  let submitted = exchange.submitted().await;
  assert_eq!(submitted.len(), 1);
  assert_eq!(submitted[0].price(), Some(dec!(100)));
  assert_eq!(submitted[0].quantity(), dec!(10));
}

#[tokio::test]
async fn test_grid_prices_follow_tick_size() {
  let filters = SymbolFilters::new(dec!(0.001), dec!(0.5));
  let (exchange, _, engine) = setup(MockExchange::new().with_symbol("ETHUSDT", filters)).await;

  engine
    .execute_grid("ETHUSDT", OrderSide::Buy, dec!(1), dec!(3000), dec!(3001), 4)
    .await
    .unwrap();

  // 3000, 3000.333.., 3000.666.., 3001 → tick 0.5 내림
  let prices: Vec<_> = exchange.submitted().await.iter().map(|r| r.price().unwrap()).collect();
  assert_eq!(prices, vec![dec!(3000), dec!(3000), dec!(3000.5), dec!(3001)]);
  assert!(exchange.submitted().await.iter().all(|r| r.quantity() == dec!(0.25)));
}

#[tokio::test]
async fn test_grid_aborts_on_failure() {
  let (exchange, _, engine) = setup(MockExchange::new().fail_on(2, 400, -2019, "Margin is insufficient.")).await;

  let err = engine
    .execute_grid("BTCUSDT", OrderSide::Buy, dec!(10), dec!(100), dec!(200), 5)
    .await
    .unwrap_err();

  assert_eq!(err.completed.len(), 1);
  assert_eq!(err.strategy, "Grid");
  assert!(err.error().is_exchange());
  assert_eq!(exchange.submitted().await.len(), 2);
}

#[tokio::test]
async fn test_grid_preconditions() {
  let (exchange, _, engine) = setup(MockExchange::new()).await;

  let err = engine
    .execute_grid("BTCUSDT", OrderSide::Buy, dec!(10), dec!(100), dec!(200), 0)
    .await
    .unwrap_err();
  assert!(matches!(err.error(), TradingError::Construction(ConstructionError::ZeroGridLevels)));

  let err = engine
    .execute_grid("BTCUSDT", OrderSide::Buy, dec!(10), dec!(200), dec!(100), 5)
    .await
    .unwrap_err();
  assert!(matches!(
    err.error(),
    TradingError::Construction(ConstructionError::InvertedPriceBounds { .. })
  ));

  assert!(exchange.submitted().await.is_empty());
}

#[tokio::test]
async fn test_grid_huge_level_count_fails_on_first_level() {
  let filters = SymbolFilters::new(dec!(0.001), dec!(0.1));
  let (exchange, _, engine) = setup(MockExchange::new().with_symbol("BTCUSDT", filters)).await;

  let err = engine
    .execute_grid("BTCUSDT", OrderSide::Buy, dec!(10), dec!(100), dec!(200), usize::MAX)
    .await
    .unwrap_err();

  assert_eq!(err.planned, usize::MAX);
  assert!(err.completed.is_empty());
  assert!(matches!(
    err.error(),
    TradingError::Construction(ConstructionError::NonPositiveQuantity(_))
  ));
  assert!(exchange.submitted().await.is_empty());
}

#[tokio::test]
async fn test_grid_cancelled_token_stops_before_submission() {
  let (exchange, _, engine) = setup(MockExchange::new()).await;
  let token = CancellationToken::new();
  token.cancel();

  let err = engine
    .execute_grid_with_cancel("BTCUSDT", OrderSide::Buy, dec!(10), dec!(100), dec!(200), 5, &token)
    .await
    .unwrap_err();

  assert!(matches!(err.error(), TradingError::Cancelled));
  assert!(exchange.submitted().await.is_empty());
}
