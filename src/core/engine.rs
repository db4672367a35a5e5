/**
* filename : engine
* author : HAMA
* date: 2026. 10. 19.
* description: 단일 주문, TWAP, 그리드 주문 실행 엔진
**/

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::core::grid_splitter::GridPlan;
use crate::core::pacing::{Pacer, TokioPacer};
use crate::core::twap_splitter::TwapPlan;
use crate::error::{StrategyError, TradingError};
use crate::exchange::traits::ExchangeClient;
use crate::models::order::{OrderRequest, OrderResponse, OrderSide, OrderType};
use crate::models::symbol_rules::SymbolRules;
use crate::order_core::OrderRequestBuilder;
use crate::utils::logging::EventLogger;

const TWAP: &str = "TWAP";
const GRID: &str = "Grid";

/// 주문 실행 엔진
///
/// 모든 주문은 순차 제출되며, 이전 주문의 응답(성공/실패)을 확인한 뒤에 다음 주문을 낸다.
/// 재시도는 하지 않는다.
pub struct ExecutionEngine {
  /// 거래소 클라이언트
  client: Arc<dyn ExchangeClient>,
  /// 정밀도 규칙을 가진 주문 생성기
  builder: OrderRequestBuilder,
  logger: Arc<dyn EventLogger>,
  /// TWAP 분할 간 대기 수단
  pacer: Arc<dyn Pacer>,
}

impl ExecutionEngine {
  /// 거래소에서 심볼 규칙을 한 번 받아 엔진 생성
  pub async fn new(client: Arc<dyn ExchangeClient>, logger: Arc<dyn EventLogger>) -> Result<Self, TradingError> {
    let filters = match client.fetch_symbol_rules().await {
      Ok(filters) => filters,
      Err(e) => {
        logger.error(format!("Failed to load symbol rules: {}", e));
        return Err(e);
      }
    };
    let rules = SymbolRules::new(filters);
    logger.info(format!("Initialized execution engine ({} symbol rules)", rules.len()));
    Ok(Self::with_rules(client, Arc::new(rules), logger))
  }

  /// 이미 로드된 규칙으로 엔진 생성 (여러 엔진이 규칙을 공유할 때)
  pub fn with_rules(client: Arc<dyn ExchangeClient>, rules: Arc<SymbolRules>, logger: Arc<dyn EventLogger>) -> Self {
    ExecutionEngine {
      client,
      builder: OrderRequestBuilder::new(rules),
      logger,
      pacer: Arc::new(TokioPacer),
    }
  }

  pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
    self.pacer = pacer;
    self
  }

  pub fn rules(&self) -> &SymbolRules {
    self.builder.rules()
  }

  /// 단일 주문 실행
  pub async fn place_order(
    &self,
    symbol: &str,
    side: OrderSide,
    order_type: OrderType,
    quantity: Decimal,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
  ) -> Result<OrderResponse, TradingError> {
    let request = match self.builder.build(symbol, side, order_type, quantity, price, stop_price) {
      Ok(request) => request,
      Err(e) => {
        self.logger.error(format!("Rejected {} order for {}: {}", order_type, symbol, e));
        return Err(e.into());
      }
    };
    self.submit(&request).await
  }

  async fn submit(&self, request: &OrderRequest) -> Result<OrderResponse, TradingError> {
    self.logger.info(format!("Placing order: {}", request));

    match self.client.create_order(request).await {
      Ok(response) => {
        self.logger.info(format!(
          "Order response: id={} status={:?} raw={}",
          response.order_id, response.status, response.raw
        ));
        Ok(response)
      }
      Err(e) => {
        let message = match &e {
          TradingError::Exchange { status_code, code, message } => {
            format!("API error: {} - {} (code {}) for {}", status_code, message, code, request.client_order_id())
          }
          other => format!("Unexpected error for {}: {}", request.client_order_id(), other),
        };
        self.logger.error(message);
        Err(e)
      }
    }
  }

  /// TWAP 실행: 총 수량을 균등 분할해 일정 간격으로 시장가 주문
  pub async fn execute_twap(
    &self,
    symbol: &str,
    side: OrderSide,
    total_quantity: Decimal,
    duration_seconds: u64,
    interval_count: usize,
  ) -> Result<Vec<OrderResponse>, StrategyError> {
    self.execute_twap_with_cancel(symbol, side, total_quantity, duration_seconds, interval_count, &CancellationToken::new())
      .await
  }

  /// 취소 토큰을 관찰하는 TWAP 실행. 취소되면 그때까지의 응답과 함께 중단한다.
  pub async fn execute_twap_with_cancel(
    &self,
    symbol: &str,
    side: OrderSide,
    total_quantity: Decimal,
    duration_seconds: u64,
    interval_count: usize,
    cancel: &CancellationToken,
  ) -> Result<Vec<OrderResponse>, StrategyError> {
    let plan = TwapPlan::new(symbol, side, total_quantity, duration_seconds, interval_count)
      .map_err(|e| self.reject(TWAP, interval_count, e.into()))?;
    self.run_twap(&plan, cancel).await
  }

  pub async fn run_twap(&self, plan: &TwapPlan, cancel: &CancellationToken) -> Result<Vec<OrderResponse>, StrategyError> {
    let count = plan.interval_count;
    let slice_quantity = plan.slice_quantity();
    let delay = plan.delay();
    self.logger.info(format!(
      "Starting TWAP on {}: {} slices, {} qty each, every {:?}",
      plan.symbol, count, slice_quantity, delay
    ));

    let mut results = Vec::new();
    for i in 0..count {
      if cancel.is_cancelled() {
        return Err(self.abort(TWAP, count, results, TradingError::Cancelled));
      }

      match self.place_order(&plan.symbol, plan.side, OrderType::Market, slice_quantity, None, None).await {
        Ok(response) => results.push(response),
        Err(e) => return Err(self.abort(TWAP, count, results, e)),
      }

      if i + 1 < count {
        tokio::select! {
          biased;
          _ = cancel.cancelled() => {
            return Err(self.abort(TWAP, count, results, TradingError::Cancelled));
          }
          _ = self.pacer.pause(delay) => {}
        }
      }
    }

    self.logger.info(format!("TWAP on {} completed: {} orders", plan.symbol, results.len()));
    Ok(results)
  }

  /// 그리드 실행: 가격 구간을 균등 분할해 레벨마다 지정가 주문 (대기 없음)
  pub async fn execute_grid(
    &self,
    symbol: &str,
    side: OrderSide,
    total_quantity: Decimal,
    lower_price: Decimal,
    upper_price: Decimal,
    grid_levels: usize,
  ) -> Result<Vec<OrderResponse>, StrategyError> {
    self.execute_grid_with_cancel(symbol, side, total_quantity, lower_price, upper_price, grid_levels, &CancellationToken::new())
      .await
  }

  #[allow(clippy::too_many_arguments)]
  pub async fn execute_grid_with_cancel(
    &self,
    symbol: &str,
    side: OrderSide,
    total_quantity: Decimal,
    lower_price: Decimal,
    upper_price: Decimal,
    grid_levels: usize,
    cancel: &CancellationToken,
  ) -> Result<Vec<OrderResponse>, StrategyError> {
    let plan = GridPlan::new(symbol, side, total_quantity, lower_price, upper_price, grid_levels)
      .map_err(|e| self.reject(GRID, grid_levels, e.into()))?;
    self.run_grid(&plan, cancel).await
  }

  pub async fn run_grid(&self, plan: &GridPlan, cancel: &CancellationToken) -> Result<Vec<OrderResponse>, StrategyError> {
    let quantity = plan.quantity_per_order();
    let count = plan.grid_levels;
    self.logger.info(format!(
      "Starting Grid on {}: {} levels from {} to {}, {} qty each",
      plan.symbol, count, plan.lower_price, plan.upper_price, quantity
    ));

    let mut results = Vec::new();
    for price in plan.price_levels() {
      if cancel.is_cancelled() {
        return Err(self.abort(GRID, count, results, TradingError::Cancelled));
      }

      match self.place_order(&plan.symbol, plan.side, OrderType::Limit, quantity, Some(price), None).await {
        Ok(response) => results.push(response),
        Err(e) => return Err(self.abort(GRID, count, results, e)),
      }
    }

    self.logger.info(format!("Grid on {} completed: {} orders", plan.symbol, results.len()));
    Ok(results)
  }

  fn reject(&self, strategy: &'static str, planned: usize, error: TradingError) -> StrategyError {
    self.logger.error(format!("{} rejected: {}", strategy, error));
    StrategyError::rejected(strategy, planned, error)
  }

  fn abort(&self, strategy: &'static str, planned: usize, completed: Vec<OrderResponse>, error: TradingError) -> StrategyError {
    let message = format!("{} aborted after {} of {} orders: {}", strategy, completed.len(), planned, error);
    // 취소는 경고 레벨
    if matches!(error, TradingError::Cancelled) {
      self.logger.warn(message);
    } else {
      self.logger.error(message);
    }
    StrategyError { strategy, planned, completed, source: error }
  }
}
