use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TradingError;
use crate::exchange::traits::ExchangeClient;
use crate::models::order::{OrderId, OrderRequest, OrderResponse, OrderStatus};
use crate::models::symbol_rules::SymbolFilters;

/// A no-op exchange connector that acknowledges orders without sending them
pub struct DryRunExchange {
  rules: HashMap<String, SymbolFilters>,
  counter: AtomicU64,
}

impl DryRunExchange {
  pub fn new() -> Self {
    Self { rules: HashMap::new(), counter: AtomicU64::new(0) }
  }

  /// Serve precision rules (e.g. from a cached exchangeInfo) to the engine
  pub fn with_rules(rules: HashMap<String, SymbolFilters>) -> Self {
    Self { rules, counter: AtomicU64::new(0) }
  }
}

impl Default for DryRunExchange {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl ExchangeClient for DryRunExchange {
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, TradingError> {
    let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
    let id = OrderId(format!("dry-{}-{}", request.symbol(), seq));
    Ok(OrderResponse {
      raw: serde_json::json!({ "dryRun": true, "orderId": id.0, "request": request }),
      order_id: id,
      client_order_id: Some(request.client_order_id().to_string()),
      symbol: request.symbol().to_string(),
      status: OrderStatus::New,
    })
  }

  async fn fetch_symbol_rules(&self) -> Result<HashMap<String, SymbolFilters>, TradingError> {
    Ok(self.rules.clone())
  }
}
