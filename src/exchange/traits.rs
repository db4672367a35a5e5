use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::TradingError;
use crate::models::order::{OrderRequest, OrderResponse};
use crate::models::symbol_rules::SymbolFilters;

/// The `ExchangeClient` trait is the seam between the execution engine and
/// an exchange connection. Authentication and transport live behind it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Create an order on the exchange
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, TradingError>;

    /// Fetch quantity step and price tick for every listed symbol
    async fn fetch_symbol_rules(&self) -> Result<HashMap<String, SymbolFilters>, TradingError>;
}
