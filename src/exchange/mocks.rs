use std::collections::HashMap;
use tokio::sync::Mutex;

use async_trait::async_trait;

use crate::error::TradingError;
use crate::exchange::traits::ExchangeClient;
use crate::models::order::{OrderId, OrderRequest, OrderResponse, OrderStatus, OrderType};
use crate::models::symbol_rules::SymbolFilters;

/// A scripted failure returned instead of an order acknowledgement
#[derive(Debug, Clone)]
enum Failure {
    Exchange { status_code: u16, code: i64, message: String },
    Transport(String),
}

impl Failure {
    fn to_error(&self) -> TradingError {
        match self {
            Failure::Exchange { status_code, code, message } => TradingError::Exchange {
                status_code: *status_code,
                code: *code,
                message: message.clone(),
            },
            Failure::Transport(message) => TradingError::Transport(message.clone()),
        }
    }
}

/// A mock implementation of the ExchangeClient trait for testing and development.
/// Records every submitted request and can be scripted to fail on the n-th submission.
pub struct MockExchange {
    rules: HashMap<String, SymbolFilters>,
    rules_failure: Option<Failure>,
    failures: HashMap<usize, Failure>,
    submitted: Mutex<Vec<OrderRequest>>,
    rules_fetches: Mutex<usize>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            rules_failure: None,
            failures: HashMap::new(),
            submitted: Mutex::new(Vec::new()),
            rules_fetches: Mutex::new(0),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>, filters: SymbolFilters) -> Self {
        self.rules.insert(symbol.into(), filters);
        self
    }

    /// Reject the `nth` submission (1-based) with an exchange error
    pub fn fail_on(mut self, nth: usize, status_code: u16, code: i64, message: impl Into<String>) -> Self {
        self.failures.insert(nth, Failure::Exchange { status_code, code, message: message.into() });
        self
    }

    /// Fail the `nth` submission (1-based) with a transport error
    pub fn drop_connection_on(mut self, nth: usize, message: impl Into<String>) -> Self {
        self.failures.insert(nth, Failure::Transport(message.into()));
        self
    }

    pub fn fail_rules_fetch(mut self, status_code: u16, code: i64, message: impl Into<String>) -> Self {
        self.rules_failure = Some(Failure::Exchange { status_code, code, message: message.into() });
        self
    }

    /// Every request that reached the exchange, failed ones included
    pub async fn submitted(&self) -> Vec<OrderRequest> {
        self.submitted.lock().await.clone()
    }

    pub async fn rules_fetches(&self) -> usize {
        *self.rules_fetches.lock().await
    }
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, TradingError> {
        let mut submitted = self.submitted.lock().await;
        submitted.push(request.clone());
        let nth = submitted.len();

        if let Some(failure) = self.failures.get(&nth) {
            return Err(failure.to_error());
        }

        let status = if request.order_type() == OrderType::Market {
            OrderStatus::Filled
        } else {
            OrderStatus::New
        };
        let order_id = OrderId(format!("mock-{}", nth));

        Ok(OrderResponse {
            raw: serde_json::json!({
                "orderId": order_id.0,
                "clientOrderId": request.client_order_id(),
                "symbol": request.symbol(),
                "side": request.side().as_str(),
                "type": request.order_type().as_str(),
                "origQty": request.quantity().to_string(),
                "price": request.price().map(|p| p.to_string()),
            }),
            order_id,
            client_order_id: Some(request.client_order_id().to_string()),
            symbol: request.symbol().to_string(),
            status,
        })
    }

    async fn fetch_symbol_rules(&self) -> Result<HashMap<String, SymbolFilters>, TradingError> {
        *self.rules_fetches.lock().await += 1;
        match &self.rules_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(self.rules.clone()),
        }
    }
}
