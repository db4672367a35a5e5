use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::config::ExchangeConfig;
use crate::error::TradingError;
use crate::exchange::traits::ExchangeClient;
use crate::models::order::{OrderId, OrderRequest, OrderResponse, OrderStatus, OrderType};
use crate::models::symbol_rules::SymbolFilters;

type HmacSha256 = Hmac<Sha256>;

pub const MAINNET_URL: &str = "https://fapi.binance.com";
pub const TESTNET_URL: &str = "https://testnet.binancefuture.com";

/// Binance USDT-M Futures REST connector (order entry and exchange info)
pub struct BinanceFuturesExchange {
  pub base_url: String,
  api_key: String,
  api_secret: String,
  recv_window_ms: u64,
  http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiError {
  code: i64,
  msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderAck {
  order_id: i64,
  client_order_id: Option<String>,
  symbol: String,
  status: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
  symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
  symbol: String,
  filters: Vec<serde_json::Value>,
}

impl BinanceFuturesExchange {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
    BinanceFuturesExchange {
      base_url: base_url.into(),
      api_key: api_key.into(),
      api_secret: api_secret.into(),
      recv_window_ms: 5000,
      http: reqwest::Client::new(),
    }
  }

  /// Build a connector from configuration. Credentials are required.
  pub fn from_config(config: &ExchangeConfig) -> Result<Self, TradingError> {
    let api_key = config.api_key.clone().filter(|k| !k.is_empty())
      .ok_or_else(|| TradingError::ConfigError("API key is required".to_string()))?;
    let api_secret = config.api_secret.clone().filter(|s| !s.is_empty())
      .ok_or_else(|| TradingError::ConfigError("API secret is required".to_string()))?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_millis(config.timeout_ms))
      .build()?;

    Ok(BinanceFuturesExchange {
      base_url: config.resolved_base_url(),
      api_key,
      api_secret,
      recv_window_ms: config.recv_window_ms,
      http,
    })
  }

  fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
  }

  fn sign(&self, query: &str) -> Result<String, TradingError> {
    let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
      .map_err(|e| TradingError::ConfigError(format!("invalid API secret: {}", e)))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
  }
}

/// Query parameters for `POST /fapi/v1/order`, without timestamp and signature.
pub(crate) fn order_params(request: &OrderRequest) -> Vec<(&'static str, String)> {
  // STOP_LIMIT is called STOP on USDT-M futures
  let order_type = match request.order_type() {
    OrderType::Market => "MARKET",
    OrderType::Limit => "LIMIT",
    OrderType::StopLimit => "STOP",
  };
  let mut params = vec![
    ("symbol", request.symbol().to_string()),
    ("side", request.side().as_str().to_string()),
    ("type", order_type.to_string()),
    ("quantity", request.quantity().to_string()),
  ];
  if let Some(price) = request.price() {
    params.push(("price", price.to_string()));
  }
  if let Some(stop_price) = request.stop_price() {
    params.push(("stopPrice", stop_price.to_string()));
  }
  if let Some(tif) = request.time_in_force() {
    params.push(("timeInForce", tif.as_str().to_string()));
  }
  params.push(("newClientOrderId", request.client_order_id().to_string()));
  params
}

fn encode_query(params: &[(&str, String)]) -> String {
  params.iter()
    .map(|(k, v)| format!("{}={}", k, v))
    .collect::<Vec<_>>()
    .join("&")
}

/// Extract LOT_SIZE stepSize and PRICE_FILTER tickSize from one symbol's filter list.
fn parse_filters(filters: &[serde_json::Value]) -> Option<SymbolFilters> {
  let mut quantity_step = None;
  let mut price_tick = None;
  for filter in filters {
    let decimal = |key: &str| filter.get(key).and_then(|v| v.as_str()).and_then(|s| Decimal::from_str(s).ok());
    match filter.get("filterType").and_then(|v| v.as_str()) {
      Some("LOT_SIZE") => quantity_step = decimal("stepSize"),
      Some("PRICE_FILTER") => price_tick = decimal("tickSize"),
      _ => {}
    }
  }
  Some(SymbolFilters::new(quantity_step?, price_tick?))
}

async fn api_error(res: reqwest::Response) -> TradingError {
  let status_code = res.status().as_u16();
  let body = res.text().await.unwrap_or_default();
  match serde_json::from_str::<ApiError>(&body) {
    Ok(err) => TradingError::Exchange { status_code, code: err.code, message: err.msg },
    Err(_) => TradingError::Exchange { status_code, code: 0, message: body },
  }
}

#[async_trait]
impl ExchangeClient for BinanceFuturesExchange {
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, TradingError> {
    let mut params = order_params(request);
    params.push(("recvWindow", self.recv_window_ms.to_string()));
    params.push(("timestamp", Self::timestamp_ms().to_string()));
    let query = encode_query(&params);
    let signature = self.sign(&query)?;
    let url = format!("{}/fapi/v1/order?{}&signature={}", self.base_url, query, signature);

    let res = self.http
      .post(url)
      .header("X-MBX-APIKEY", &self.api_key)
      .send().await?;
    if !res.status().is_success() {
      return Err(api_error(res).await);
    }

    let raw: serde_json::Value = res.json().await?;
    let ack: OrderAck = serde_json::from_value(raw.clone())?;
    Ok(OrderResponse {
      order_id: OrderId(ack.order_id.to_string()),
      client_order_id: ack.client_order_id,
      symbol: ack.symbol,
      status: ack.status.parse().unwrap_or(OrderStatus::Unknown),
      raw,
    })
  }

  async fn fetch_symbol_rules(&self) -> Result<HashMap<String, SymbolFilters>, TradingError> {
    let url = format!("{}/fapi/v1/exchangeInfo", self.base_url);
    let res = self.http.get(url).send().await?;
    if !res.status().is_success() {
      return Err(api_error(res).await);
    }
    let info: ExchangeInfo = res.json().await?;

    let rules = info.symbols.into_iter()
      .filter_map(|s| {
        let filters = parse_filters(&s.filters);
        if filters.is_none() {
          log::warn!("exchangeInfo: {} has no LOT_SIZE/PRICE_FILTER, skipping", s.symbol);
        }
        filters.map(|f| (s.symbol, f))
      })
      .collect();
    Ok(rules)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::order::OrderSide;
  use crate::models::symbol_rules::SymbolRules;
  use crate::order_core::OrderRequestBuilder;
  use rust_decimal_macros::dec;
  use std::sync::Arc;

  fn builder() -> OrderRequestBuilder {
    OrderRequestBuilder::new(Arc::new(SymbolRules::default()))
  }

  #[test]
  fn test_stop_limit_params() {
    let req = builder()
      .build("BTCUSDT", OrderSide::Sell, OrderType::StopLimit, dec!(0.5), Some(dec!(49000)), Some(dec!(49500)))
      .unwrap();
    let params = order_params(&req);
    let get = |k: &str| params.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());

    assert_eq!(get("type"), Some("STOP"));
    assert_eq!(get("side"), Some("SELL"));
    assert_eq!(get("quantity"), Some("0.5"));
    assert_eq!(get("price"), Some("49000"));
    assert_eq!(get("stopPrice"), Some("49500"));
    assert_eq!(get("timeInForce"), Some("GTC"));
    assert_eq!(get("newClientOrderId"), Some(req.client_order_id()));
  }

  #[test]
  fn test_market_params_have_no_price() {
    let req = builder()
      .build("BTCUSDT", OrderSide::Buy, OrderType::Market, dec!(2), None, None)
      .unwrap();
    let query = encode_query(&order_params(&req));
    assert!(query.starts_with("symbol=BTCUSDT&side=BUY&type=MARKET&quantity=2&newClientOrderId="));
    assert!(!query.contains("price"));
    assert!(!query.contains("timeInForce"));
  }

  #[test]
  fn test_signature_is_hex_hmac_sha256() {
    // Binance API documentation example
    let exchange = BinanceFuturesExchange::new(
      TESTNET_URL,
      "key",
      "2b5eb11e18796d12d88f13dc27dbbd02c2cc51ff7059765ed9821957d82bb4d9",
    );
    let query = "symbol=BTCUSDT&side=BUY&type=LIMIT&quantity=1&price=9000&timeInForce=GTC&recvWindow=5000&timestamp=1591702613943";
    assert_eq!(
      exchange.sign(query).unwrap(),
      "3c661234138461fcc7a7d8746c6558c9842d4e10870d2ecbedf7777cad694af9"
    );
  }

  #[test]
  fn test_parse_exchange_info_filters() {
    let info: ExchangeInfo = serde_json::from_value(serde_json::json!({
      "symbols": [
        {
          "symbol": "BTCUSDT",
          "filters": [
            {"filterType": "PRICE_FILTER", "minPrice": "556.80", "maxPrice": "4529764", "tickSize": "0.10"},
            {"filterType": "LOT_SIZE", "minQty": "0.001", "maxQty": "1000", "stepSize": "0.001"},
            {"filterType": "MIN_NOTIONAL", "notional": "100"}
          ]
        },
        {"symbol": "ODDUSDT", "filters": [{"filterType": "PRICE_FILTER", "tickSize": "0.01"}]}
      ]
    })).unwrap();

    let btc = parse_filters(&info.symbols[0].filters).unwrap();
    assert_eq!(btc.quantity_step, dec!(0.001));
    assert_eq!(btc.price_tick, dec!(0.1));
    assert!(parse_filters(&info.symbols[1].filters).is_none());
  }
}
