use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ConstructionError;
use crate::models::order::{OrderRequest, OrderSide, OrderType, TimeInForce};
use crate::models::symbol_rules::{PrecisionKind, SymbolRules};

/// 주문 요청 생성기
///
/// 주문 유형별 필수 값 검증과 정밀도 보정을 거친 `OrderRequest`만 만든다.
/// 실패는 모두 네트워크 호출 전에 발생한다.
#[derive(Debug, Clone)]
pub struct OrderRequestBuilder {
    rules: Arc<SymbolRules>,
}

impl OrderRequestBuilder {
    pub fn new(rules: Arc<SymbolRules>) -> Self {
        OrderRequestBuilder { rules }
    }

    pub fn rules(&self) -> &SymbolRules {
        &self.rules
    }

    /// 주문 요청 생성
    pub fn build(
        &self,
        symbol: &str,
        side: OrderSide,
        order_type: OrderType,
        quantity: Decimal,
        price: Option<Decimal>,
        stop_price: Option<Decimal>,
    ) -> Result<OrderRequest, ConstructionError> {
        let symbol = symbol.trim().to_uppercase();

        // 수량 보정
        let quantity = self.rules.normalize(&symbol, quantity, PrecisionKind::Quantity);
        if quantity <= Decimal::ZERO {
            return Err(ConstructionError::NonPositiveQuantity(quantity));
        }

        let (price, stop_price, time_in_force) = match order_type {
            OrderType::Market => (None, None, None),
            OrderType::Limit => {
                let price = price.ok_or(ConstructionError::MissingPrice)?;
                (Some(self.price(&symbol, price)?), None, Some(TimeInForce::Gtc))
            }
            OrderType::StopLimit => {
                let price = price.ok_or(ConstructionError::MissingPrice)?;
                let stop_price = stop_price.ok_or(ConstructionError::MissingStopPrice)?;
                (
                    Some(self.price(&symbol, price)?),
                    Some(self.price(&symbol, stop_price)?),
                    Some(TimeInForce::Gtc),
                )
            }
        };

        Ok(OrderRequest {
            symbol,
            side,
            order_type,
            quantity,
            price,
            stop_price,
            time_in_force,
            client_order_id: new_client_order_id(),
        })
    }

    fn price(&self, symbol: &str, raw: Decimal) -> Result<Decimal, ConstructionError> {
        let price = self.rules.normalize(symbol, raw, PrecisionKind::Price);
        if price <= Decimal::ZERO {
            return Err(ConstructionError::NonPositivePrice(price));
        }
        Ok(price)
    }
}

/// Binance newClientOrderId 제한(36자) 이내의 ID
fn new_client_order_id() -> String {
    format!("x-{}", Uuid::new_v4().simple())
}
