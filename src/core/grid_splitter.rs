//! 그리드 분할 계획
//!
//! 하한~상한 가격 구간을 균등 간격으로 나누고 수량을 레벨별로 배분한다.

use rust_decimal::Decimal;

use crate::error::ConstructionError;
use crate::models::order::OrderSide;

/// 그리드 실행 계획
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
  pub symbol: String,
  pub side: OrderSide,
  pub total_quantity: Decimal,
  pub lower_price: Decimal,
  pub upper_price: Decimal,
  pub grid_levels: usize,
}

impl GridPlan {
  pub fn new(
    symbol: impl Into<String>,
    side: OrderSide,
    total_quantity: Decimal,
    lower_price: Decimal,
    upper_price: Decimal,
    grid_levels: usize,
  ) -> Result<Self, ConstructionError> {
    if grid_levels == 0 {
      return Err(ConstructionError::ZeroGridLevels);
    }
    if lower_price > upper_price {
      return Err(ConstructionError::InvertedPriceBounds { lower: lower_price, upper: upper_price });
    }
    Ok(GridPlan {
      symbol: symbol.into(),
      side,
      total_quantity,
      lower_price,
      upper_price,
      grid_levels,
    })
  }

  /// 레벨당 주문 수량
  pub fn quantity_per_order(&self) -> Decimal {
    self.total_quantity / Decimal::from(self.grid_levels)
  }

  /// 오름차순 가격 레벨. 레벨이 2개 이상이면 양 끝을 포함하고, 1개면 하한가 하나.
  ///
  /// 레벨은 제출 순서대로 하나씩 계산된다.
  pub fn price_levels(&self) -> impl Iterator<Item = Decimal> + '_ {
    let last = self.grid_levels - 1;
    let span = self.upper_price - self.lower_price;
    let steps = Decimal::from(last);
    (0..self.grid_levels).map(move |i| {
      if i == 0 {
        self.lower_price
      } else if i == last {
        self.upper_price
      } else {
        self.lower_price + span * Decimal::from(i) / steps
      }
    })
  }
}
