/**
* filename : twap_splitter
* author : HAMA
* date: 2026. 10. 19.
* description: TWAP 분할 계획 (분할 수량, 분할 간 대기 시간)
**/

use rust_decimal::Decimal;
use tokio::time::Duration;

use crate::error::ConstructionError;
use crate::models::order::OrderSide;

/// TWAP 실행 계획
#[derive(Debug, Clone, PartialEq)]
pub struct TwapPlan {
  /// 거래 심볼
  pub symbol: String,
  /// 주문 방향 (매수/매도)
  pub side: OrderSide,
  /// 총 주문 수량
  pub total_quantity: Decimal,
  /// 전체 실행 시간 (초)
  pub duration_seconds: u64,
  /// 분할 수
  pub interval_count: usize,
}

impl TwapPlan {
  /// 새 TWAP 계획 생성. 분할 수가 0이면 거부한다.
  pub fn new(
    symbol: impl Into<String>,
    side: OrderSide,
    total_quantity: Decimal,
    duration_seconds: u64,
    interval_count: usize,
  ) -> Result<Self, ConstructionError> {
    if interval_count == 0 {
      return Err(ConstructionError::ZeroIntervals);
    }
    Ok(TwapPlan {
      symbol: symbol.into(),
      side,
      total_quantity,
      duration_seconds,
      interval_count,
    })
  }

  /// 분할당 수량
  pub fn slice_quantity(&self) -> Decimal {
    self.total_quantity / Decimal::from(self.interval_count)
  }

  /// 분할 간 대기 시간 (나노초 단위 내림)
  pub fn delay(&self) -> Duration {
    let nanos = u128::from(self.duration_seconds) * NANOS_PER_SEC / self.interval_count as u128;
    // 몫은 duration_seconds 이하이므로 u64 범위 안
    let secs = (nanos / NANOS_PER_SEC) as u64;
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
  }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_even_split() {
    let plan = TwapPlan::new("BTCUSDT", OrderSide::Buy, dec!(10), 30, 5).unwrap();
    assert_eq!(plan.slice_quantity(), dec!(2));
    assert_eq!(plan.delay(), Duration::from_secs(6));
  }

  #[test]
  fn test_fractional_delay() {
    let plan = TwapPlan::new("BTCUSDT", OrderSide::Sell, dec!(1), 10, 4).unwrap();
    assert_eq!(plan.slice_quantity(), dec!(0.25));
    assert_eq!(plan.delay(), Duration::from_millis(2500));
  }

  #[test]
  fn test_single_interval() {
    let plan = TwapPlan::new("BTCUSDT", OrderSide::Buy, dec!(3), 60, 1).unwrap();
    assert_eq!(plan.slice_quantity(), dec!(3));
    assert_eq!(plan.delay(), Duration::from_secs(60));
  }

  #[test]
  fn test_repeating_delay_truncates_to_nanos() {
    let plan = TwapPlan::new("BTCUSDT", OrderSide::Buy, dec!(3), 20, 3).unwrap();
    assert_eq!(plan.delay(), Duration::new(6, 666_666_666));
  }

  #[test]
  fn test_extreme_durations() {
    let plan = TwapPlan::new("BTCUSDT", OrderSide::Buy, dec!(10), u64::MAX, 1).unwrap();
    assert_eq!(plan.delay(), Duration::from_secs(u64::MAX));

    let plan = TwapPlan::new("BTCUSDT", OrderSide::Buy, dec!(10), 30, usize::MAX).unwrap();
    assert_eq!(plan.delay(), Duration::ZERO);
  }

  #[test]
  fn test_zero_intervals_rejected() {
    let err = TwapPlan::new("BTCUSDT", OrderSide::Buy, dec!(10), 30, 0).unwrap_err();
    assert_eq!(err, ConstructionError::ZeroIntervals);
  }
}
