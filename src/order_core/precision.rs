//! 거래소 정밀도 규칙 적용
//!
//! 수량/가격을 허용 단위(step, tick)의 배수로 내림한다.

use rust_decimal::Decimal;

/// `value` 이하인 `step`의 최대 배수를 반환
///
/// `step`이 0 이하이면 값을 그대로 돌려준다. 결과는 뒤쪽 0을 제거한 형태이다.
pub fn normalize(value: Decimal, step: Decimal) -> Decimal {
  if step <= Decimal::ZERO {
    return value;
  }

  let remainder = value % step;
  let mut floored = value - remainder;
  // 음수 나머지는 0 방향 절삭이므로 한 칸 더 내린다
  if remainder < Decimal::ZERO {
    floored -= step;
  }
  floored.normalize()
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;
  use rust_decimal_macros::dec;

  #[rstest]
  #[case(dec!(1.23456), dec!(0.001), dec!(1.234))]
  #[case(dec!(0.3), dec!(0.1), dec!(0.3))]
  #[case(dec!(50123.456), dec!(0.1), dec!(50123.4))]
  #[case(dec!(0.0009), dec!(0.001), dec!(0))]
  #[case(dec!(2), dec!(0.001), dec!(2))]
  #[case(dec!(100.7), dec!(5), dec!(100))]
  #[case(dec!(0.123456789), dec!(0.00000001), dec!(0.12345678))]
  fn test_normalize_floors_to_step(#[case] value: Decimal, #[case] step: Decimal, #[case] expected: Decimal) {
    assert_eq!(normalize(value, step), expected);
  }

  #[test]
  fn test_zero_step_passes_through() {
    assert_eq!(normalize(dec!(1.23456), Decimal::ZERO), dec!(1.23456));
  }

  #[test]
  fn test_negative_value_floors_downward() {
    assert_eq!(normalize(dec!(-1.5), dec!(1)), dec!(-2));
    assert_eq!(normalize(dec!(-2), dec!(1)), dec!(-2));
  }

  #[rstest]
  fn test_floor_properties(
    #[values(dec!(0.001), dec!(0.01), dec!(0.1), dec!(0.5), dec!(1), dec!(2.5))] step: Decimal,
  ) {
    let mut value = Decimal::ZERO;
    while value < dec!(20) {
      let normalized = normalize(value, step);
      assert!(normalized <= value, "{} > {}", normalized, value);
      assert!(value - normalized < step);
      assert_eq!(normalized % step, Decimal::ZERO);
      value += dec!(0.0137);
    }
  }

  #[test]
  fn test_normalize_is_deterministic() {
    let first = normalize(dec!(3.14159), dec!(0.01));
    for _ in 0..10 {
      assert_eq!(normalize(dec!(3.14159), dec!(0.01)), first);
    }
  }

  #[test]
  fn test_float_noise_values_are_exact() {
    // 0.1 + 0.2 는 이진 부동소수점에서 0.30000000000000004 가 된다
    let value = dec!(0.1) + dec!(0.2);
    assert_eq!(normalize(value, dec!(0.1)), dec!(0.3));
    assert_eq!(normalize(dec!(0.7), dec!(0.1)).to_string(), "0.7");
  }
}
