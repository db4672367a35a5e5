//! 주문 요청 구성: 정밀도 보정과 유형별 검증

pub mod builder;
pub mod precision;

pub use builder::OrderRequestBuilder;
pub use precision::normalize;
