//! 전략 실행 간 대기 처리

use async_trait::async_trait;
use std::sync::Mutex;
use tokio::time::Duration;

/// 분할 주문 사이의 대기 수단
#[async_trait]
pub trait Pacer: Send + Sync {
  async fn pause(&self, delay: Duration);
}

/// tokio 타이머 기반 대기
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
  async fn pause(&self, delay: Duration) {
    tokio::time::sleep(delay).await;
  }
}

/// 대기하지 않고 요청된 대기 시간만 기록
#[derive(Debug, Default)]
pub struct RecordingPacer {
  pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn pauses(&self) -> Vec<Duration> {
    self.pauses.lock().map(|p| p.clone()).unwrap_or_default()
  }
}

#[async_trait]
impl Pacer for RecordingPacer {
  async fn pause(&self, delay: Duration) {
    if let Ok(mut pauses) = self.pauses.lock() {
      pauses.push(delay);
    }
  }
}
