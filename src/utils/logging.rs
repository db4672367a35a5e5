//! 로깅 유틸리티
//!
//! 프로세스 로거 초기화(env_logger)와 엔진에 주입하는 이벤트 로거 제공

use chrono::{DateTime, Utc};
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;

use crate::config::LoggingConfig;
use crate::error::TradingError;

/// 로깅 시스템 초기화
///
/// `RUST_LOG`가 설정 파일의 레벨보다 우선한다. `file_path`가 있으면 콘솔과 파일에 함께 기록한다.
pub fn init(config: &LoggingConfig) -> Result<(), TradingError> {
    let mut builder = Builder::new();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    builder
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis();

    if let Some(path) = &config.file_path {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(Tee { file })));
    }

    builder
        .try_init()
        .map_err(|e| TradingError::ConfigError(format!("logger already initialized: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);
    Ok(())
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// stdout + 파일 동시 기록
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// 엔진이 남기는 구조화 로그 이벤트
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogEvent { timestamp: Utc::now(), level, message: message.into() }
    }
}

/// 엔진에 주입되는 로거. 전역 상태 없이 이벤트만 전달받는다.
pub trait EventLogger: Send + Sync {
    fn log(&self, event: LogEvent);

    fn info(&self, message: String) {
        self.log(LogEvent::new(Level::Info, message));
    }

    fn warn(&self, message: String) {
        self.log(LogEvent::new(Level::Warn, message));
    }

    fn error(&self, message: String) {
        self.log(LogEvent::new(Level::Error, message));
    }
}

/// `log` 크레이트로 전달하는 기본 로거
#[derive(Debug, Clone)]
pub struct FacadeLogger {
    target: &'static str,
}

impl FacadeLogger {
    pub fn new(target: &'static str) -> Self {
        FacadeLogger { target }
    }
}

impl Default for FacadeLogger {
    fn default() -> Self {
        FacadeLogger::new("xexec::engine")
    }
}

impl EventLogger for FacadeLogger {
    fn log(&self, event: LogEvent) {
        log::log!(target: self.target, event.level, "{}", event.message);
    }
}

/// 이벤트를 메모리에 보관하는 로거 (테스트/점검용)
#[derive(Debug, Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }
}

impl EventLogger for MemoryLogger {
    fn log(&self, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
