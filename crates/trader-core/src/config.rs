//! 설정 관리.
//!
//! TOML 파일과 `TRADER__` 접두사 환경 변수에서 설정을 로드합니다.
//! 예: `TRADER__EXCHANGES__COINSPH__RECV_WINDOW=5000`

use crate::logging::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 거래소 ID → 거래소 설정
    #[serde(default)]
    pub exchanges: HashMap<String, ExchangeConfig>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// `init_logging`에 넘길 설정으로 변환합니다. 알 수 없는 형식은 pretty.
    pub fn to_log_config(&self) -> LogConfig {
        let format = self.format.parse().unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

/// 거래소 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// 이 거래소 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 거래소 이름
    pub name: String,
    /// REST API 기본 URL (없으면 커넥터 기본값)
    #[serde(default)]
    pub rest_base_url: Option<String>,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 서명 요청의 수신 윈도우 (밀리초)
    #[serde(default)]
    pub recv_window: Option<u64>,
    /// 가중치 1당 요청 간격 (밀리초)
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
    /// 요청 간격 제어 사용 여부
    #[serde(default = "default_true")]
    pub enable_rate_limit: bool,
    /// 토큰 버킷 용량
    #[serde(default = "default_bucket_capacity")]
    pub rate_limit_capacity: f64,
    /// 커넥터 옵션
    #[serde(default)]
    pub options: ExchangeOptions,
}

/// 커넥터별 옵션.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExchangeOptions {
    /// 단일 시세 엔드포인트 (`24hr`, `price`, `bookTicker`)
    #[serde(default)]
    pub ticker_endpoint: Option<String>,
    /// 다중 시세 엔드포인트
    #[serde(default)]
    pub tickers_endpoint: Option<String>,
    /// 지정가 주문 기본 유효 기간
    #[serde(default)]
    pub time_in_force: Option<String>,
    /// 시장가 매수 시 가격 필수 여부
    #[serde(default)]
    pub market_buy_requires_price: Option<bool>,
    /// 추가 네트워크 별칭 (통합 코드 → 거래소 ID)
    #[serde(default)]
    pub networks: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_rate_limit_ms() -> u64 {
    50
}
fn default_bucket_capacity() -> f64 {
    1.0
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()))
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// TOML 문자열에서 설정을 로드합니다. 환경 변수 오버라이드도 적용됩니다.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from_str(toml, config::FileFormat::Toml))
    }

    fn build<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(source)
            .add_source(
                config::Environment::with_prefix("TRADER")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 거래소 설정을 조회합니다. 비활성화된 거래소는 `None`.
    pub fn exchange(&self, id: &str) -> Option<&ExchangeConfig> {
        self.exchanges.get(id).filter(|c| c.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [exchanges.coinsph]
            name = "coins.ph"
            recv_window = 5000

            [exchanges.coinsph.options]
            ticker_endpoint = "bookTicker"

            [exchanges.other]
            name = "other"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.to_log_config().format, LogFormat::Json);

        let coinsph = config.exchange("coinsph").unwrap();
        assert_eq!(coinsph.recv_window, Some(5000));
        assert_eq!(coinsph.timeout_secs, 30);
        assert_eq!(coinsph.rate_limit_ms, 50);
        assert!(coinsph.enable_rate_limit);
        assert_eq!(coinsph.options.ticker_endpoint.as_deref(), Some("bookTicker"));

        assert!(config.exchange("other").is_none());
        assert!(config.exchange("missing").is_none());
    }

    #[test]
    fn test_logging_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.exchanges.is_empty());
    }
}
