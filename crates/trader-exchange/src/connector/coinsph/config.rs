//! coins.ph 커넥터 설정.
//!
//! 설정은 생성 시점에 고정됩니다. 호출별 오버라이드는 요청 사본에만 반영됩니다.

use super::api::Api;
use crate::rate_limit::ThrottleConfig;
use crate::signer::Credentials;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use trader_core::{ExchangeConfig, TimeInForce};

/// REST API 기본 URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pro.coins.ph";

/// API 키 헤더.
pub const API_KEY_HEADER: &str = "X-COINS-APIKEY";

/// 시세 조회에 사용할 엔드포인트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickerEndpoint {
    /// 24시간 통계 (`ticker/24hr`)
    #[default]
    Stats24h,
    /// 최종가만 (`ticker/price`)
    Price,
    /// 최우선 호가만 (`ticker/bookTicker`)
    BookTicker,
}

impl FromStr for TickerEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "24hr" | "stats24h" | "ticker24hr" => Ok(TickerEndpoint::Stats24h),
            "price" | "tickerprice" => Ok(TickerEndpoint::Price),
            "bookticker" | "book_ticker" => Ok(TickerEndpoint::BookTicker),
            _ => Err(format!("Unknown ticker endpoint: {}", s)),
        }
    }
}

impl TickerEndpoint {
    pub fn api(self) -> Api {
        match self {
            TickerEndpoint::Stats24h => Api::Ticker24hr,
            TickerEndpoint::Price => Api::TickerPrice,
            TickerEndpoint::BookTicker => Api::BookTicker,
        }
    }
}

/// 기본 네트워크 별칭 (통합 코드 → 거래소 ID).
const DEFAULT_NETWORKS: &[(&str, &str)] = &[
    ("TRC20", "TRX"),
    ("ERC20", "ETH"),
    ("BEP20", "BSC"),
    ("ARB", "ARBITRUM"),
];

/// 커넥터 옵션.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinsPhOptions {
    /// 단일 시세 (`fetch_ticker`) 엔드포인트
    pub ticker_endpoint: TickerEndpoint,
    /// 다중 시세 (`fetch_tickers`) 엔드포인트
    pub tickers_endpoint: TickerEndpoint,
    /// 지정가 주문 기본 유효 기간
    pub time_in_force: TimeInForce,
    /// 시장가 주문 응답 형식
    pub market_order_resp_type: String,
    /// 지정가 주문 응답 형식
    pub limit_order_resp_type: String,
    /// 가격 없는 시장가 매수를 거부하고 `amount × price`로 금액을 계산
    pub market_buy_requires_price: bool,
    networks: HashMap<String, String>,
}

impl Default for CoinsPhOptions {
    fn default() -> Self {
        Self {
            ticker_endpoint: TickerEndpoint::default(),
            tickers_endpoint: TickerEndpoint::default(),
            time_in_force: TimeInForce::GTC,
            market_order_resp_type: "FULL".to_string(),
            limit_order_resp_type: "FULL".to_string(),
            market_buy_requires_price: true,
            networks: DEFAULT_NETWORKS
                .iter()
                .map(|(code, id)| (code.to_string(), id.to_string()))
                .collect(),
        }
    }
}

impl CoinsPhOptions {
    /// 네트워크 별칭을 추가합니다.
    pub fn with_network(mut self, code: impl Into<String>, id: impl Into<String>) -> Self {
        self.networks.insert(code.into().to_uppercase(), id.into());
        self
    }

    pub fn with_ticker_endpoint(mut self, endpoint: TickerEndpoint) -> Self {
        self.ticker_endpoint = endpoint;
        self
    }

    pub fn with_tickers_endpoint(mut self, endpoint: TickerEndpoint) -> Self {
        self.tickers_endpoint = endpoint;
        self
    }

    /// 통합 네트워크 코드를 거래소 ID로 변환합니다. 별칭이 없으면 그대로.
    pub fn network_code_to_id(&self, code: &str) -> String {
        self.networks
            .get(&code.to_uppercase())
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    /// 거래소 네트워크 ID를 통합 코드로 변환합니다. 별칭이 없으면 그대로.
    pub fn network_id_to_code(&self, id: &str) -> String {
        let mut codes: Vec<&String> = self
            .networks
            .iter()
            .filter(|(_, v)| v.as_str() == id)
            .map(|(k, _)| k)
            .collect();
        // 같은 ID에 별칭이 여럿이면 결과가 항상 같도록 정렬
        codes.sort();
        codes
            .first()
            .map(|c| c.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

/// coins.ph 클라이언트 설정.
///
/// # 보안
/// - `Debug` 구현은 자격증명을 마스킹합니다.
#[derive(Clone)]
pub struct CoinsPhConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
    /// 서명 요청 기본 수신 윈도우 (밀리초)
    pub recv_window: Option<u64>,
    pub throttle: ThrottleConfig,
    pub options: CoinsPhOptions,
}

impl fmt::Debug for CoinsPhConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinsPhConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .field("recv_window", &self.recv_window)
            .field("throttle", &self.throttle)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for CoinsPhConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: Duration::from_secs(30),
            recv_window: None,
            throttle: ThrottleConfig::default(),
            options: CoinsPhOptions::default(),
        }
    }
}

impl CoinsPhConfig {
    /// 공개 API 전용 설정.
    pub fn public() -> Self {
        Self::default()
    }

    /// 자격증명을 포함한 설정.
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::default().with_credentials(Credentials::new(api_key, secret))
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }

    pub fn with_options(mut self, options: CoinsPhOptions) -> Self {
        self.options = options;
        self
    }

    /// 요청 간격 제어를 켜거나 끕니다.
    pub fn with_rate_limit(mut self, enabled: bool) -> Self {
        self.throttle.enabled = enabled;
        self
    }

    /// 환경 변수에서 생성합니다 (`.env` 파일 포함).
    ///
    /// `COINSPH_API_KEY`, `COINSPH_API_SECRET`이 없으면 공개 API 전용 설정이 됩니다.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let (Ok(key), Ok(secret)) = (
            std::env::var("COINSPH_API_KEY"),
            std::env::var("COINSPH_API_SECRET"),
        ) {
            config.credentials = Some(Credentials::new(key, secret));
        }
        if let Ok(url) = std::env::var("COINSPH_BASE_URL") {
            config.base_url = url;
        }
        if let Some(window) = std::env::var("COINSPH_RECV_WINDOW")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.recv_window = Some(window);
        }
        config
    }

    /// `AppConfig`의 거래소 설정에서 생성합니다.
    ///
    /// 알 수 없는 옵션 값은 기본값으로 대체됩니다.
    pub fn from_exchange_config(exchange: &ExchangeConfig, credentials: Option<Credentials>) -> Self {
        let defaults = CoinsPhOptions::default();
        let opts = &exchange.options;

        let mut options = CoinsPhOptions {
            ticker_endpoint: opts
                .ticker_endpoint
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.ticker_endpoint),
            tickers_endpoint: opts
                .tickers_endpoint
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.tickers_endpoint),
            time_in_force: opts
                .time_in_force
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.time_in_force),
            market_buy_requires_price: opts
                .market_buy_requires_price
                .unwrap_or(defaults.market_buy_requires_price),
            ..defaults
        };
        for (code, id) in &opts.networks {
            options = options.with_network(code, id);
        }

        Self {
            base_url: exchange
                .rest_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            credentials,
            timeout: Duration::from_secs(exchange.timeout_secs),
            recv_window: exchange.recv_window,
            throttle: ThrottleConfig {
                base_interval_ms: exchange.rate_limit_ms,
                capacity: exchange.rate_limit_capacity,
                enabled: exchange.enable_rate_limit,
            },
            options,
        }
    }
}
