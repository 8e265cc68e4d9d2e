//! 시장/통화 캐시.
//!
//! 로드할 때마다 전체 테이블을 새로 만들어 교체합니다. 파서는 스냅샷(`Arc<MarketSnapshot>`)을
//! 받아 읽기만 하므로 로드 중에도 이전 테이블을 안전하게 읽을 수 있습니다.

use crate::error::ExchangeError;
use crate::traits::ExchangeResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use trader_core::{Currency, Market};

/// 한 시점의 시장/통화 테이블.
#[derive(Debug, Default)]
pub struct MarketSnapshot {
    markets: HashMap<String, Market>,
    symbols_by_id: HashMap<String, String>,
    currencies: HashMap<String, Currency>,
    codes_by_id: HashMap<String, String>,
    markets_loaded: bool,
    currencies_loaded: bool,
}

impl MarketSnapshot {
    pub fn new(markets: Vec<Market>, currencies: Vec<Currency>) -> Self {
        let mut snapshot = Self::default();
        snapshot.set_markets(markets);
        snapshot.set_currencies(currencies);
        snapshot
    }

    fn set_markets(&mut self, markets: Vec<Market>) {
        self.symbols_by_id = markets
            .iter()
            .map(|m| (m.id.clone(), m.symbol.clone()))
            .collect();
        self.markets = markets.into_iter().map(|m| (m.symbol.clone(), m)).collect();
        self.markets_loaded = true;
    }

    fn set_currencies(&mut self, currencies: Vec<Currency>) {
        self.codes_by_id = currencies
            .iter()
            .map(|c| (c.id.clone(), c.code.clone()))
            .collect();
        self.currencies = currencies.into_iter().map(|c| (c.code.clone(), c)).collect();
        self.currencies_loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.markets_loaded
    }

    /// 통합 심볼로 시장을 찾습니다. 없으면 `BadSymbol`.
    pub fn market(&self, symbol: &str) -> ExchangeResult<&Market> {
        self.markets
            .get(symbol)
            .ok_or_else(|| ExchangeError::BadSymbol(format!("unknown market symbol {}", symbol)))
    }

    pub fn market_by_id(&self, id: &str) -> Option<&Market> {
        self.symbols_by_id.get(id).and_then(|s| self.markets.get(s))
    }

    /// 거래소 ID로 시장을 찾습니다. 없으면 합성 레코드를 돌려줍니다.
    pub fn safe_market(&self, id: &str) -> Market {
        self.market_by_id(id)
            .cloned()
            .unwrap_or_else(|| Market::unlisted(id))
    }

    /// 거래소 ID의 통합 심볼. 없으면 ID 그대로.
    pub fn safe_symbol(&self, id: &str) -> String {
        self.symbols_by_id
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.markets.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currencies.get(code)
    }

    pub fn currency_by_id(&self, id: &str) -> Option<&Currency> {
        self.codes_by_id.get(id).and_then(|c| self.currencies.get(c))
    }

    /// 통합 통화 코드. 캐시에 없으면 대문자로 변환한 ID.
    pub fn safe_currency_code(&self, id: &str) -> String {
        self.codes_by_id
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_uppercase())
    }

    /// 통합 통화 코드의 거래소 ID. 캐시에 없으면 코드 그대로.
    pub fn currency_id(&self, code: &str) -> String {
        self.currencies
            .get(code)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| code.to_string())
    }

    pub fn currencies_loaded(&self) -> bool {
        self.currencies_loaded
    }
}

/// 프로세스 전역 시장 캐시.
#[derive(Debug, Clone, Default)]
pub struct MarketCache {
    inner: Arc<RwLock<Arc<MarketSnapshot>>>,
}

impl MarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 스냅샷.
    pub async fn snapshot(&self) -> Arc<MarketSnapshot> {
        self.inner.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_loaded()
    }

    /// 시장과 통화 테이블을 통째로 교체합니다.
    pub async fn replace(&self, markets: Vec<Market>, currencies: Vec<Currency>) -> Arc<MarketSnapshot> {
        let snapshot = Arc::new(MarketSnapshot::new(markets, currencies));
        *self.inner.write().await = snapshot.clone();
        snapshot
    }

    /// 통합 심볼로 시장을 찾습니다.
    pub async fn market(&self, symbol: &str) -> ExchangeResult<Market> {
        self.snapshot().await.market(symbol).cloned()
    }

    pub async fn safe_market(&self, id: &str) -> Market {
        self.snapshot().await.safe_market(id)
    }
}
