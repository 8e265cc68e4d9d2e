//! 거래소 trait 정의.

use crate::markets::MarketSnapshot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use trader_core::{
    Balance, Currency, DepositAddress, Market, Ohlcv, Order, OrderBook, OrderRequest, Ticker,
    Timeframe, Trade, TradingFee, Transaction, WithdrawRequest,
};

use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 거래소 가동 상태.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeStatus {
    /// `ok` 또는 `maintenance`
    pub status: String,
    pub updated: Option<i64>,
    #[serde(default)]
    pub info: Value,
}

/// 통합 거래소 인터페이스.
///
/// 심볼은 통합 표기(`BTC/PHP`), 시각은 epoch 밀리초입니다.
/// 필수 인자가 빠진 호출은 요청을 보내기 전에 `ArgumentsRequired`로 실패합니다.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// 거래소 ID (예: "coinsph")
    fn id(&self) -> &str;

    /// 거래소 표시 이름.
    fn name(&self) -> &str;

    /// 시장/통화 캐시를 채웁니다. `reload`가 아니면 이미 로드된 스냅샷을 재사용합니다.
    async fn load_markets(&self, reload: bool) -> ExchangeResult<Arc<MarketSnapshot>>;

    // === 공개 데이터 ===

    async fn fetch_status(&self) -> ExchangeResult<ExchangeStatus>;

    /// 서버 시각.
    async fn fetch_time(&self) -> ExchangeResult<Option<i64>>;

    async fn fetch_markets(&self) -> ExchangeResult<Vec<Market>>;

    /// 통화 목록. 자격증명이 없으면 빈 목록.
    async fn fetch_currencies(&self) -> ExchangeResult<Vec<Currency>>;

    async fn fetch_ticker(&self, symbol: &str) -> ExchangeResult<Ticker>;

    /// 여러 심볼의 시세. `None`이면 전체.
    async fn fetch_tickers(
        &self,
        symbols: Option<&[String]>,
    ) -> ExchangeResult<BTreeMap<String, Ticker>>;

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> ExchangeResult<OrderBook>;

    /// 캔들 조회.
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Ohlcv>>;

    /// 공개 체결 내역.
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Trade>>;

    // === 계좌 ===

    async fn fetch_balance(&self) -> ExchangeResult<Balance>;

    /// 내 체결 내역 (심볼 필수).
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Trade>>;

    /// 특정 주문의 체결 내역 (심볼 필수).
    async fn fetch_order_trades(
        &self,
        id: &str,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Trade>>;

    async fn fetch_trading_fee(&self, symbol: &str) -> ExchangeResult<TradingFee>;

    async fn fetch_trading_fees(&self) -> ExchangeResult<BTreeMap<String, TradingFee>>;

    // === 주문 ===

    async fn create_order(&self, request: &OrderRequest) -> ExchangeResult<Order>;

    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> ExchangeResult<Order>;

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Order>>;

    /// 종료된 주문 (심볼 필수).
    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Order>>;

    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> ExchangeResult<Order>;

    /// 심볼의 미체결 주문 전체 취소 (심볼 필수).
    async fn cancel_all_orders(&self, symbol: Option<&str>) -> ExchangeResult<Vec<Order>>;

    // === 입출금 ===

    async fn withdraw(&self, request: &WithdrawRequest) -> ExchangeResult<Transaction>;

    /// 입금 주소 (네트워크 필수).
    async fn fetch_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> ExchangeResult<DepositAddress>;

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Transaction>>;

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Transaction>>;
}
