//! 시장 데이터 구조체.
//!
//! - `Ticker` - 24시간 롤링 시세 스냅샷
//! - `OrderBook` - 호가창
//! - `Ohlcv` - 캔들 6-튜플

use crate::types::{iso8601, Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 시세 스냅샷.
///
/// 엔드포인트에 따라 일부 필드만 채워집니다 (가격 전용, 최우선 호가 전용 등).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    /// 기준 시각 (epoch 밀리초)
    pub timestamp: Option<i64>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    /// 최우선 매수 호가
    pub bid: Option<Price>,
    pub bid_volume: Option<Quantity>,
    /// 최우선 매도 호가
    pub ask: Option<Price>,
    pub ask_volume: Option<Quantity>,
    /// 거래량 가중 평균 가격
    pub vwap: Option<Price>,
    pub open: Option<Price>,
    pub close: Option<Price>,
    /// `close`와 동일
    pub last: Option<Price>,
    pub previous_close: Option<Price>,
    /// 절대 변동폭
    pub change: Option<Decimal>,
    /// 변동률 (%)
    pub percentage: Option<Decimal>,
    /// 거래량 (기준 자산)
    pub base_volume: Option<Quantity>,
    /// 거래대금 (호가 자산)
    pub quote_volume: Option<Decimal>,
    #[serde(default)]
    pub info: Value,
}

impl Ticker {
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(iso8601)
    }

    /// 매도/매수 호가 차이.
    pub fn spread(&self) -> Option<Decimal> {
        self.ask?.checked_sub(self.bid?)
    }
}

/// 호가 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: Price,
    pub amount: Quantity,
}

/// 호가창.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub symbol: String,
    /// 매수 호가 (가격 내림차순)
    pub bids: Vec<OrderBookLevel>,
    /// 매도 호가 (가격 오름차순)
    pub asks: Vec<OrderBookLevel>,
    pub timestamp: Option<i64>,
    /// 거래소 시퀀스 번호
    pub nonce: Option<i64>,
}

impl OrderBook {
    /// 호가를 정렬된 상태로 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        mut bids: Vec<OrderBookLevel>,
        mut asks: Vec<OrderBookLevel>,
        timestamp: Option<i64>,
    ) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            symbol: symbol.into(),
            bids,
            asks,
            timestamp,
            nonce: None,
        }
    }

    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }
}

/// 캔들 `[timestamp, open, high, low, close, volume]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ohlcv {
    pub timestamp: Option<i64>,
    pub open: Option<Price>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    pub close: Option<Price>,
    pub volume: Option<Quantity>,
}
