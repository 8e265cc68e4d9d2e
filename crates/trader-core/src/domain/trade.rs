//! 체결 기록 및 수수료.

use super::order::Side;
use crate::types::{iso8601, Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 체결에서의 유동성 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TakerOrMaker {
    /// 유동성 소비
    Taker,
    /// 유동성 공급
    Maker,
}

/// 지불한 수수료.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub cost: Option<Decimal>,
    /// 수수료 자산 코드
    pub currency: Option<String>,
}

/// 불변 체결 기록.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Option<String>,
    /// 체결을 만든 주문 ID (공개 체결 내역에는 없음)
    pub order: Option<String>,
    pub timestamp: Option<i64>,
    pub symbol: String,
    pub side: Option<Side>,
    pub taker_or_maker: Option<TakerOrMaker>,
    pub price: Option<Price>,
    pub amount: Option<Quantity>,
    /// 체결 금액. 주문 ID가 있는 체결에만 채워집니다.
    pub cost: Option<Decimal>,
    pub fee: Option<Fee>,
    #[serde(default)]
    pub info: Value,
}

impl Trade {
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(iso8601)
    }
}

/// 시장별 거래 수수료율.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingFee {
    pub symbol: String,
    pub maker: Option<Decimal>,
    pub taker: Option<Decimal>,
    #[serde(default)]
    pub info: Value,
}
