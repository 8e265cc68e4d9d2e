//! 시장 및 통화 메타데이터.
//!
//! - `Market` - 거래 가능한 심볼과 정밀도/한도
//! - `Currency` - 입출금 가능한 자산과 네트워크별 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 최소/최대 한도.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl MinMax {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }
}

/// 시장 정밀도.
///
/// 자릿수가 아니라 스텝 크기입니다 (예: `0.01`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketPrecision {
    /// 수량 스텝
    pub amount: Option<Decimal>,
    /// 가격 스텝 (호가 단위)
    pub price: Option<Decimal>,
}

/// 주문 한도.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketLimits {
    pub amount: MinMax,
    pub price: MinMax,
    /// 주문 금액 (수량 × 가격)
    pub cost: MinMax,
}

/// 거래 시장.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// 거래소 고유 식별자 (예: `BTCPHP`)
    pub id: String,
    /// 통합 심볼 (예: `BTC/PHP`)
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub base_id: String,
    pub quote_id: String,
    /// 거래 가능 여부 (알 수 없으면 `None`)
    pub active: Option<bool>,
    /// 메이커 수수료율
    pub maker: Option<Decimal>,
    /// 테이커 수수료율
    pub taker: Option<Decimal>,
    pub precision: MarketPrecision,
    pub limits: MarketLimits,
    /// 원본 응답
    #[serde(default)]
    pub info: Value,
}

impl Market {
    /// 캐시에 없는 시장 ID를 위한 합성 레코드.
    ///
    /// 심볼은 ID 그대로 사용하며, 나머지 메타데이터는 비어 있습니다.
    pub fn unlisted(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            symbol: id.clone(),
            id,
            base: String::new(),
            quote: String::new(),
            base_id: String::new(),
            quote_id: String::new(),
            active: None,
            maker: None,
            taker: None,
            precision: MarketPrecision::default(),
            limits: MarketLimits::default(),
            info: Value::Null,
        }
    }

    /// 합성 레코드인지 확인합니다.
    pub fn is_unlisted(&self) -> bool {
        self.base.is_empty() && self.quote.is_empty()
    }
}

/// 통화 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyType {
    /// 법정화폐
    Fiat,
    /// 암호화폐
    Crypto,
}

/// 통화의 네트워크별 입출금 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// 거래소 네트워크 ID (예: `ETH`)
    pub id: String,
    /// 통합 네트워크 코드 (예: `ERC20`)
    pub network: String,
    pub active: Option<bool>,
    pub deposit: Option<bool>,
    pub withdraw: Option<bool>,
    /// 출금 수수료
    pub fee: Option<Decimal>,
    /// 출금 수량 스텝
    pub precision: Option<Decimal>,
    pub withdraw_limits: MinMax,
    #[serde(default)]
    pub info: Value,
}

/// 입출금 가능한 자산.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// 거래소 자산 ID
    pub id: String,
    /// 통합 코드
    pub code: String,
    pub name: Option<String>,
    pub kind: CurrencyType,
    /// 전송 수량 스텝
    pub precision: Option<Decimal>,
    pub active: Option<bool>,
    pub deposit: Option<bool>,
    pub withdraw: Option<bool>,
    pub fee: Option<Decimal>,
    /// 네트워크 전체에 걸친 출금 한도
    #[serde(default)]
    pub withdraw_limits: MinMax,
    /// 네트워크 코드 → 네트워크 정보
    pub networks: BTreeMap<String, NetworkInfo>,
    #[serde(default)]
    pub info: Value,
}

impl Currency {
    /// 네트워크 중 하나라도 입금 가능한지.
    pub fn any_network_deposit(&self) -> bool {
        self.networks.values().any(|n| n.deposit == Some(true))
    }

    /// 네트워크 중 하나라도 출금 가능한지.
    pub fn any_network_withdraw(&self) -> bool {
        self.networks.values().any(|n| n.withdraw == Some(true))
    }
}
