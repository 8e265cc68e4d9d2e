//! 주문 타입.
//!
//! 이 모듈은 주문 관련 타입을 정의합니다:
//! - `Side` - 주문 방향 (매수/매도)
//! - `OrderType` - 주문 유형 (시장가, 지정가, 스톱 등)
//! - `OrderStatus` - 통합 주문 상태
//! - `TimeInForce` - 주문 유효 기간
//! - `OrderRequest` - 주문 생성 요청
//! - `Order` - 거래소가 반환한 주문

use super::trade::Trade;
use crate::types::{iso8601, string_sub, Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// 주문 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl Side {
    /// 반대 방향을 반환합니다.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(format!("Unknown side: {}", s)),
        }
    }
}

/// 주문 유형.
///
/// `Display`는 거래소 와이어 표기(`STOP_LOSS_LIMIT` 등)를 출력합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// 시장가
    Market,
    /// 지정가
    Limit,
    /// 메이커 전용 지정가 (즉시 체결되면 거부)
    LimitMaker,
    /// 손절 (트리거 후 시장가)
    StopLoss,
    /// 지정가 손절
    StopLossLimit,
    /// 익절 (트리거 후 시장가)
    TakeProfit,
    /// 지정가 익절
    TakeProfitLimit,
}

impl OrderType {
    /// 가격이 필요한 지정가 계열인지.
    pub fn is_limit_like(&self) -> bool {
        matches!(
            self,
            OrderType::Limit
                | OrderType::LimitMaker
                | OrderType::StopLossLimit
                | OrderType::TakeProfitLimit
        )
    }

    /// 시장가 계열인지.
    pub fn is_market_like(&self) -> bool {
        !self.is_limit_like()
    }

    /// 트리거 가격이 필요한 스톱 계열인지.
    pub fn is_conditional(&self) -> bool {
        matches!(
            self,
            OrderType::StopLoss
                | OrderType::StopLossLimit
                | OrderType::TakeProfit
                | OrderType::TakeProfitLimit
        )
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::LimitMaker => "LIMIT_MAKER",
            OrderType::StopLoss => "STOP_LOSS",
            OrderType::StopLossLimit => "STOP_LOSS_LIMIT",
            OrderType::TakeProfit => "TAKE_PROFIT",
            OrderType::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderType {
    type Err = String;

    /// 통합 표기(`stop_loss`)와 와이어 표기(`STOP_LOSS`) 모두 허용합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "limit_maker" => Ok(OrderType::LimitMaker),
            "stop_loss" => Ok(OrderType::StopLoss),
            "stop_loss_limit" => Ok(OrderType::StopLossLimit),
            "take_profit" => Ok(OrderType::TakeProfit),
            "take_profit_limit" => Ok(OrderType::TakeProfitLimit),
            _ => Err(format!("Unknown order type: {}", s)),
        }
    }
}

/// 통합 주문 상태.
///
/// 생성 → `Open` → (`Closed` | `Canceled` | `Rejected`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// 미체결 또는 부분 체결
    Open,
    /// 전량 체결
    Closed,
    /// 취소됨
    Canceled,
    /// 거부됨
    Rejected,
}

impl OrderStatus {
    /// 최종 상태인지 확인합니다.
    pub fn is_final(&self) -> bool {
        !matches!(self, OrderStatus::Open)
    }
}

/// 주문 유효 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// 취소될 때까지 유효 (Good Till Cancelled)
    GTC,
    /// 즉시 체결 또는 취소 (Immediate Or Cancel)
    IOC,
    /// 전량 체결 또는 취소 (Fill Or Kill)
    FOK,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::GTC => write!(f, "GTC"),
            TimeInForce::IOC => write!(f, "IOC"),
            TimeInForce::FOK => write!(f, "FOK"),
        }
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::GTC),
            "IOC" => Ok(TimeInForce::IOC),
            "FOK" => Ok(TimeInForce::FOK),
            _ => Err(format!("Unknown time in force: {}", s)),
        }
    }
}

/// 주문 생성 요청.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// 통합 심볼
    pub symbol: String,
    pub order_type: OrderType,
    pub side: Side,
    /// 주문 수량. 시장가 매수에서 가격 없이 금액을 지정하는 경우 금액으로 해석됩니다.
    pub amount: Quantity,
    /// 지정가 (지정가 계열 필수, 시장가 매수 금액 계산에도 사용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// 트리거 가격 (스톱 계열 필수)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Price>,
    /// 시장가 매수에 사용할 호가 자산 금액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    /// 클라이언트 주문 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// 설정 기본값 대신 사용할 유효 기간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// 시장가 매수에서 가격 필수 여부 (설정값 덮어쓰기)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_buy_requires_price: Option<bool>,
    /// 테스트 주문 (체결되지 않음)
    #[serde(default)]
    pub test: bool,
}

impl OrderRequest {
    /// 새 주문 요청.
    pub fn new(symbol: impl Into<String>, order_type: OrderType, side: Side, amount: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            order_type,
            side,
            amount,
            price: None,
            trigger_price: None,
            cost: None,
            client_order_id: None,
            time_in_force: None,
            market_buy_requires_price: None,
            test: false,
        }
    }

    /// 시장가 매수 주문.
    pub fn market_buy(symbol: impl Into<String>, amount: Quantity) -> Self {
        Self::new(symbol, OrderType::Market, Side::Buy, amount)
    }

    /// 시장가 매도 주문.
    pub fn market_sell(symbol: impl Into<String>, amount: Quantity) -> Self {
        Self::new(symbol, OrderType::Market, Side::Sell, amount)
    }

    /// 지정가 매수 주문.
    pub fn limit_buy(symbol: impl Into<String>, amount: Quantity, price: Price) -> Self {
        Self::new(symbol, OrderType::Limit, Side::Buy, amount).with_price(price)
    }

    /// 지정가 매도 주문.
    pub fn limit_sell(symbol: impl Into<String>, amount: Quantity, price: Price) -> Self {
        Self::new(symbol, OrderType::Limit, Side::Sell, amount).with_price(price)
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_trigger_price(mut self, trigger_price: Price) -> Self {
        self.trigger_price = Some(trigger_price);
        self
    }

    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    /// 클라이언트 주문 ID를 설정합니다.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_id.into());
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    pub fn with_market_buy_requires_price(mut self, required: bool) -> Self {
        self.market_buy_requires_price = Some(required);
        self
    }

    /// 테스트 주문으로 표시합니다.
    pub fn as_test(mut self) -> Self {
        self.test = true;
        self
    }
}

/// 거래소가 반환한 주문.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// 거래소 주문 ID
    pub id: Option<String>,
    pub client_order_id: Option<String>,
    pub timestamp: Option<i64>,
    pub status: Option<OrderStatus>,
    pub symbol: String,
    /// 통합 유형 (`market` 또는 `limit`)
    pub order_type: Option<OrderType>,
    pub time_in_force: Option<TimeInForce>,
    pub side: Option<Side>,
    pub price: Option<Price>,
    /// 트리거 가격. 거래소가 "트리거 없음"을 `0`으로 보내면 `None`.
    pub trigger_price: Option<Price>,
    /// 주문 수량
    pub amount: Option<Quantity>,
    /// 누적 체결 금액
    pub cost: Option<Decimal>,
    /// 체결 수량
    pub filled: Option<Quantity>,
    /// 미체결 수량
    pub remaining: Option<Quantity>,
    /// 체결 내역 (응답에 포함된 경우)
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub info: Value,
}

impl Order {
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(iso8601)
    }

    /// `remaining`이 비어 있으면 `amount - filled`로 채웁니다.
    pub fn with_derived_remaining(mut self) -> Self {
        if self.remaining.is_none() {
            if let (Some(amount), Some(filled)) = (self.amount, self.filled) {
                self.remaining = string_sub(&amount.to_string(), &filled.to_string())
                    .and_then(|s| s.parse().ok());
            }
        }
        self
    }
}
