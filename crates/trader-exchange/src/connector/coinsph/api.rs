//! coins.ph REST 엔드포인트.

use crate::rate_limit::{CostRules, RateLimitCost};
use crate::signer::{Access, HttpMethod};

/// coins.ph REST 엔드포인트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    // 공개
    Ping,
    Time,
    Ticker24hr,
    TickerPrice,
    BookTicker,
    ExchangeInfo,
    Depth,
    Klines,
    Trades,
    // 지갑
    ConfigGetAll,
    DepositAddress,
    DepositHistory,
    WithdrawHistory,
    WithdrawApply,
    // 거래
    Account,
    OpenOrders,
    TradeFee,
    QueryOrder,
    HistoryOrders,
    MyTrades,
    TestOrder,
    NewOrder,
    CancelOrder,
    CancelAllOrders,
}

impl Api {
    pub fn method(&self) -> HttpMethod {
        match self {
            Api::WithdrawApply | Api::TestOrder | Api::NewOrder => HttpMethod::Post,
            Api::CancelOrder | Api::CancelAllOrders => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Api::Ping => "openapi/v1/ping",
            Api::Time => "openapi/v1/time",
            Api::Ticker24hr => "openapi/quote/v1/ticker/24hr",
            Api::TickerPrice => "openapi/quote/v1/ticker/price",
            Api::BookTicker => "openapi/quote/v1/ticker/bookTicker",
            Api::ExchangeInfo => "openapi/v1/exchangeInfo",
            Api::Depth => "openapi/quote/v1/depth",
            Api::Klines => "openapi/quote/v1/klines",
            Api::Trades => "openapi/quote/v1/trades",
            Api::ConfigGetAll => "openapi/wallet/v1/config/getall",
            Api::DepositAddress => "openapi/wallet/v1/deposit/address",
            Api::DepositHistory => "openapi/wallet/v1/deposit/history",
            Api::WithdrawHistory => "openapi/wallet/v1/withdraw/history",
            Api::WithdrawApply => "openapi/wallet/v1/withdraw/apply",
            Api::Account => "openapi/v1/account",
            Api::OpenOrders | Api::CancelAllOrders => "openapi/v1/openOrders",
            Api::TradeFee => "openapi/v1/asset/tradeFee",
            Api::QueryOrder | Api::NewOrder | Api::CancelOrder => "openapi/v1/order",
            Api::HistoryOrders => "openapi/v1/historyOrders",
            Api::MyTrades => "openapi/v1/myTrades",
            Api::TestOrder => "openapi/v1/order/test",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Api::Ping
            | Api::Time
            | Api::Ticker24hr
            | Api::TickerPrice
            | Api::BookTicker
            | Api::ExchangeInfo
            | Api::Depth
            | Api::Klines
            | Api::Trades => Access::Public,
            _ => Access::Private,
        }
    }

    /// 요청 가중치 규칙.
    pub fn cost(&self) -> RateLimitCost {
        match self {
            Api::Ticker24hr => RateLimitCost::Rules(CostRules {
                cost: Some(1),
                no_symbol_and_no_symbols: Some(40),
                by_number_of_symbols: Some(&[(101, 40), (21, 20), (0, 1)]),
                no_symbol: None,
                by_limit: None,
            }),
            Api::TickerPrice | Api::BookTicker => RateLimitCost::Rules(CostRules {
                cost: Some(1),
                no_symbol: Some(2),
                ..CostRules::default()
            }),
            Api::Depth => RateLimitCost::Rules(CostRules {
                cost: Some(1),
                by_limit: Some(&[(101, 5), (0, 1)]),
                ..CostRules::default()
            }),
            Api::OpenOrders => RateLimitCost::Rules(CostRules {
                cost: Some(3),
                no_symbol: Some(40),
                ..CostRules::default()
            }),
            Api::HistoryOrders => RateLimitCost::Rules(CostRules {
                cost: Some(10),
                no_symbol: Some(40),
                ..CostRules::default()
            }),
            Api::ExchangeInfo
            | Api::ConfigGetAll
            | Api::DepositAddress
            | Api::Account
            | Api::MyTrades => RateLimitCost::Flat(10),
            Api::QueryOrder => RateLimitCost::Flat(2),
            Api::WithdrawApply => RateLimitCost::Flat(600),
            Api::Ping
            | Api::Time
            | Api::Klines
            | Api::Trades
            | Api::DepositHistory
            | Api::WithdrawHistory
            | Api::TradeFee
            | Api::TestOrder
            | Api::NewOrder
            | Api::CancelOrder
            | Api::CancelAllOrders => RateLimitCost::Flat(1),
        }
    }
}
