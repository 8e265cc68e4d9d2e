//! coins.ph 응답 → 통합 도메인 모델 변환.
//!
//! 모든 파서는 순수 함수입니다. 시장/통화 해석은 호출 시점의 캐시 스냅샷을 사용합니다.

use super::config::CoinsPhOptions;
use crate::markets::MarketSnapshot;
use crate::normalize::{
    safe_bool, safe_bool2, safe_decimal, safe_decimal_at, safe_integer, safe_integer2,
    safe_integer_at, safe_list, safe_string, safe_string2, safe_string_lower,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::collections::BTreeMap;
use trader_core::{
    parse_precision, string_eq, string_mul, Balance, BalanceEntry, Currency, CurrencyType,
    DepositAddress, Fee, Market, MarketLimits, MarketPrecision, MinMax, NetworkInfo, Ohlcv, Order,
    OrderStatus, OrderType, Precise, Side, Symbol, TakerOrMaker, Ticker, Trade, TradingFee,
    Transaction, TransactionStatus, TransactionType,
};

/// 기본 메이커 수수료율
pub const MAKER_FEE: Decimal = dec!(0.0025);
/// 기본 테이커 수수료율
pub const TAKER_FEE: Decimal = dec!(0.003);

/// 응답의 시장 ID를 해석합니다.
///
/// 캐시에 있으면 캐시 시장, 없으면 호출자가 넘긴 시장, 그것도 없으면 합성 레코드.
fn resolve_market(snapshot: &MarketSnapshot, id: Option<&str>, fallback: Option<&Market>) -> Market {
    if let Some(market) = id.and_then(|id| snapshot.market_by_id(id)) {
        return market.clone();
    }
    match (fallback, id) {
        (Some(market), _) => market.clone(),
        (None, Some(id)) => Market::unlisted(id),
        (None, None) => Market::unlisted(""),
    }
}

fn array(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

// ============================================================================
// 시장 / 통화
// ============================================================================

/// `exchangeInfo`의 심볼 항목 하나를 시장으로 변환합니다.
pub fn parse_market(value: &Value, snapshot: &MarketSnapshot) -> Option<Market> {
    let id = safe_string(value, "symbol")?;
    let base_id = safe_string(value, "baseAsset").unwrap_or_default();
    let quote_id = safe_string(value, "quoteAsset").unwrap_or_default();
    let base = snapshot.safe_currency_code(&base_id);
    let quote = snapshot.safe_currency_code(&quote_id);

    let filters = safe_list(value, "filters").map(Vec::as_slice).unwrap_or(&[]);
    let lot_size = find_filter(filters, "LOT_SIZE");
    let price_filter = find_filter(filters, "PRICE_FILTER");
    let notional = find_filter(filters, "NOTIONAL");

    Some(Market {
        symbol: Symbol::new(&base, &quote).to_string(),
        id,
        base,
        quote,
        base_id,
        quote_id,
        active: Some(safe_string_lower(value, "status").as_deref() == Some("trading")),
        maker: Some(MAKER_FEE),
        taker: Some(TAKER_FEE),
        precision: MarketPrecision {
            amount: safe_decimal(lot_size, "stepSize"),
            price: safe_decimal(price_filter, "tickSize"),
        },
        limits: MarketLimits {
            amount: MinMax::new(safe_decimal(lot_size, "minQty"), safe_decimal(lot_size, "maxQty")),
            price: MinMax::new(
                safe_decimal(price_filter, "minPrice"),
                safe_decimal(price_filter, "maxPrice"),
            ),
            cost: MinMax::new(safe_decimal(notional, "minNotional"), None),
        },
        info: value.clone(),
    })
}

/// `filterType`이 일치하는 필터. 없으면 `null`이라 모든 필드가 `None`이 됩니다.
fn find_filter<'a>(filters: &'a [Value], kind: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    filters
        .iter()
        .find(|f| safe_string(f, "filterType").as_deref() == Some(kind))
        .unwrap_or(&NULL)
}

pub fn parse_markets(response: &Value, snapshot: &MarketSnapshot) -> Vec<Market> {
    safe_list(response, "symbols")
        .map(|symbols| symbols.iter().filter_map(|m| parse_market(m, snapshot)).collect())
        .unwrap_or_default()
}

/// `config/getall` 항목 하나를 통화로 변환합니다.
pub fn parse_currency(
    value: &Value,
    options: &CoinsPhOptions,
    snapshot: &MarketSnapshot,
) -> Option<Currency> {
    let id = safe_string(value, "coin")?;
    let code = snapshot.safe_currency_code(&id);
    let is_fiat = safe_bool2(value, "isLegalMoney", "legalMoney").unwrap_or(false);

    let mut networks = BTreeMap::new();
    for item in safe_list(value, "networkList").map(Vec::as_slice).unwrap_or(&[]) {
        let Some(network_id) = safe_string(item, "network") else {
            continue;
        };
        let network_code = options.network_id_to_code(&network_id);
        networks.insert(
            network_code.clone(),
            NetworkInfo {
                id: network_id,
                network: network_code,
                active: None,
                deposit: safe_bool(item, "depositEnable"),
                withdraw: safe_bool(item, "withdrawEnable"),
                fee: safe_decimal(item, "withdrawFee"),
                precision: safe_decimal(item, "withdrawIntegerMultiple"),
                withdraw_limits: MinMax::new(
                    safe_decimal(item, "withdrawMin"),
                    safe_decimal(item, "withdrawMax"),
                ),
                info: item.clone(),
            },
        );
    }

    let withdraw_limits = MinMax::new(
        networks.values().filter_map(|n| n.withdraw_limits.min).min(),
        networks.values().filter_map(|n| n.withdraw_limits.max).max(),
    );

    Some(Currency {
        id,
        code,
        name: safe_string(value, "name"),
        kind: if is_fiat { CurrencyType::Fiat } else { CurrencyType::Crypto },
        precision: safe_string(value, "transferPrecision").and_then(|p| parse_precision(&p)),
        active: None,
        deposit: safe_bool(value, "depositAllEnable"),
        withdraw: safe_bool(value, "withdrawAllEnable"),
        fee: None,
        withdraw_limits,
        networks,
        info: value.clone(),
    })
}

// ============================================================================
// 시세 / 캔들
// ============================================================================

/// 세 가지 시세 응답 형태(24시간 통계, 최종가, 최우선 호가)를 모두 처리합니다.
pub fn parse_ticker(value: &Value, snapshot: &MarketSnapshot, market: Option<&Market>) -> Ticker {
    let market_id = safe_string(value, "symbol");
    let market = resolve_market(snapshot, market_id.as_deref(), market);

    // 소수 비율 → 백분율 (정밀 곱셈)
    let percentage = safe_string(value, "priceChangePercent")
        .and_then(|p| string_mul(&p, "100"))
        .and_then(|p| p.parse().ok());
    let close = safe_string2(value, "lastPrice", "price").and_then(|c| c.parse().ok());

    Ticker {
        symbol: market.symbol,
        timestamp: safe_integer(value, "closeTime"),
        high: safe_decimal(value, "highPrice"),
        low: safe_decimal(value, "lowPrice"),
        bid: safe_decimal(value, "bidPrice"),
        bid_volume: safe_decimal(value, "bidQty"),
        ask: safe_decimal(value, "askPrice"),
        ask_volume: safe_decimal(value, "askQty"),
        vwap: safe_decimal(value, "weightedAvgPrice"),
        open: safe_decimal(value, "openPrice"),
        close,
        last: close,
        previous_close: safe_decimal(value, "prevClosePrice"),
        change: safe_decimal(value, "priceChange"),
        percentage,
        base_volume: safe_decimal(value, "volume"),
        quote_volume: safe_decimal(value, "quoteVolume"),
        info: value.clone(),
    }
}

/// `[openTime, open, high, low, close, volume, ...]`
pub fn parse_ohlcv(value: &Value) -> Ohlcv {
    Ohlcv {
        timestamp: safe_integer_at(value, 0),
        open: safe_decimal_at(value, 1),
        high: safe_decimal_at(value, 2),
        low: safe_decimal_at(value, 3),
        close: safe_decimal_at(value, 4),
        volume: safe_decimal_at(value, 5),
    }
}

pub fn parse_ohlcvs(response: &Value) -> Vec<Ohlcv> {
    array(response).iter().map(parse_ohlcv).collect()
}

// ============================================================================
// 체결
// ============================================================================

/// 공개 체결, 내 체결, 주문 응답의 `fills` 항목을 모두 처리합니다.
pub fn parse_trade(value: &Value, snapshot: &MarketSnapshot, market: Option<&Market>) -> Trade {
    let market_id = safe_string(value, "symbol");
    let market = resolve_market(snapshot, market_id.as_deref(), market);
    let order = safe_string(value, "orderId");

    let fee = safe_decimal(value, "commission").map(|cost| Fee {
        cost: Some(cost),
        currency: safe_string(value, "commissionAsset").map(|id| snapshot.safe_currency_code(&id)),
    });

    // 공개 체결은 isBuyerMaker만 제공: 값이 true이면 매수로 취급
    let side = safe_bool2(value, "isBuyer", "isBuyerMaker")
        .map(|is_buyer| if is_buyer { Side::Buy } else { Side::Sell });

    let taker_or_maker = safe_string(value, "isMaker").map(|m| {
        if m == "true" {
            TakerOrMaker::Maker
        } else {
            TakerOrMaker::Taker
        }
    });

    // 공개 체결 내역은 금액을 보고하지 않음
    let cost = if order.is_some() {
        safe_decimal(value, "quoteQty")
    } else {
        None
    };

    Trade {
        id: safe_string2(value, "id", "tradeId"),
        order,
        timestamp: safe_integer(value, "time"),
        symbol: market.symbol,
        side,
        taker_or_maker,
        price: safe_decimal(value, "price"),
        amount: safe_decimal(value, "qty"),
        cost,
        fee,
        info: value.clone(),
    }
}

pub fn parse_trades(response: &Value, snapshot: &MarketSnapshot, market: Option<&Market>) -> Vec<Trade> {
    array(response)
        .iter()
        .map(|t| parse_trade(t, snapshot, market))
        .collect()
}

// ============================================================================
// 주문
// ============================================================================

pub fn parse_order_status(status: &str) -> Option<OrderStatus> {
    match status {
        "NEW" | "PARTIALLY_FILLED" => Some(OrderStatus::Open),
        "FILLED" => Some(OrderStatus::Closed),
        "CANCELED" | "PARTIALLY_CANCELED" => Some(OrderStatus::Canceled),
        "REJECTED" => Some(OrderStatus::Rejected),
        _ => None,
    }
}

/// 와이어 주문 유형을 통합 유형(`market`/`limit`)으로 축약합니다.
pub fn parse_order_type(order_type: &str) -> Option<OrderType> {
    match order_type {
        "MARKET" | "STOP_LOSS" | "TAKE_PROFIT" => Some(OrderType::Market),
        "LIMIT" | "LIMIT_MAKER" | "STOP_LOSS_LIMIT" | "TAKE_PROFIT_LIMIT" => Some(OrderType::Limit),
        _ => None,
    }
}

pub fn parse_order(value: &Value, snapshot: &MarketSnapshot, market: Option<&Market>) -> Order {
    let market_id = safe_string(value, "symbol");
    let market = resolve_market(snapshot, market_id.as_deref(), market);

    // stopPrice "0"은 트리거 없음
    let trigger_price = safe_string(value, "stopPrice")
        .filter(|p| !string_eq(p, "0"))
        .and_then(|p| Precise::parse(&p))
        .map(|p| p.value());

    let trades = safe_list(value, "fills")
        .map(|fills| {
            fills
                .iter()
                .map(|fill| parse_trade(fill, snapshot, Some(&market)))
                .collect()
        })
        .unwrap_or_default();

    Order {
        id: safe_string(value, "orderId"),
        client_order_id: safe_string(value, "clientOrderId"),
        timestamp: safe_integer2(value, "time", "transactTime"),
        status: safe_string(value, "status").and_then(|s| parse_order_status(&s)),
        order_type: safe_string(value, "type").and_then(|t| parse_order_type(&t)),
        time_in_force: safe_string(value, "timeInForce").and_then(|t| t.parse().ok()),
        side: safe_string(value, "side").and_then(|s| s.parse().ok()),
        price: safe_decimal(value, "price"),
        trigger_price,
        amount: safe_decimal(value, "origQty"),
        cost: safe_decimal(value, "cummulativeQuoteQty"),
        filled: safe_decimal(value, "executedQty"),
        remaining: None,
        trades,
        symbol: market.symbol,
        info: value.clone(),
    }
    .with_derived_remaining()
}

pub fn parse_orders(response: &Value, snapshot: &MarketSnapshot, market: Option<&Market>) -> Vec<Order> {
    array(response)
        .iter()
        .map(|o| parse_order(o, snapshot, market))
        .collect()
}

// ============================================================================
// 계좌
// ============================================================================

pub fn parse_balance(response: &Value, snapshot: &MarketSnapshot) -> Balance {
    let mut balance = Balance::new(response.clone());
    for entry in safe_list(response, "balances").map(Vec::as_slice).unwrap_or(&[]) {
        let Some(asset) = safe_string(entry, "asset") else {
            continue;
        };
        balance.insert(
            snapshot.safe_currency_code(&asset),
            BalanceEntry::new(safe_decimal(entry, "free"), safe_decimal(entry, "locked")),
        );
    }
    balance.finalize()
}

pub fn parse_trading_fee(value: &Value, snapshot: &MarketSnapshot, market: Option<&Market>) -> TradingFee {
    let market_id = safe_string(value, "symbol");
    let market = resolve_market(snapshot, market_id.as_deref(), market);
    TradingFee {
        symbol: market.symbol,
        maker: safe_decimal(value, "makerCommission"),
        taker: safe_decimal(value, "takerCommission"),
        info: value.clone(),
    }
}

// ============================================================================
// 입출금
// ============================================================================

pub fn parse_transaction_status(status: &str) -> Option<TransactionStatus> {
    match status {
        "0" | "3" => Some(TransactionStatus::Pending),
        "1" => Some(TransactionStatus::Ok),
        "2" => Some(TransactionStatus::Failed),
        _ => None,
    }
}

pub fn parse_transaction(value: &Value, snapshot: &MarketSnapshot) -> Transaction {
    let code = safe_string(value, "coin").map(|id| snapshot.safe_currency_code(&id));

    // 빈 태그는 API 자리표시자
    let tag = safe_string(value, "addressTag").filter(|t| !t.is_empty());

    let tx_type = if safe_string(value, "withdrawOrderId").is_some() {
        Some(TransactionType::Withdrawal)
    } else if safe_string(value, "depositOrderId").is_some() {
        Some(TransactionType::Deposit)
    } else {
        None
    };

    let fee = safe_decimal(value, "transactionFee").map(|cost| Fee {
        cost: Some(cost),
        currency: code.clone(),
    });
    let network = safe_string(value, "network");

    Transaction {
        id: safe_string(value, "id"),
        txid: safe_string(value, "txId"),
        timestamp: safe_integer2(value, "insertTime", "applyTime"),
        internal: Some(network.as_deref() == Some("Internal")),
        network,
        address: safe_string(value, "address"),
        tag,
        tx_type,
        amount: safe_decimal(value, "amount"),
        currency: code,
        status: safe_string(value, "status").and_then(|s| parse_transaction_status(&s)),
        fee,
        info: value.clone(),
    }
}

pub fn parse_deposit_address(
    value: &Value,
    snapshot: &MarketSnapshot,
    fallback_code: &str,
    network: Option<String>,
) -> DepositAddress {
    DepositAddress {
        currency: safe_string(value, "coin")
            .map(|id| snapshot.safe_currency_code(&id))
            .unwrap_or_else(|| fallback_code.to_string()),
        network,
        address: safe_string(value, "address"),
        tag: safe_string(value, "addressTag"),
        info: value.clone(),
    }
}
