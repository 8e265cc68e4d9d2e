//! 통합 도메인 모델 통합 테스트
//!
//! 설정 로드부터 주문 요청 구성, 정밀도 양자화, 잔고 정리까지의 흐름

use rust_decimal_macros::dec;
use serde_json::json;
use trader_core::{
    AppConfig, Balance, BalanceEntry, Market, MarketPrecision, Order, OrderRequest, OrderStatus,
    OrderType, Side, Timeframe,
};

fn btc_php() -> Market {
    let mut market = Market::unlisted("BTCPHP");
    market.symbol = "BTC/PHP".to_string();
    market.base = "BTC".to_string();
    market.quote = "PHP".to_string();
    market.precision = MarketPrecision {
        amount: Some(dec!(0.000001)),
        price: Some(dec!(0.01)),
    };
    market
}

#[test]
fn test_config_drives_exchange_settings() {
    let config = AppConfig::from_toml_str(
        r#"
        [logging]
        level = "debug"
        format = "json"

        [exchanges.coinsph]
        name = "coins.ph"
        recv_window = 10000
        "#,
    )
    .unwrap();

    let exchange = config.exchange("coinsph").unwrap();
    assert!(exchange.enabled);
    assert_eq!(exchange.recv_window, Some(10000));
    assert_eq!(exchange.rate_limit_ms, 50);
    assert_eq!(exchange.timeout_secs, 30);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_order_request_quantized_by_market() {
    let market = btc_php();
    let request = OrderRequest::limit_sell("BTC/PHP", dec!(0.12345678), dec!(3012345.678));

    assert!(request.order_type.is_limit_like());
    assert_eq!(request.side.to_string(), "SELL");
    assert_eq!(market.amount_to_precision(request.amount), Some(dec!(0.123456)));
    assert_eq!(market.price_to_precision(request.price.unwrap()), Some(dec!(3012345.68)));

    let stop = OrderRequest::new("BTC/PHP", OrderType::StopLossLimit, Side::Buy, dec!(1))
        .with_price(dec!(100))
        .with_trigger_price(dec!(99.5));
    assert!(stop.order_type.is_conditional());
    assert_eq!(stop.order_type.to_string(), "STOP_LOSS_LIMIT");
}

#[test]
fn test_order_lifecycle_values() {
    let order = Order {
        id: Some("42".to_string()),
        symbol: "BTC/PHP".to_string(),
        status: Some(OrderStatus::Open),
        amount: Some(dec!(1.5)),
        filled: Some(dec!(0.25)),
        timestamp: Some(1700000000000),
        ..Default::default()
    }
    .with_derived_remaining();

    assert_eq!(order.remaining, Some(dec!(1.25)));
    assert!(!order.status.unwrap().is_final());
    assert_eq!(order.datetime().as_deref(), Some("2023-11-14T22:13:20.000Z"));
}

#[test]
fn test_balance_finalize_fills_missing_side() {
    let mut balance = Balance::new(json!({"source": "account"}));
    balance.insert("PHP", BalanceEntry::new(Some(dec!(1000.25)), Some(dec!(0.75))));
    balance.insert("BTC", BalanceEntry::new(Some(dec!(0.5)), None));
    let balance = balance.finalize();

    assert_eq!(balance.get("PHP").unwrap().total, Some(dec!(1001)));
    assert_eq!(balance.get("BTC").unwrap().total, None);
}

#[test]
fn test_timeframe_windows() {
    let tf: Timeframe = "1h".parse().unwrap();
    assert_eq!(tf, Timeframe::H1);
    assert_eq!(tf.duration_ms() * 999, 3_596_400_000);
}
