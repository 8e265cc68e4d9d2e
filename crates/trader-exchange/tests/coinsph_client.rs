//! Integration tests for the coins.ph connector against a mock HTTP server.

use mockito::{Matcher, Mock, Server, ServerGuard};
use rust_decimal_macros::dec;
use trader_core::{OrderRequest, OrderStatus, Timeframe, TransactionType, WithdrawRequest};
use trader_exchange::{CoinsPhClient, CoinsPhConfig, Exchange, ExchangeError};

const EXCHANGE_INFO: &str = r#"{
    "timezone": "UTC",
    "serverTime": 1677503415200,
    "symbols": [
        {
            "symbol": "BTCPHP",
            "status": "TRADING",
            "baseAsset": "BTC",
            "baseAssetPrecision": 8,
            "quoteAsset": "PHP",
            "quoteAssetPrecision": 2,
            "orderTypes": ["LIMIT", "MARKET", "LIMIT_MAKER", "STOP_LOSS_LIMIT"],
            "filters": [
                {"minPrice": "1", "maxPrice": "100000000", "tickSize": "0.01", "filterType": "PRICE_FILTER"},
                {"minQty": "0.000001", "maxQty": "100", "stepSize": "0.000001", "filterType": "LOT_SIZE"},
                {"minNotional": "100", "filterType": "NOTIONAL"}
            ]
        },
        {
            "symbol": "ETHPHP",
            "status": "HALT",
            "baseAsset": "ETH",
            "quoteAsset": "PHP",
            "filters": []
        }
    ]
}"#;

fn public_client(server: &ServerGuard) -> CoinsPhClient {
    let config = CoinsPhConfig::public()
        .with_base_url(server.url())
        .with_rate_limit(false);
    CoinsPhClient::new(config).unwrap()
}

fn private_client(server: &ServerGuard) -> CoinsPhClient {
    let config = CoinsPhConfig::new("test-key", "test-secret")
        .with_base_url(server.url())
        .with_rate_limit(false);
    CoinsPhClient::new(config).unwrap()
}

async fn mock_exchange_info(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/openapi/v1/exchangeInfo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(EXCHANGE_INFO)
        .create_async()
        .await
}

async fn mock_currencies(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/openapi/wallet/v1/config/getall")
        .match_query(Matcher::Regex("signature=[0-9a-f]{64}$".into()))
        .match_header("X-COINS-APIKEY", "test-key")
        .with_status(200)
        .with_body(
            r#"[{"coin": "PHP", "name": "PHP", "depositAllEnable": true, "withdrawAllEnable": true,
                 "legalMoney": true, "transferPrecision": "2", "networkList": []},
                {"coin": "BTC", "name": "Bitcoin", "depositAllEnable": true, "withdrawAllEnable": true,
                 "legalMoney": false, "transferPrecision": "8",
                 "networkList": [{"network": "BTC", "depositEnable": true, "withdrawEnable": true,
                                  "withdrawFee": "0.0005", "withdrawMin": "0.001", "withdrawMax": "10"}]}]"#,
        )
        .create_async()
        .await
}

#[tokio::test]
async fn test_public_load_markets_skips_currencies() {
    let mut server = Server::new_async().await;
    let info = mock_exchange_info(&mut server).await;
    let currencies = server
        .mock("GET", Matcher::Regex("^/openapi/wallet/".into()))
        .expect(0)
        .create_async()
        .await;

    let client = public_client(&server);
    let snapshot = client.load_markets(false).await.unwrap();

    let btc = snapshot.market("BTC/PHP").unwrap();
    assert_eq!(btc.id, "BTCPHP");
    assert_eq!(btc.active, Some(true));
    assert_eq!(btc.precision.price, Some(dec!(0.01)));
    assert_eq!(snapshot.market("ETH/PHP").unwrap().active, Some(false));
    assert!(matches!(
        snapshot.market("DOGE/PHP"),
        Err(ExchangeError::BadSymbol(_))
    ));

    // 두 번째 호출은 캐시 사용
    client.load_markets(false).await.unwrap();

    info.assert_async().await;
    currencies.assert_async().await;
}

#[tokio::test]
async fn test_private_load_markets_includes_currencies() {
    let mut server = Server::new_async().await;
    let currencies = mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;

    let client = private_client(&server);
    let snapshot = client.load_markets(false).await.unwrap();

    let btc = snapshot.currency("BTC").unwrap();
    assert_eq!(btc.precision, Some(dec!(0.00000001)));
    assert_eq!(btc.networks["BTC"].fee, Some(dec!(0.0005)));
    assert_eq!(btc.withdraw_limits.max, Some(dec!(10)));
    assert!(snapshot.currency("PHP").is_some());

    currencies.assert_async().await;
}

#[tokio::test]
async fn test_fetch_currencies_without_credentials_is_empty() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/openapi/wallet/v1/config/getall")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = public_client(&server);
    assert!(client.fetch_currencies().await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_ticker() {
    let mut server = Server::new_async().await;
    mock_exchange_info(&mut server).await;
    let ticker_mock = server
        .mock("GET", "/openapi/quote/v1/ticker/24hr")
        .match_query(Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()))
        .with_status(200)
        .with_body(
            r#"{"symbol": "BTCPHP", "priceChange": "41440", "priceChangePercent": "0.0259",
                "weightedAvgPrice": "1600000", "prevClosePrice": "1600000", "lastPrice": "1642960",
                "bidPrice": "1638790", "bidQty": "0.1", "askPrice": "1647340", "askQty": "0.2",
                "openPrice": "1601520", "highPrice": "1650000", "lowPrice": "1590000",
                "volume": "12.5", "quoteVolume": "20000000", "openTime": 1677417000000,
                "closeTime": 1677503415200}"#,
        )
        .create_async()
        .await;

    let client = public_client(&server);
    let ticker = client.fetch_ticker("BTC/PHP").await.unwrap();

    assert_eq!(ticker.symbol, "BTC/PHP");
    assert_eq!(ticker.percentage.map(|p| p.to_string()).as_deref(), Some("2.59"));
    assert_eq!(ticker.last, Some(dec!(1642960)));
    assert_eq!(ticker.close, ticker.last);
    assert_eq!(ticker.spread(), Some(dec!(8550)));
    assert_eq!(ticker.timestamp, Some(1677503415200));
    ticker_mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_order_book() {
    let mut server = Server::new_async().await;
    mock_exchange_info(&mut server).await;
    server
        .mock("GET", "/openapi/quote/v1/depth")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"lastUpdateId": 1667022157000699400,
                "bids": [["1638000", "0.5"], ["1638790", "0.1"]],
                "asks": [["1650000", "1"], ["1647340", "0.2"]]}"#,
        )
        .create_async()
        .await;

    let client = public_client(&server);
    let book = client.fetch_order_book("BTC/PHP", Some(5)).await.unwrap();

    assert_eq!(book.symbol, "BTC/PHP");
    assert_eq!(book.nonce, Some(1667022157000699400));
    assert_eq!(book.best_bid().unwrap().price, dec!(1638790));
    assert_eq!(book.best_ask().unwrap().price, dec!(1647340));
}

#[tokio::test]
async fn test_fetch_ohlcv_window() {
    let mut server = Server::new_async().await;
    mock_exchange_info(&mut server).await;
    let klines = server
        .mock("GET", "/openapi/quote/v1/klines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startTime".into(), "1700000000000".into()),
            Matcher::UrlEncoded("endTime".into(), "1700000120000".into()),
            Matcher::UrlEncoded("limit".into(), "3".into()),
            Matcher::UrlEncoded("interval".into(), "1m".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[[1700000060000, "2", "3", "1", "2.5", "10", 1700000119999],
                [1700000000000, "1", "2", "0.5", "2", "5", 1700000059999]]"#,
        )
        .create_async()
        .await;

    let client = public_client(&server);
    let candles = client
        .fetch_ohlcv("BTC/PHP", Timeframe::M1, Some(1700000000000), Some(3))
        .await
        .unwrap();

    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].timestamp, Some(1700000000000));
    assert_eq!(candles[1].close, Some(dec!(2.5)));
    klines.assert_async().await;
}

#[tokio::test]
async fn test_create_limit_order_is_signed() {
    let mut server = Server::new_async().await;
    mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;
    let order_mock = server
        .mock("POST", "/openapi/v1/order")
        .match_header("X-COINS-APIKEY", "test-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()),
            Matcher::UrlEncoded("type".into(), "LIMIT".into()),
            Matcher::UrlEncoded("side".into(), "BUY".into()),
            Matcher::UrlEncoded("price".into(), "2500000".into()),
            Matcher::UrlEncoded("quantity".into(), "0.001".into()),
            Matcher::UrlEncoded("timeInForce".into(), "GTC".into()),
            Matcher::UrlEncoded("newClientOrderId".into(), "my-order-1".into()),
            Matcher::Regex("timestamp=\\d+".into()),
            Matcher::Regex("signature=[0-9a-f]{64}$".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"symbol": "BTCPHP", "orderId": "1138", "clientOrderId": "my-order-1",
                "transactTime": 1700000000000, "price": "2500000", "origQty": "0.001",
                "executedQty": "0", "cummulativeQuoteQty": "0", "status": "NEW",
                "timeInForce": "GTC", "type": "LIMIT", "side": "BUY", "stopPrice": "0", "fills": []}"#,
        )
        .create_async()
        .await;

    let client = private_client(&server);
    let request = OrderRequest::limit_buy("BTC/PHP", dec!(0.0010004), dec!(2500000.001))
        .with_client_id("my-order-1");
    let order = client.create_order(&request).await.unwrap();

    assert_eq!(order.id.as_deref(), Some("1138"));
    assert_eq!(order.symbol, "BTC/PHP");
    assert_eq!(order.status, Some(OrderStatus::Open));
    assert_eq!(order.trigger_price, None);
    assert_eq!(order.remaining, Some(dec!(0.001)));
    order_mock.assert_async().await;
}

#[tokio::test]
async fn test_error_envelope_is_classified() {
    let mut server = Server::new_async().await;
    mock_exchange_info(&mut server).await;
    server
        .mock("GET", "/openapi/quote/v1/depth")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code": -1121, "msg": "Invalid symbol."}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/openapi/quote/v1/trades")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("Too many requests")
        .create_async()
        .await;

    let client = public_client(&server);

    let err = client.fetch_order_book("BTC/PHP", None).await.unwrap_err();
    assert!(matches!(err, ExchangeError::BadSymbol(_)));
    assert!(err.to_string().contains("Invalid symbol."));

    let err = client.fetch_trades("BTC/PHP", None, None).await.unwrap_err();
    assert!(matches!(err, ExchangeError::RateLimitExceeded(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unknown_symbol_is_rejected_locally() {
    let mut server = Server::new_async().await;
    mock_exchange_info(&mut server).await;
    let ticker_mock = server
        .mock("GET", "/openapi/quote/v1/ticker/24hr")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = public_client(&server);
    let err = client.fetch_ticker("DOGE/PHP").await.unwrap_err();
    assert!(matches!(err, ExchangeError::BadSymbol(_)));
    ticker_mock.assert_async().await;
}

#[tokio::test]
async fn test_withdraw_requires_network_before_any_request() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = private_client(&server);
    let request = WithdrawRequest::new("BTC", dec!(0.01), "bc1qaddress");
    let err = client.withdraw(&request).await.unwrap_err();

    assert!(matches!(err, ExchangeError::ArgumentsRequired(_)));
    any.assert_async().await;
}

#[tokio::test]
async fn test_private_call_without_credentials_fails() {
    let mut server = Server::new_async().await;
    mock_exchange_info(&mut server).await;

    let client = public_client(&server);
    let err = client.fetch_balance().await.unwrap_err();
    assert!(matches!(err, ExchangeError::Authentication(_)));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_fetch_deposits_fills_type() {
    let mut server = Server::new_async().await;
    mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;
    server
        .mock("GET", "/openapi/wallet/v1/deposit/history")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("coin".into(), "BTC".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[{"id": "d2", "amount": "0.2", "coin": "BTC", "network": "BTC", "status": "0",
                 "address": "bc1q", "addressTag": "", "txId": "tx2", "insertTime": 1700000100000},
                {"id": "d1", "amount": "0.1", "coin": "BTC", "network": "BTC", "status": "1",
                 "address": "bc1q", "addressTag": "", "txId": "tx1", "insertTime": 1700000000000}]"#,
        )
        .create_async()
        .await;

    let client = private_client(&server);
    let deposits = client.fetch_deposits(Some("BTC"), None, Some(10)).await.unwrap();

    assert_eq!(deposits.len(), 2);
    assert_eq!(deposits[0].id.as_deref(), Some("d1"));
    assert!(deposits
        .iter()
        .all(|d| d.tx_type == Some(TransactionType::Deposit)));
    assert_eq!(deposits[0].tag, None);
    assert_eq!(deposits[1].currency.as_deref(), Some("BTC"));
}

fn order_json(id: &str, client_id: &str, status: &str, time: i64) -> String {
    format!(
        r#"{{"symbol": "BTCPHP", "orderId": "{}", "clientOrderId": "{}", "price": "2500000",
            "origQty": "0.01", "executedQty": "0", "cummulativeQuoteQty": "0", "status": "{}",
            "timeInForce": "GTC", "type": "LIMIT", "side": "BUY", "stopPrice": "0", "time": {}}}"#,
        id, client_id, status, time
    )
}

#[tokio::test]
async fn test_fetch_tickers_sends_symbol_list() {
    let mut server = Server::new_async().await;
    mock_exchange_info(&mut server).await;
    let tickers_mock = server
        .mock("GET", "/openapi/quote/v1/ticker/24hr")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("^symbols=%5B.*%5D$".into()),
            Matcher::UrlEncoded("symbols".into(), r#"["BTCPHP"]"#.into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[{"symbol": "BTCPHP", "lastPrice": "1642960", "closeTime": 1677503415200},
                {"symbol": "ETHPHP", "lastPrice": "98000", "closeTime": 1677503415200}]"#,
        )
        .create_async()
        .await;

    let client = public_client(&server);
    let symbols = vec!["BTC/PHP".to_string()];
    let tickers = client.fetch_tickers(Some(symbols.as_slice())).await.unwrap();

    assert_eq!(tickers.keys().collect::<Vec<_>>(), vec!["BTC/PHP"]);
    assert_eq!(tickers["BTC/PHP"].last, Some(dec!(1642960)));
    tickers_mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_closed_orders_since_uses_page_limit() {
    let mut server = Server::new_async().await;
    mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;
    let history = server
        .mock("GET", "/openapi/v1/historyOrders")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()),
            Matcher::UrlEncoded("startTime".into(), "1700000000000".into()),
            Matcher::UrlEncoded("limit".into(), "1000".into()),
            Matcher::Regex("signature=[0-9a-f]{64}$".into()),
        ]))
        .with_status(200)
        .with_body(format!(
            "[{}, {}, {}]",
            order_json("3", "c3", "FILLED", 1700000300000),
            order_json("1", "c1", "CANCELED", 1700000100000),
            order_json("2", "c2", "FILLED", 1700000200000)
        ))
        .create_async()
        .await;

    let client = private_client(&server);
    let orders = client
        .fetch_closed_orders(Some("BTC/PHP"), Some(1700000000000), Some(2))
        .await
        .unwrap();

    let ids: Vec<_> = orders.iter().filter_map(|o| o.id.as_deref()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(orders[0].status, Some(OrderStatus::Canceled));
    history.assert_async().await;

    let err = client.fetch_closed_orders(None, None, None).await.unwrap_err();
    assert!(matches!(err, ExchangeError::ArgumentsRequired(_)));
}

#[tokio::test]
async fn test_fetch_open_orders_limit_keeps_latest() {
    let mut server = Server::new_async().await;
    mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;
    server
        .mock("GET", "/openapi/v1/openOrders")
        .match_query(Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()))
        .with_status(200)
        .with_body(format!(
            "[{}, {}, {}]",
            order_json("1", "c1", "NEW", 1700000100000),
            order_json("2", "c2", "NEW", 1700000200000),
            order_json("3", "c3", "PARTIALLY_FILLED", 1700000300000)
        ))
        .create_async()
        .await;

    let client = private_client(&server);
    let orders = client
        .fetch_open_orders(Some("BTC/PHP"), None, Some(1))
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id.as_deref(), Some("3"));
    assert_eq!(orders[0].status, Some(OrderStatus::Open));
}

#[tokio::test]
async fn test_fetch_my_trades_and_order_trades() {
    let mut server = Server::new_async().await;
    mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;
    let trades_body = r#"[{"symbol": "BTCPHP", "id": "t2", "orderId": "1138", "price": "2500000",
                           "qty": "0.002", "quoteQty": "5000", "commission": "10",
                           "commissionAsset": "PHP", "time": 1700000200000, "isBuyer": true,
                           "isMaker": false},
                          {"symbol": "BTCPHP", "id": "t1", "orderId": "1138", "price": "2400000",
                           "qty": "0.001", "quoteQty": "2400", "commission": "4.8",
                           "commissionAsset": "PHP", "time": 1700000100000, "isBuyer": true,
                           "isMaker": true}]"#;
    let since_mock = server
        .mock("GET", "/openapi/v1/myTrades")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()),
            Matcher::UrlEncoded("startTime".into(), "1700000000000".into()),
            Matcher::UrlEncoded("limit".into(), "1000".into()),
        ]))
        .with_status(200)
        .with_body(trades_body)
        .create_async()
        .await;
    let order_mock = server
        .mock("GET", "/openapi/v1/myTrades")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()),
            Matcher::UrlEncoded("orderId".into(), "1138".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(trades_body)
        .create_async()
        .await;

    let client = private_client(&server);

    let trades = client
        .fetch_my_trades(Some("BTC/PHP"), Some(1700000000000), Some(1))
        .await
        .unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].id.as_deref(), Some("t1"));
    assert_eq!(trades[0].cost, Some(dec!(2400)));
    assert_eq!(
        trades[0].fee.as_ref().and_then(|f| f.currency.as_deref()),
        Some("PHP")
    );
    since_mock.assert_async().await;

    let trades = client
        .fetch_order_trades("1138", Some("BTC/PHP"), None, Some(5))
        .await
        .unwrap();
    assert_eq!(trades.len(), 2);
    assert!(trades.iter().all(|t| t.order.as_deref() == Some("1138")));
    order_mock.assert_async().await;

    let err = client
        .fetch_order_trades("1138", None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::ArgumentsRequired(_)));
}

#[tokio::test]
async fn test_cancel_all_orders() {
    let mut server = Server::new_async().await;
    mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;
    let cancel_mock = server
        .mock("DELETE", "/openapi/v1/openOrders")
        .match_header("X-COINS-APIKEY", "test-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCPHP".into()),
            Matcher::Regex("signature=[0-9a-f]{64}$".into()),
        ]))
        .with_status(200)
        .with_body(format!(
            "[{}, {}]",
            order_json("1", "c1", "CANCELED", 1700000100000),
            order_json("2", "c2", "CANCELED", 1700000200000)
        ))
        .create_async()
        .await;

    let client = private_client(&server);
    let orders = client.cancel_all_orders(Some("BTC/PHP")).await.unwrap();

    assert_eq!(orders.len(), 2);
    assert!(orders
        .iter()
        .all(|o| o.status == Some(OrderStatus::Canceled) && o.symbol == "BTC/PHP"));
    cancel_mock.assert_async().await;

    let err = client.cancel_all_orders(None).await.unwrap_err();
    assert!(matches!(err, ExchangeError::ArgumentsRequired(_)));
}

#[tokio::test]
async fn test_orders_by_client_id() {
    let mut server = Server::new_async().await;
    mock_currencies(&mut server).await;
    mock_exchange_info(&mut server).await;
    let query = server
        .mock("GET", "/openapi/v1/order")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("origClientOrderId".into(), "my-order-1".into()),
            Matcher::Regex("signature=[0-9a-f]{64}$".into()),
        ]))
        .with_status(200)
        .with_body(order_json("1138", "my-order-1", "NEW", 1700000000000))
        .create_async()
        .await;
    let cancel = server
        .mock("DELETE", "/openapi/v1/order")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("origClientOrderId".into(), "my-order-1".into()),
            Matcher::Regex("signature=[0-9a-f]{64}$".into()),
        ]))
        .with_status(200)
        .with_body(order_json("1138", "my-order-1", "CANCELED", 1700000000000))
        .create_async()
        .await;

    let client = private_client(&server);

    let order = client.fetch_order_by_client_id("my-order-1").await.unwrap();
    assert_eq!(order.id.as_deref(), Some("1138"));
    assert_eq!(order.symbol, "BTC/PHP");
    assert_eq!(order.status, Some(OrderStatus::Open));

    let cancelled = client.cancel_order_by_client_id("my-order-1").await.unwrap();
    assert_eq!(cancelled.client_order_id.as_deref(), Some("my-order-1"));
    assert_eq!(cancelled.status, Some(OrderStatus::Canceled));

    query.assert_async().await;
    cancel.assert_async().await;
}
