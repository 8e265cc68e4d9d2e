//! coins.ph REST 클라이언트.
//!
//! 요청 흐름: 가중치 계산 → 요청 간격 대기 → 서명 → 전송 → 에러 분류 → JSON 해석 → 도메인 변환.

use super::api::Api;
use super::config::{CoinsPhConfig, CoinsPhOptions, API_KEY_HEADER};
use super::exceptions::CLASSIFIER;
use super::parser;
use crate::error::ExchangeError;
use crate::markets::{MarketCache, MarketSnapshot};
use crate::normalize::{filter_by_since_limit, parse_order_book, safe_integer};
use crate::rate_limit::Throttler;
use crate::signer::{RequestParams, RequestSigner};
use crate::traits::{Exchange, ExchangeResult, ExchangeStatus};
use crate::transport::{HttpTransport, Transport};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, Instrument};
use trader_core::{
    exchange_span, now_millis, string_mul, Balance, Currency, DepositAddress, Market, Ohlcv, Order,
    OrderBook, OrderRequest, OrderType, Side, Ticker, Timeframe, Trade, TradingFee, Transaction,
    TransactionType, WithdrawRequest,
};

/// 기간 조회 시 한 번에 요청하는 최대 개수
const MAX_PAGE_LIMIT: u32 = 1000;

/// coins.ph 클라이언트.
///
/// 여러 태스크에서 공유할 수 있습니다 (`Arc<CoinsPhClient>`).
pub struct CoinsPhClient {
    config: CoinsPhConfig,
    signer: RequestSigner,
    throttler: Throttler,
    transport: Arc<dyn Transport>,
    markets: MarketCache,
    /// 동시 `load_markets` 호출을 하나로 직렬화
    load_lock: Mutex<()>,
}

impl std::fmt::Debug for CoinsPhClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinsPhClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CoinsPhClient {
    /// 새 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::NetworkError`를 반환합니다.
    pub fn new(config: CoinsPhConfig) -> ExchangeResult<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// 전송 계층을 지정해 생성합니다.
    pub fn with_transport(config: CoinsPhConfig, transport: Arc<dyn Transport>) -> Self {
        let signer = RequestSigner::new(config.credentials.clone(), config.recv_window, API_KEY_HEADER);
        let throttler = Throttler::new(config.throttle);
        Self {
            config,
            signer,
            throttler,
            transport,
            markets: MarketCache::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// 환경 변수에서 생성.
    pub fn from_env() -> ExchangeResult<Self> {
        Self::new(CoinsPhConfig::from_env())
    }

    pub fn config(&self) -> &CoinsPhConfig {
        &self.config
    }

    pub fn options(&self) -> &CoinsPhOptions {
        &self.config.options
    }

    /// 시장 캐시 핸들.
    pub fn markets(&self) -> &MarketCache {
        &self.markets
    }

    /// 엔드포인트 호출.
    async fn request(&self, api: Api, params: &RequestParams) -> ExchangeResult<Value> {
        let weight = api.cost().cost(params);
        self.throttler.throttle(weight).await;

        let signed = self.signer.sign(
            &self.config.base_url,
            api.path(),
            api.access(),
            api.method(),
            params,
        )?;
        debug!(method = %api.method(), path = api.path(), weight, "Sending request");

        let response = self.transport.execute(&signed).await?;
        if let Some(error) = CLASSIFIER.classify(&response.body, response.status) {
            return Err(error);
        }

        serde_json::from_str(&response.body).map_err(|e| {
            ExchangeError::BadResponse(format!("coinsph {} {}: {}", api.path(), e, response.body))
        })
    }

    /// 캐시된 시장을 찾습니다. 필요하면 먼저 시장을 로드합니다.
    async fn market(&self, symbol: &str) -> ExchangeResult<(Arc<MarketSnapshot>, Market)> {
        let snapshot = self.load_markets(false).await?;
        let market = snapshot.market(symbol)?.clone();
        Ok((snapshot, market))
    }

    async fn fetch_markets_with(&self, snapshot: &MarketSnapshot) -> ExchangeResult<Vec<Market>> {
        let response = self.request(Api::ExchangeInfo, &RequestParams::new()).await?;
        Ok(parser::parse_markets(&response, snapshot))
    }

    /// 기간 지정 캔들 조회.
    ///
    /// - `since`만: `since`부터 `limit`개 (현재 시각 이후로 넘어가지 않음)
    /// - `until`만: `until`에서 거꾸로 `limit`개
    /// - 둘 다: 지정 구간
    pub async fn fetch_ohlcv_range(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        until: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Ohlcv>> {
        let (_, market) = self.market(symbol).await?;
        let limit = limit.unwrap_or(MAX_PAGE_LIMIT).max(1);
        let span = timeframe.duration_ms().saturating_mul(i64::from(limit) - 1);

        let mut params = RequestParams::new().with("symbol", &market.id);
        match (since, until) {
            (Some(since), until) => {
                params.insert("startTime", since);
                let end = until.unwrap_or_else(|| since.saturating_add(span).min(now_millis()));
                params.insert("endTime", end);
            }
            (None, Some(until)) => {
                params.insert("startTime", until.saturating_sub(span));
                params.insert("endTime", until);
            }
            (None, None) => {}
        }
        params.insert("limit", limit);
        params.insert("interval", timeframe.as_str());

        let response = self.request(Api::Klines, &params).await?;
        Ok(filter_by_since_limit(
            parser::parse_ohlcvs(&response),
            since,
            Some(limit as usize),
            |c| c.timestamp,
        ))
    }

    /// 클라이언트 주문 ID로 주문을 조회합니다.
    pub async fn fetch_order_by_client_id(&self, client_order_id: &str) -> ExchangeResult<Order> {
        let snapshot = self.load_markets(false).await?;
        let params = RequestParams::new().with("origClientOrderId", client_order_id);
        let response = self.request(Api::QueryOrder, &params).await?;
        Ok(parser::parse_order(&response, &snapshot, None))
    }

    /// 클라이언트 주문 ID로 주문을 취소합니다.
    pub async fn cancel_order_by_client_id(&self, client_order_id: &str) -> ExchangeResult<Order> {
        let snapshot = self.load_markets(false).await?;
        let params = RequestParams::new().with("origClientOrderId", client_order_id);
        let response = self.request(Api::CancelOrder, &params).await?;
        info!(client_order_id, "Order cancelled");
        Ok(parser::parse_order(&response, &snapshot, None))
    }

    async fn my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        extra: RequestParams,
    ) -> ExchangeResult<Vec<Trade>> {
        let symbol = require_symbol(symbol, "fetchMyTrades")?;
        let (snapshot, market) = self.market(symbol).await?;

        let mut params = RequestParams::new().with("symbol", &market.id);
        if let Some(since) = since {
            params.insert("startTime", since);
            params.insert("limit", MAX_PAGE_LIMIT);
        } else {
            params.insert_opt("limit", limit);
        }

        let response = self.request(Api::MyTrades, &params.merged(&extra)).await?;
        Ok(filter_by_since_limit(
            parser::parse_trades(&response, &snapshot, Some(&market)),
            since,
            limit.map(|l| l as usize),
            |t| t.timestamp,
        ))
    }

    async fn transactions(
        &self,
        api: Api,
        tx_type: TransactionType,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Transaction>> {
        let snapshot = self.load_markets(false).await?;

        let mut params = RequestParams::new();
        if let Some(code) = code {
            params.insert("coin", snapshot.currency_id(code));
        }
        params.insert_opt("startTime", since);
        params.insert_opt("limit", limit);

        let response = self.request(api, &params).await?;
        let transactions = response
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        let mut tx = parser::parse_transaction(item, &snapshot);
                        tx.tx_type.get_or_insert(tx_type);
                        tx
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(filter_by_since_limit(
            transactions,
            since,
            limit.map(|l| l as usize),
            |t| t.timestamp,
        ))
    }

    /// 주문 요청을 와이어 파라미터로 변환합니다.
    ///
    /// 시장 정보 없이 판단할 수 있는 인자 검증은 `validate_order`에서 먼저 수행됩니다.
    fn order_params(&self, request: &OrderRequest, market: &Market) -> ExchangeResult<RequestParams> {
        let options = self.options();
        let order_type = request.order_type;

        let mut params = RequestParams::new()
            .with("symbol", &market.id)
            .with("type", order_type.to_string())
            .with("side", request.side.to_string());

        let resp_type = if order_type.is_limit_like() {
            let price = request.price.ok_or_else(|| {
                ExchangeError::ArgumentsRequired(format!(
                    "coinsph createOrder() requires a price argument for a {} order",
                    order_type
                ))
            })?;
            params.insert("price", quantized(market.price_to_precision(price), "price", price)?);
            params.insert(
                "quantity",
                quantized(market.amount_to_precision(request.amount), "amount", request.amount)?,
            );
            if order_type != OrderType::LimitMaker {
                let tif = request.time_in_force.unwrap_or(options.time_in_force);
                params.insert("timeInForce", tif.to_string());
            }
            &options.limit_order_resp_type
        } else {
            match request.side {
                Side::Sell => {
                    params.insert(
                        "quantity",
                        quantized(market.amount_to_precision(request.amount), "amount", request.amount)?,
                    );
                }
                Side::Buy => {
                    params.insert("quoteOrderQty", self.market_buy_cost(request, market)?);
                }
            }
            &options.market_order_resp_type
        };

        if order_type.is_conditional() {
            let trigger = request.trigger_price.ok_or_else(|| {
                ExchangeError::InvalidOrder(format!(
                    "coinsph createOrder() requires a triggerPrice for a {} order",
                    order_type
                ))
            })?;
            params.insert(
                "stopPrice",
                quantized(market.price_to_precision(trigger), "trigger price", trigger)?,
            );
        }

        params.insert("newOrderRespType", resp_type.as_str());
        params.insert_opt("newClientOrderId", request.client_order_id.as_deref());
        Ok(params)
    }

    /// 시장가 매수의 호가 자산 금액 (`quoteOrderQty`).
    fn market_buy_cost(&self, request: &OrderRequest, market: &Market) -> ExchangeResult<Decimal> {
        if let Some(cost) = request.cost {
            return quantized(market.cost_to_precision(cost), "cost", cost);
        }

        let requires_price = request
            .market_buy_requires_price
            .unwrap_or(self.options().market_buy_requires_price);
        if !requires_price {
            // 수량을 금액으로 해석
            return quantized(market.cost_to_precision(request.amount), "cost", request.amount);
        }

        let price = request.price.ok_or_else(|| {
            ExchangeError::InvalidOrder(
                "coinsph createOrder() requires the price argument with market buy orders to \
                 calculate total order cost (amount to spend), where cost = amount * price. \
                 Supply a price argument, or pass a cost, or disable market_buy_requires_price \
                 to supply the cost in the amount argument"
                    .into(),
            )
        })?;
        let cost = string_mul(&request.amount.to_string(), &price.to_string())
            .and_then(|c| c.parse::<Decimal>().ok())
            .ok_or_else(|| {
                ExchangeError::InvalidOrder(format!(
                    "coinsph createOrder() cost overflow: {} * {}",
                    request.amount, price
                ))
            })?;
        quantized(market.cost_to_precision(cost), "cost", cost)
    }

    /// 시장 정보 없이 확인할 수 있는 주문 인자를 검증합니다.
    fn validate_order(&self, request: &OrderRequest) -> ExchangeResult<()> {
        let order_type = request.order_type;
        if order_type.is_limit_like() && request.price.is_none() {
            return Err(ExchangeError::ArgumentsRequired(format!(
                "coinsph createOrder() requires a price argument for a {} order",
                order_type
            )));
        }
        if order_type.is_conditional() && request.trigger_price.is_none() {
            return Err(ExchangeError::InvalidOrder(format!(
                "coinsph createOrder() requires a triggerPrice for a {} order",
                order_type
            )));
        }
        Ok(())
    }
}

/// 시장 정밀도에 맞출 수 없는 값은 `InvalidOrder`.
fn quantized(result: Option<Decimal>, field: &str, value: Decimal) -> ExchangeResult<Decimal> {
    result.ok_or_else(|| {
        ExchangeError::InvalidOrder(format!(
            "coinsph createOrder() {} {} is out of range for the market precision",
            field, value
        ))
    })
}

fn require_symbol<'a>(symbol: Option<&'a str>, method: &str) -> ExchangeResult<&'a str> {
    symbol.ok_or_else(|| {
        ExchangeError::ArgumentsRequired(format!("coinsph {}() requires a symbol argument", method))
    })
}

fn require_network<'a>(network: Option<&'a str>, method: &str) -> ExchangeResult<&'a str> {
    network.ok_or_else(|| {
        ExchangeError::ArgumentsRequired(format!("coinsph {}() requires a network argument", method))
    })
}

#[async_trait]
impl Exchange for CoinsPhClient {
    fn id(&self) -> &str {
        "coinsph"
    }

    fn name(&self) -> &str {
        "Coins.ph"
    }

    async fn load_markets(&self, reload: bool) -> ExchangeResult<Arc<MarketSnapshot>> {
        if !reload {
            let snapshot = self.markets.snapshot().await;
            if snapshot.is_loaded() {
                return Ok(snapshot);
            }
        }

        let _guard = self.load_lock.lock().await;
        // 대기 중 다른 태스크가 로드했을 수 있음
        if !reload {
            let snapshot = self.markets.snapshot().await;
            if snapshot.is_loaded() {
                return Ok(snapshot);
            }
        }

        async {
            let currencies = self.fetch_currencies().await?;
            let interim = MarketSnapshot::new(Vec::new(), currencies.clone());
            let markets = self.fetch_markets_with(&interim).await?;
            info!(
                markets = markets.len(),
                currencies = currencies.len(),
                "Markets loaded"
            );
            Ok::<_, ExchangeError>(self.markets.replace(markets, currencies).await)
        }
        .instrument(exchange_span!("load_markets", self.id()))
        .await
    }

    async fn fetch_status(&self) -> ExchangeResult<ExchangeStatus> {
        let response = self.request(Api::Ping, &RequestParams::new()).await?;
        Ok(ExchangeStatus {
            status: "ok".to_string(),
            updated: None,
            info: response,
        })
    }

    async fn fetch_time(&self) -> ExchangeResult<Option<i64>> {
        let response = self.request(Api::Time, &RequestParams::new()).await?;
        Ok(safe_integer(&response, "serverTime"))
    }

    async fn fetch_markets(&self) -> ExchangeResult<Vec<Market>> {
        let snapshot = self.markets.snapshot().await;
        self.fetch_markets_with(&snapshot).await
    }

    async fn fetch_currencies(&self) -> ExchangeResult<Vec<Currency>> {
        if !self.signer.has_credentials() {
            return Ok(Vec::new());
        }
        let snapshot = self.markets.snapshot().await;
        let response = self.request(Api::ConfigGetAll, &RequestParams::new()).await?;
        Ok(response
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| parser::parse_currency(item, self.options(), &snapshot))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_ticker(&self, symbol: &str) -> ExchangeResult<Ticker> {
        let (snapshot, market) = self.market(symbol).await?;
        let params = RequestParams::new().with("symbol", &market.id);
        let response = self
            .request(self.options().ticker_endpoint.api(), &params)
            .await?;
        Ok(parser::parse_ticker(&response, &snapshot, Some(&market)))
    }

    async fn fetch_tickers(
        &self,
        symbols: Option<&[String]>,
    ) -> ExchangeResult<BTreeMap<String, Ticker>> {
        let snapshot = self.load_markets(false).await?;

        let mut params = RequestParams::new();
        if let Some(symbols) = symbols {
            let ids = symbols
                .iter()
                .map(|s| snapshot.market(s).map(|m| m.id.clone()))
                .collect::<ExchangeResult<Vec<String>>>()?;
            params.insert("symbols", ids);
        }

        let response = self
            .request(self.options().tickers_endpoint.api(), &params)
            .await?;

        let items = match &response {
            Value::Array(items) => items.clone(),
            Value::Object(_) => vec![response.clone()],
            _ => Vec::new(),
        };
        Ok(items
            .iter()
            .map(|item| parser::parse_ticker(item, &snapshot, None))
            .filter(|t| symbols.map_or(true, |s| s.contains(&t.symbol)))
            .map(|t| (t.symbol.clone(), t))
            .collect())
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> ExchangeResult<OrderBook> {
        let (_, market) = self.market(symbol).await?;
        let mut params = RequestParams::new().with("symbol", &market.id);
        params.insert_opt("limit", limit);

        let response = self.request(Api::Depth, &params).await?;
        let mut book = parse_order_book(&response, &market.symbol, None, "bids", "asks");
        book.nonce = safe_integer(&response, "lastUpdateId");
        Ok(book)
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Ohlcv>> {
        self.fetch_ohlcv_range(symbol, timeframe, since, None, limit).await
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Trade>> {
        let (snapshot, market) = self.market(symbol).await?;
        let mut params = RequestParams::new().with("symbol", &market.id);
        if since.is_some() {
            // 서버가 시작 시각을 지원하지 않아 최대 개수를 받아 거름
            params.insert("limit", MAX_PAGE_LIMIT);
        } else {
            params.insert_opt("limit", limit);
        }

        let response = self.request(Api::Trades, &params).await?;
        Ok(filter_by_since_limit(
            parser::parse_trades(&response, &snapshot, Some(&market)),
            since,
            limit.map(|l| l as usize),
            |t| t.timestamp,
        ))
    }

    async fn fetch_balance(&self) -> ExchangeResult<Balance> {
        let snapshot = self.load_markets(false).await?;
        let response = self.request(Api::Account, &RequestParams::new()).await?;
        Ok(parser::parse_balance(&response, &snapshot))
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Trade>> {
        self.my_trades(symbol, since, limit, RequestParams::new()).await
    }

    async fn fetch_order_trades(
        &self,
        id: &str,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Trade>> {
        let symbol = require_symbol(symbol, "fetchOrderTrades")?;
        let extra = RequestParams::new().with("orderId", id);
        self.my_trades(Some(symbol), since, limit, extra).await
    }

    async fn fetch_trading_fee(&self, symbol: &str) -> ExchangeResult<TradingFee> {
        let (snapshot, market) = self.market(symbol).await?;
        let params = RequestParams::new().with("symbol", &market.id);
        let response = self.request(Api::TradeFee, &params).await?;

        let first = response
            .as_array()
            .and_then(|items| items.first())
            .cloned()
            .unwrap_or(Value::Null);
        Ok(parser::parse_trading_fee(&first, &snapshot, Some(&market)))
    }

    async fn fetch_trading_fees(&self) -> ExchangeResult<BTreeMap<String, TradingFee>> {
        let snapshot = self.load_markets(false).await?;
        let response = self.request(Api::TradeFee, &RequestParams::new()).await?;
        Ok(response
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| parser::parse_trading_fee(item, &snapshot, None))
                    .map(|fee| (fee.symbol.clone(), fee))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_order(&self, request: &OrderRequest) -> ExchangeResult<Order> {
        self.validate_order(request)?;

        async {
            let (snapshot, market) = self.market(&request.symbol).await?;
            let params = self.order_params(request, &market)?;
            let api = if request.test { Api::TestOrder } else { Api::NewOrder };

            info!(
                "Placing {} {} order for {} {} @ {:?}",
                request.side, request.order_type, request.amount, request.symbol, request.price
            );
            let response = self.request(api, &params).await?;
            let order = parser::parse_order(&response, &snapshot, Some(&market));

            info!(order_id = ?order.id, test = request.test, "Order placed");
            Ok::<_, ExchangeError>(order)
        }
        .instrument(exchange_span!("create_order", self.id(), request.symbol))
        .await
    }

    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> ExchangeResult<Order> {
        let snapshot = self.load_markets(false).await?;
        let market = symbol.map(|s| snapshot.market(s)).transpose()?;
        let params = RequestParams::new().with("orderId", id);
        let response = self.request(Api::QueryOrder, &params).await?;
        Ok(parser::parse_order(&response, &snapshot, market))
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Order>> {
        let snapshot = self.load_markets(false).await?;
        let market = symbol.map(|s| snapshot.market(s)).transpose()?;

        let mut params = RequestParams::new();
        params.insert_opt("symbol", market.map(|m| m.id.as_str()));

        let response = self.request(Api::OpenOrders, &params).await?;
        Ok(filter_by_since_limit(
            parser::parse_orders(&response, &snapshot, market),
            since,
            limit.map(|l| l as usize),
            |o| o.timestamp,
        ))
    }

    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Order>> {
        let symbol = require_symbol(symbol, "fetchClosedOrders")?;
        let (snapshot, market) = self.market(symbol).await?;

        let mut params = RequestParams::new().with("symbol", &market.id);
        if let Some(since) = since {
            params.insert("startTime", since);
            params.insert("limit", MAX_PAGE_LIMIT);
        } else {
            params.insert_opt("limit", limit);
        }

        let response = self.request(Api::HistoryOrders, &params).await?;
        Ok(filter_by_since_limit(
            parser::parse_orders(&response, &snapshot, Some(&market)),
            since,
            limit.map(|l| l as usize),
            |o| o.timestamp,
        ))
    }

    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> ExchangeResult<Order> {
        let snapshot = self.load_markets(false).await?;
        let market = symbol.map(|s| snapshot.market(s)).transpose()?;
        let params = RequestParams::new().with("orderId", id);
        let response = self.request(Api::CancelOrder, &params).await?;
        info!(order_id = id, "Order cancelled");
        Ok(parser::parse_order(&response, &snapshot, market))
    }

    async fn cancel_all_orders(&self, symbol: Option<&str>) -> ExchangeResult<Vec<Order>> {
        let symbol = require_symbol(symbol, "cancelAllOrders")?;
        let (snapshot, market) = self.market(symbol).await?;
        let params = RequestParams::new().with("symbol", &market.id);
        let response = self.request(Api::CancelAllOrders, &params).await?;
        let orders = parser::parse_orders(&response, &snapshot, Some(&market));
        info!(symbol, cancelled = orders.len(), "Open orders cancelled");
        Ok(orders)
    }

    async fn withdraw(&self, request: &WithdrawRequest) -> ExchangeResult<Transaction> {
        let network = require_network(request.network.as_deref(), "withdraw")?;
        let snapshot = self.load_markets(false).await?;

        let mut params = RequestParams::new()
            .with("coin", snapshot.currency_id(&request.code))
            .with("amount", request.amount.normalize())
            .with("network", self.options().network_code_to_id(network))
            .with("address", &request.address);
        params.insert_opt("withdrawOrderId", request.tag.as_deref());

        let response = self.request(Api::WithdrawApply, &params).await?;
        let mut tx = parser::parse_transaction(&response, &snapshot);
        tx.tx_type.get_or_insert(TransactionType::Withdrawal);
        tx.currency.get_or_insert_with(|| request.code.clone());
        info!(code = %request.code, network, id = ?tx.id, "Withdrawal requested");
        Ok(tx)
    }

    async fn fetch_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> ExchangeResult<DepositAddress> {
        let network = require_network(network, "fetchDepositAddress")?;
        let snapshot = self.load_markets(false).await?;

        let params = RequestParams::new()
            .with("coin", snapshot.currency_id(code))
            .with("network", self.options().network_code_to_id(network));
        let response = self.request(Api::DepositAddress, &params).await?;
        Ok(parser::parse_deposit_address(
            &response,
            &snapshot,
            code,
            Some(network.to_uppercase()),
        ))
    }

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Transaction>> {
        self.transactions(Api::DepositHistory, TransactionType::Deposit, code, since, limit)
            .await
    }

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Transaction>> {
        self.transactions(Api::WithdrawHistory, TransactionType::Withdrawal, code, since, limit)
            .await
    }
}
