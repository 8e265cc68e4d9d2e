//! 엔드포인트 가중치 계산과 토큰 버킷 기반 요청 간격 제어.
//!
//! 각 엔드포인트는 고정 가중치 또는 요청 파라미터에 따라 달라지는 규칙을 가집니다.
//! 계산된 가중치만큼 버킷에서 토큰을 차감하고, 부족하면 `부족분 × 기본 간격`만큼 대기합니다.

use crate::signer::{Param, RequestParams};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// 파라미터에 따라 달라지는 가중치 규칙.
///
/// 임계값 테이블은 내림차순으로 작성되어야 합니다. 정렬하지 않고 처음 일치하는 항목을 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostRules {
    /// 기본 가중치 (없으면 1)
    pub cost: Option<u32>,
    /// `symbol`이 없을 때
    pub no_symbol: Option<u32>,
    /// `symbol`과 `symbols`가 모두 없을 때
    pub no_symbol_and_no_symbols: Option<u32>,
    /// `symbols` 개수별 `(임계값, 가중치)`
    pub by_number_of_symbols: Option<&'static [(i64, u32)]>,
    /// `limit` 값별 `(임계값, 가중치)`
    pub by_limit: Option<&'static [(i64, u32)]>,
}

/// 엔드포인트 가중치.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitCost {
    /// 고정 가중치
    Flat(u32),
    /// 규칙 기반 가중치
    Rules(CostRules),
}

impl RateLimitCost {
    /// 요청 파라미터에 대한 가중치를 계산합니다.
    pub fn cost(&self, params: &RequestParams) -> u32 {
        let rules = match self {
            RateLimitCost::Flat(cost) => return *cost,
            RateLimitCost::Rules(rules) => rules,
        };

        let has_symbol = params.contains("symbol");
        let has_symbols = params.contains("symbols");

        if let (Some(cost), false) = (rules.no_symbol, has_symbol) {
            return cost;
        }
        if let (Some(cost), false, false) = (rules.no_symbol_and_no_symbols, has_symbol, has_symbols) {
            return cost;
        }

        if let (Some(table), Some(symbols)) = (rules.by_number_of_symbols, params.get("symbols")) {
            // 이 분기에 들어오면 일치하지 않아도 byLimit을 보지 않음
            let count = symbol_count(symbols);
            if let Some(cost) = scan_descending(table, count) {
                return cost;
            }
        } else if let (Some(table), Some(limit)) = (rules.by_limit, params.get("limit")) {
            if let Some(cost) = limit.as_i64().and_then(|l| scan_descending(table, l)) {
                return cost;
            }
        }

        rules.cost.unwrap_or(1)
    }
}

fn symbol_count(symbols: &Param) -> i64 {
    match symbols {
        Param::List(items) => items.len() as i64,
        Param::Text(s) => s.split(',').filter(|p| !p.is_empty()).count() as i64,
        _ => 1,
    }
}

fn scan_descending(table: &[(i64, u32)], value: i64) -> Option<u32> {
    table
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, cost)| *cost)
}

/// 요청 간격 제어 설정.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleConfig {
    /// 가중치 1당 간격 (밀리초)
    pub base_interval_ms: u64,
    /// 버킷 용량 (토큰)
    pub capacity: f64,
    /// 비활성화 시 대기 없음
    pub enabled: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 50,
            capacity: 1.0,
            enabled: true,
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// 토큰 버킷 기반 요청 간격 제어기.
///
/// 토큰은 음수가 될 수 있으며, 음수 잔고는 앞선 호출이 이미 예약한 대기 시간입니다.
#[derive(Debug, Clone)]
pub struct Throttler {
    config: ThrottleConfig,
    bucket: Arc<Mutex<Bucket>>,
}

impl Throttler {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: config.capacity,
                last_refill: Instant::now(),
            })),
            config,
        }
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    /// 가중치만큼 토큰을 차감하고 필요하면 대기합니다.
    pub async fn throttle(&self, weight: u32) {
        if !self.config.enabled || self.config.base_interval_ms == 0 {
            return;
        }

        let wait = {
            let mut bucket = self.bucket.lock().await;
            self.refill(&mut bucket);
            bucket.tokens -= f64::from(weight);
            if bucket.tokens < 0.0 {
                let millis = -bucket.tokens * self.config.base_interval_ms as f64;
                Duration::from_micros((millis * 1000.0).round() as u64)
            } else {
                Duration::ZERO
            }
        };

        if !wait.is_zero() {
            trace!(weight, wait_ms = wait.as_millis() as u64, "Throttling request");
            tokio::time::sleep(wait).await;
        }
    }

    /// 현재 토큰 잔량.
    pub async fn available(&self) -> f64 {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket);
        bucket.tokens
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(bucket.last_refill).as_micros() as f64 / 1000.0;
        let refilled = elapsed_ms / self.config.base_interval_ms as f64;
        bucket.tokens = (bucket.tokens + refilled).min(self.config.capacity);
        bucket.last_refill = now;
    }
}
