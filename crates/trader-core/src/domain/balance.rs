//! 계좌 잔고.
//!
//! 통화 코드별 `free`(사용 가능)와 `used`(주문 등에 묶임)를 보관하고,
//! `total`은 `finalize`에서 정밀 십진 연산으로 계산합니다.

use crate::types::{iso8601, string_add, string_sub};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 단일 통화 잔고.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub free: Option<Decimal>,
    pub used: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl BalanceEntry {
    pub fn new(free: Option<Decimal>, used: Option<Decimal>) -> Self {
        Self {
            free,
            used,
            total: None,
        }
    }

    /// 세 값 중 빠진 하나를 나머지 둘로 채웁니다.
    fn complete(&mut self) {
        let text = |d: Option<Decimal>| d.map(|v| v.to_string());
        let parse = |s: Option<String>| s.and_then(|v| v.parse::<Decimal>().ok());

        match (text(self.free), text(self.used), text(self.total)) {
            (Some(free), Some(used), None) => self.total = parse(string_add(&free, &used)),
            (Some(free), None, Some(total)) => self.used = parse(string_sub(&total, &free)),
            (None, Some(used), Some(total)) => self.free = parse(string_sub(&total, &used)),
            _ => {}
        }
    }
}

/// 계좌 전체 잔고.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// 통화 코드 → 잔고
    pub entries: BTreeMap<String, BalanceEntry>,
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub info: Value,
}

impl Balance {
    pub fn new(info: Value) -> Self {
        Self {
            info,
            ..Default::default()
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, entry: BalanceEntry) {
        self.entries.insert(code.into(), entry);
    }

    pub fn get(&self, code: &str) -> Option<&BalanceEntry> {
        self.entries.get(code)
    }

    /// 모든 항목의 free/used/total을 서로 일관되게 맞춥니다.
    pub fn finalize(mut self) -> Self {
        for entry in self.entries.values_mut() {
            entry.complete();
        }
        self
    }

    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(iso8601)
    }
}
