//! 입출금 기록.

use super::trade::Fee;
use crate::types::iso8601;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 입출금 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// 입금
    Deposit,
    /// 출금
    Withdrawal,
}

/// 입출금 처리 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// 처리 중
    Pending,
    /// 완료
    Ok,
    /// 실패
    Failed,
}

/// 입금 또는 출금 기록.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    /// 블록체인 트랜잭션 해시
    pub txid: Option<String>,
    pub timestamp: Option<i64>,
    pub network: Option<String>,
    pub address: Option<String>,
    /// 메모/태그. 빈 문자열은 `None`으로 정규화됩니다.
    pub tag: Option<String>,
    /// 응답만으로 구분할 수 없으면 `None`
    pub tx_type: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<TransactionStatus>,
    pub fee: Option<Fee>,
    /// 거래소 내부 이체 여부
    pub internal: Option<bool>,
    #[serde(default)]
    pub info: Value,
}

impl Transaction {
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(iso8601)
    }
}

/// 입금 주소.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub currency: String,
    pub network: Option<String>,
    pub address: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub info: Value,
}

/// 출금 요청.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// 통합 통화 코드
    pub code: String,
    pub amount: Decimal,
    pub address: String,
    /// 메모/태그
    pub tag: Option<String>,
    /// 통합 네트워크 코드 (예: `ERC20`). 필수.
    pub network: Option<String>,
}

impl WithdrawRequest {
    pub fn new(code: impl Into<String>, amount: Decimal, address: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            amount,
            address: address.into(),
            tag: None,
            network: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }
}
