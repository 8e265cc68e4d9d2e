//! 통합 심볼 정의.
//!
//! 모든 거래소 커넥터는 시장을 `BASE/QUOTE` 형식의 통합 심볼로 노출합니다.
//! 거래소 고유 식별자(예: `BTCPHP`)는 `Market::id`에 따로 보관합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `BASE/QUOTE` 형식의 통합 심볼.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// 기준 자산 (예: BTC)
    pub base: String,
    /// 호가 자산 (예: PHP)
    pub quote: String,
}

impl Symbol {
    /// 새 심볼을 생성합니다. 자산 코드는 대문자로 정규화됩니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// "BASE/QUOTE" 문자열을 파싱합니다.
    ///
    /// 구분자가 정확히 하나가 아니거나 한쪽이 비어 있으면 `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let (base, quote) = s.split_once('/')?;
        if base.is_empty() || quote.is_empty() || quote.contains('/') {
            return None;
        }
        Some(Self::new(base, quote))
    }

    /// 구분자 없이 이어 붙인 형태 (예: `BTCPHP`).
    pub fn concatenated(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid symbol: {}", s))
    }
}
