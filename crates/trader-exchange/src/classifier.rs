//! 서버 에러 응답 분류.
//!
//! 응답 봉투의 `code`가 성공 코드가 아니면 다음 순서로 에러를 결정합니다.
//! 1. 응답 본문 전체에 대한 부분 문자열 매칭 (테이블 순서)
//! 2. 코드 정확 매칭
//! 3. 일반 `Exchange` 에러 (거래소 ID와 원본 본문 포함)
//!
//! 봉투에 코드가 없고 HTTP 상태가 실패이면 상태 코드를 코드로 사용하며,
//! 두 테이블에 모두 없을 때는 상태 코드별 기본 분류를 따릅니다.

use crate::error::{ErrorKind, ExchangeError};
use crate::normalize::safe_string;
use serde_json::Value;
use tracing::warn;

/// 분류 테이블 항목.
pub type ErrorTable = &'static [(&'static str, ErrorKind)];

/// 거래소별 에러 분류기.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier {
    exchange_id: &'static str,
    exact: ErrorTable,
    broad: ErrorTable,
    success_codes: &'static [&'static str],
}

impl ErrorClassifier {
    pub const fn new(exchange_id: &'static str, exact: ErrorTable, broad: ErrorTable) -> Self {
        Self {
            exchange_id,
            exact,
            broad,
            success_codes: &["200", "0"],
        }
    }

    /// 응답을 분류합니다. 성공 응답이면 `None`.
    pub fn classify(&self, body: &str, http_status: u16) -> Option<ExchangeError> {
        let envelope_code = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| safe_string(&v, "code"));

        let (code, from_status) = match envelope_code {
            Some(code) => (code, false),
            None if http_status >= 400 => (http_status.to_string(), true),
            None => return None,
        };

        if self.success_codes.contains(&code.as_str()) {
            return None;
        }

        let feedback = format!("{} {}", self.exchange_id, body);
        let error = self
            .broad
            .iter()
            .find(|(needle, _)| body.contains(needle))
            .or_else(|| self.exact.iter().find(|(exact, _)| *exact == code))
            .map(|(_, kind)| kind.with_message(feedback.clone()))
            .unwrap_or_else(|| {
                if from_status {
                    status_error(http_status, feedback)
                } else {
                    ExchangeError::Exchange(feedback)
                }
            });

        warn!(exchange = self.exchange_id, code = %code, http_status, error = %error, "Exchange returned error");
        Some(error)
    }
}

/// 테이블에 없는 HTTP 실패 상태의 기본 분류.
fn status_error(status: u16, message: String) -> ExchangeError {
    match status {
        401 => ExchangeError::Authentication(message),
        403 => ExchangeError::PermissionDenied(message),
        418 | 429 => ExchangeError::RateLimitExceeded(message),
        500..=599 => ExchangeError::ExchangeNotAvailable(message),
        _ => ExchangeError::Exchange(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXACT: ErrorTable = &[
        ("-1121", ErrorKind::BadSymbol),
        ("-2013", ErrorKind::OrderNotFound),
        ("403", ErrorKind::ExchangeNotAvailable),
    ];
    const BROAD: ErrorTable = &[
        ("Unknown order sent", ErrorKind::OrderNotFound),
        ("Market is closed", ErrorKind::BadSymbol),
    ];

    fn classifier() -> ErrorClassifier {
        ErrorClassifier::new("testex", EXACT, BROAD)
    }

    #[test]
    fn test_success_codes_are_not_errors() {
        let c = classifier();
        assert!(c.classify(r#"{"code":"200","msg":"ok"}"#, 200).is_none());
        assert!(c.classify(r#"{"code":0}"#, 200).is_none());
        assert!(c.classify(r#"{"symbol":"BTCPHP"}"#, 200).is_none());
        assert!(c.classify("[]", 200).is_none());
    }

    #[test]
    fn test_exact_code_match() {
        let err = classifier()
            .classify(r#"{"code":"-1121","msg":"Invalid symbol."}"#, 400)
            .unwrap();
        assert!(matches!(err, ExchangeError::BadSymbol(_)));

        let numeric = classifier().classify(r#"{"code":-1121,"msg":"x"}"#, 400).unwrap();
        assert!(matches!(numeric, ExchangeError::BadSymbol(_)));
    }

    #[test]
    fn test_broad_match_takes_precedence() {
        // 코드는 BadSymbol이지만 메시지 매칭이 먼저
        let err = classifier()
            .classify(r#"{"code":"-1121","msg":"Unknown order sent."}"#, 400)
            .unwrap();
        assert!(matches!(err, ExchangeError::OrderNotFound(_)));

        let unmapped = classifier()
            .classify(r#"{"code":"-9999","msg":"Unknown order sent."}"#, 400)
            .unwrap();
        assert!(matches!(unmapped, ExchangeError::OrderNotFound(_)));
    }

    #[test]
    fn test_generic_fallback_carries_body() {
        let body = r#"{"code":"-9999","msg":"strange"}"#;
        let err = classifier().classify(body, 400).unwrap();
        assert_eq!(err, ExchangeError::Exchange(format!("testex {}", body)));
    }

    #[test]
    fn test_http_status_used_without_envelope_code() {
        let c = classifier();
        assert!(matches!(
            c.classify("Forbidden", 403),
            Some(ExchangeError::ExchangeNotAvailable(_))
        ));
        assert!(matches!(
            c.classify("Too Many Requests", 429),
            Some(ExchangeError::RateLimitExceeded(_))
        ));
        assert!(matches!(
            c.classify("<html>bad gateway</html>", 502),
            Some(ExchangeError::ExchangeNotAvailable(_))
        ));
        assert!(matches!(c.classify("", 401), Some(ExchangeError::Authentication(_))));
        assert!(matches!(c.classify("nope", 404), Some(ExchangeError::Exchange(_))));
    }
}
