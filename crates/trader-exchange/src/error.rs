//! 거래소 에러 타입.
//!
//! 서버가 보고한 실패는 `ErrorClassifier`를 거쳐 아래 변형 중 하나로 매핑되고,
//! 호출 전제 조건 위반은 요청을 만들기 전에 `ArgumentsRequired`로 실패합니다.

use thiserror::Error;

/// 거래소 관련 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// 잘못된 요청 파라미터
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 인증 실패 또는 자격증명 없음
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// 요청 한도 초과
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// 거래소가 받아들이지 않는 주문
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// 해석할 수 없는 응답
    #[error("Bad response: {0}")]
    BadResponse(String),

    /// 지원되지 않는 작업
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// 분류되지 않은 거래소 에러 (원본 응답 포함)
    #[error("Exchange error: {0}")]
    Exchange(String),

    /// 알 수 없거나 거래 불가능한 심볼
    #[error("Bad symbol: {0}")]
    BadSymbol(String),

    /// 잔고 부족
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// 중복 클라이언트 주문 ID
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(String),

    /// 주문을 찾을 수 없음
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// 계정 권한 없음
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// 메이커 전용 주문이 즉시 체결될 상황
    #[error("Order immediately fillable: {0}")]
    OrderImmediatelyFillable(String),

    /// 거래소 점검/장애
    #[error("Exchange not available: {0}")]
    ExchangeNotAvailable(String),

    /// 필수 인자 누락 (네트워크 호출 전에 발생)
    #[error("Arguments required: {0}")]
    ArgumentsRequired(String),

    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// 에러 분류 태그.
///
/// 에러 테이블은 메시지 없이 분류만 보관하고, 매칭 시 메시지를 붙여 에러를 만듭니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Authentication,
    RateLimitExceeded,
    InvalidOrder,
    BadResponse,
    NotSupported,
    Exchange,
    BadSymbol,
    InsufficientFunds,
    DuplicateOrderId,
    OrderNotFound,
    PermissionDenied,
    OrderImmediatelyFillable,
    ExchangeNotAvailable,
    ArgumentsRequired,
    NetworkError,
    Timeout,
}

impl ErrorKind {
    /// 메시지를 붙여 에러를 만듭니다.
    pub fn with_message(self, message: impl Into<String>) -> ExchangeError {
        let m = message.into();
        match self {
            ErrorKind::BadRequest => ExchangeError::BadRequest(m),
            ErrorKind::Authentication => ExchangeError::Authentication(m),
            ErrorKind::RateLimitExceeded => ExchangeError::RateLimitExceeded(m),
            ErrorKind::InvalidOrder => ExchangeError::InvalidOrder(m),
            ErrorKind::BadResponse => ExchangeError::BadResponse(m),
            ErrorKind::NotSupported => ExchangeError::NotSupported(m),
            ErrorKind::Exchange => ExchangeError::Exchange(m),
            ErrorKind::BadSymbol => ExchangeError::BadSymbol(m),
            ErrorKind::InsufficientFunds => ExchangeError::InsufficientFunds(m),
            ErrorKind::DuplicateOrderId => ExchangeError::DuplicateOrderId(m),
            ErrorKind::OrderNotFound => ExchangeError::OrderNotFound(m),
            ErrorKind::PermissionDenied => ExchangeError::PermissionDenied(m),
            ErrorKind::OrderImmediatelyFillable => ExchangeError::OrderImmediatelyFillable(m),
            ErrorKind::ExchangeNotAvailable => ExchangeError::ExchangeNotAvailable(m),
            ErrorKind::ArgumentsRequired => ExchangeError::ArgumentsRequired(m),
            ErrorKind::NetworkError => ExchangeError::NetworkError(m),
            ErrorKind::Timeout => ExchangeError::Timeout(m),
        }
    }
}

impl ExchangeError {
    /// 분류 태그.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::BadRequest(_) => ErrorKind::BadRequest,
            ExchangeError::Authentication(_) => ErrorKind::Authentication,
            ExchangeError::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            ExchangeError::InvalidOrder(_) => ErrorKind::InvalidOrder,
            ExchangeError::BadResponse(_) => ErrorKind::BadResponse,
            ExchangeError::NotSupported(_) => ErrorKind::NotSupported,
            ExchangeError::Exchange(_) => ErrorKind::Exchange,
            ExchangeError::BadSymbol(_) => ErrorKind::BadSymbol,
            ExchangeError::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            ExchangeError::DuplicateOrderId(_) => ErrorKind::DuplicateOrderId,
            ExchangeError::OrderNotFound(_) => ErrorKind::OrderNotFound,
            ExchangeError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            ExchangeError::OrderImmediatelyFillable(_) => ErrorKind::OrderImmediatelyFillable,
            ExchangeError::ExchangeNotAvailable(_) => ErrorKind::ExchangeNotAvailable,
            ExchangeError::ArgumentsRequired(_) => ErrorKind::ArgumentsRequired,
            ExchangeError::NetworkError(_) => ErrorKind::NetworkError,
            ExchangeError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// 재시도 가능한 에러인지 확인.
    ///
    /// 이 계층은 재시도하지 않습니다. 재시도 정책을 가진 호출자가 참고합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::NetworkError(_)
                | ExchangeError::Timeout(_)
                | ExchangeError::RateLimitExceeded(_)
                | ExchangeError::ExchangeNotAvailable(_)
        )
    }

    /// 권장 재시도 대기 시간(밀리초) 반환.
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            ExchangeError::RateLimitExceeded(_) => Some(60_000),
            ExchangeError::ExchangeNotAvailable(_) => Some(5_000),
            ExchangeError::NetworkError(_) => Some(1_000),
            ExchangeError::Timeout(_) => Some(500),
            _ => None,
        }
    }

    /// 인증 에러인지 확인.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ExchangeError::Authentication(_) | ExchangeError::PermissionDenied(_)
        )
    }

    /// 재시도해도 결과가 같은 에러인지 확인.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExchangeError::Authentication(_)
                | ExchangeError::PermissionDenied(_)
                | ExchangeError::InsufficientFunds(_)
                | ExchangeError::InvalidOrder(_)
                | ExchangeError::BadSymbol(_)
                | ExchangeError::ArgumentsRequired(_)
        )
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_decode() {
            ExchangeError::BadResponse(err.to_string())
        } else {
            ExchangeError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::BadResponse(err.to_string())
    }
}
