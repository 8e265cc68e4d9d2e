//! 거래소 REST 커넥터.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Exchange trait: 통합 거래소 인터페이스
//! - coins.ph 커넥터 (REST)
//! - 요청 서명 (HMAC-SHA256) 및 요청 가중치 기반 간격 제어
//! - 거래소 에러 코드/메시지 분류
//! - 응답 정규화 도우미와 시장/통화 캐시

pub mod classifier;
pub mod connector;
pub mod error;
pub mod markets;
pub mod normalize;
pub mod rate_limit;
pub mod signer;
pub mod traits;
pub mod transport;

pub use classifier::{ErrorClassifier, ErrorTable};
pub use connector::*;
pub use error::*;
pub use markets::{MarketCache, MarketSnapshot};
pub use rate_limit::{CostRules, RateLimitCost, ThrottleConfig, Throttler};
pub use signer::{Access, Credentials, HttpMethod, Param, RequestParams, RequestSigner, SignedRequest};
pub use traits::*;
pub use transport::{HttpTransport, RawResponse, Transport};
