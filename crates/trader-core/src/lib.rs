//! # Trader Core
//!
//! 거래소 커넥터가 공유하는 통합 도메인 모델과 기반 인프라.
//!
//! - 정밀 십진 연산 (`Precise`, `string_add`, `string_mul`, `string_eq`)
//! - 시장/통화/시세/주문/체결/입출금/잔고/호가창/캔들 통합 타입
//! - 정밀도(스텝) 양자화
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use logging::*;
pub use types::*;
