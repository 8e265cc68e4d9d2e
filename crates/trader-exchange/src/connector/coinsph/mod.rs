//! coins.ph 거래소 커넥터.
//!
//! 필리핀 현물 거래소 coins.ph의 REST API 구현.
//! 공개 시세, 계좌, 주문, 입출금을 통합 모델로 제공합니다.

pub mod api;
pub mod client;
pub mod config;
pub mod exceptions;
pub mod parser;

pub use api::Api;
pub use client::CoinsPhClient;
pub use config::{CoinsPhConfig, CoinsPhOptions, TickerEndpoint, API_KEY_HEADER, DEFAULT_BASE_URL};
