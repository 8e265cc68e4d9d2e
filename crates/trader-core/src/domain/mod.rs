//! 통합 도메인 모델.
//!
//! 모든 엔티티는 파싱할 때마다 새로 만들어지는 값 객체입니다.

mod balance;
mod market;
mod market_data;
mod order;
mod precision;
mod trade;
mod transaction;

pub use balance::*;
pub use market::*;
pub use market_data::*;
pub use order::*;
pub use precision::*;
pub use trade::*;
pub use transaction::*;
