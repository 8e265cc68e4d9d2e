//! 커넥터 전반에서 사용되는 공통 타입.

mod precise;
mod symbol;
mod time;
mod timeframe;

pub use precise::*;
pub use symbol::*;
pub use time::*;
pub use timeframe::*;
