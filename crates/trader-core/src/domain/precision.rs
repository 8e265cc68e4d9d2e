//! 정밀도(스텝 크기) 양자화.
//!
//! 주문 제출 전 수량과 가격은 시장 정밀도 스텝에 맞춰야 합니다.
//! 수량과 금액은 버림, 가격은 반올림합니다.

use super::market::Market;
use rust_decimal::{Decimal, RoundingStrategy};

/// 스텝 라운딩 방법
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMethod {
    /// 반올림 (0.5는 0에서 먼 쪽으로)
    Round,
    /// 내림
    Floor,
    /// 올림
    Ceil,
    /// 0 방향 버림
    Truncate,
}

/// 값의 스텝 크기를 제공하는 trait.
pub trait TickSizeProvider: Send + Sync {
    /// 주어진 값에 대한 스텝 크기. `None`이면 양자화하지 않습니다.
    fn tick_size(&self, value: Decimal) -> Option<Decimal>;

    /// 값을 스텝 크기 배수로 맞춥니다.
    ///
    /// 스텝 개수나 결과가 표현 범위를 넘으면 `None`.
    fn round_to_tick(&self, value: Decimal, method: RoundMethod) -> Option<Decimal> {
        let tick = match self.tick_size(value) {
            Some(tick) if !tick.is_zero() => tick,
            _ => return Some(value),
        };

        let ticks = value.checked_div(tick)?;
        let rounded_ticks = match method {
            RoundMethod::Round => ticks.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            RoundMethod::Floor => ticks.floor(),
            RoundMethod::Ceil => ticks.ceil(),
            RoundMethod::Truncate => ticks.trunc(),
        };

        rounded_ticks.checked_mul(tick).map(|v| v.normalize())
    }

    /// 값이 스텝 크기에 맞는지 검증합니다.
    fn is_on_tick(&self, value: Decimal) -> bool {
        match self.tick_size(value) {
            Some(tick) if !tick.is_zero() => value.checked_rem(tick).is_some_and(|r| r.is_zero()),
            _ => true,
        }
    }
}

/// 고정 스텝.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSize(pub Option<Decimal>);

impl TickSizeProvider for StepSize {
    fn tick_size(&self, _value: Decimal) -> Option<Decimal> {
        self.0
    }
}

impl Market {
    /// 수량을 수량 스텝으로 버림합니다. 스텝 대비 값이 너무 크면 `None`.
    pub fn amount_to_precision(&self, amount: Decimal) -> Option<Decimal> {
        StepSize(self.precision.amount).round_to_tick(amount, RoundMethod::Truncate)
    }

    /// 가격을 호가 단위로 반올림합니다.
    pub fn price_to_precision(&self, price: Decimal) -> Option<Decimal> {
        StepSize(self.precision.price).round_to_tick(price, RoundMethod::Round)
    }

    /// 주문 금액을 가격 스텝으로 버림합니다.
    pub fn cost_to_precision(&self, cost: Decimal) -> Option<Decimal> {
        StepSize(self.precision.price).round_to_tick(cost, RoundMethod::Truncate)
    }
}
