//! 부동소수점 오차 없는 십진 연산.
//!
//! 거래소 응답의 가격/수량은 문자열로 전달되며, 변동률 × 100 이나
//! 수량 × 가격 같은 계산은 반드시 이 모듈을 통해 수행합니다.
//! 내부 표현은 `rust_decimal::Decimal`이고, 출력할 때는 후행 0을 제거하여
//! 모든 호출 지점에서 같은 문자열 표현이 나오도록 합니다.
//!
//! 표현 범위는 96비트 가수(소수점 이하 최대 28자리)입니다. 입력이나 연산 결과를
//! 이 범위에서 정확히 표현할 수 없으면 반올림하지 않고 `None`을 반환합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 가격 타입.
pub type Price = Decimal;

/// 수량 타입.
pub type Quantity = Decimal;

/// 정규화된 정밀 십진수.
///
/// 생성 시 항상 후행 0이 제거되며 `-0`은 `0`으로 바뀝니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Precise(Decimal);

impl Precise {
    /// 0
    pub const ZERO: Precise = Precise(Decimal::ZERO);

    /// `Decimal`을 정규화하여 감쌉니다.
    pub fn new(value: Decimal) -> Self {
        if value.is_zero() {
            Self(Decimal::ZERO)
        } else {
            Self(value.normalize())
        }
    }

    /// 문자열을 파싱합니다.
    ///
    /// 앞뒤 공백, 선행 0, 부호, 지수 표기(`1e-8`)를 허용합니다.
    /// 빈 문자열, 숫자가 아닌 값, 28자리를 넘어 반올림이 필요한 값은 `None`입니다.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }

        match Decimal::from_str(trimmed) {
            Ok(value) => {
                let parsed = Self::new(value);
                (canonical_plain(trimmed)? == parsed.to_string()).then_some(parsed)
            }
            Err(_) => Decimal::from_scientific(trimmed).ok().map(Self::new),
        }
    }

    /// 내부 `Decimal` 값.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// 정확한 합. 결과를 표현할 수 없으면 `None`.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let scale = self.0.scale().max(other.0.scale());
        let lhs = rescaled_mantissa(self.0, scale)?;
        let rhs = rescaled_mantissa(other.0, scale)?;
        exact(lhs.checked_add(rhs)?, scale)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.checked_add(Self::new(-other.0))
    }

    /// 정확한 곱. 결과를 표현할 수 없으면 `None`.
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        let mantissa = self.0.mantissa().checked_mul(other.0.mantissa())?;
        exact(mantissa, self.0.scale() + other.0.scale())
    }
}

/// 가수를 더 큰 스케일로 옮깁니다. `scale`은 값의 스케일 이상이어야 합니다.
fn rescaled_mantissa(value: Decimal, scale: u32) -> Option<i128> {
    10i128
        .checked_pow(scale - value.scale())?
        .checked_mul(value.mantissa())
}

/// 후행 0을 걷어낸 뒤에도 96비트/28자리를 넘으면 `None`.
fn exact(mut mantissa: i128, mut scale: u32) -> Option<Precise> {
    while scale > 0 && mantissa % 10 == 0 {
        mantissa /= 10;
        scale -= 1;
    }
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .ok()
        .map(Precise::new)
}

/// 일반 표기 숫자 문자열의 정규형 (`"-007.500"` → `"-7.5"`, `"-0.0"` → `"0"`).
///
/// 파싱된 값의 출력과 비교해 자릿수 손실을 찾습니다.
fn canonical_plain(s: &str) -> Option<String> {
    let (negative, unsigned) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');
    let digits = match (int_part.is_empty(), frac_part.is_empty()) {
        (true, true) => return Some("0".to_string()),
        (_, true) => int_part.to_string(),
        (true, false) => format!("0.{}", frac_part),
        (false, false) => format!("{}.{}", int_part, frac_part),
    };
    Some(if negative { format!("-{}", digits) } else { digits })
}

impl From<Decimal> for Precise {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Precise> for Decimal {
    fn from(value: Precise) -> Self {
        value.0
    }
}

impl FromStr for Precise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid decimal: {}", s))
    }
}

impl fmt::Display for Precise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// 문자열 연산
// ============================================================================

fn binary(a: &str, b: &str, op: fn(Precise, Precise) -> Option<Precise>) -> Option<String> {
    let lhs = Precise::parse(a)?;
    let rhs = Precise::parse(b)?;
    op(lhs, rhs).map(|v| v.to_string())
}

/// `a + b`. 어느 한쪽이라도 숫자가 아니면 `None`.
pub fn string_add(a: &str, b: &str) -> Option<String> {
    binary(a, b, Precise::checked_add)
}

/// `a - b`.
pub fn string_sub(a: &str, b: &str) -> Option<String> {
    binary(a, b, Precise::checked_sub)
}

/// `a × b`.
///
/// ```
/// use trader_core::string_mul;
///
/// assert_eq!(string_mul("0.0259", "100").as_deref(), Some("2.59"));
/// ```
pub fn string_mul(a: &str, b: &str) -> Option<String> {
    binary(a, b, Precise::checked_mul)
}

/// 값이 같은지 비교합니다 (`"1.50"`과 `"1.5"`는 같음).
///
/// 어느 한쪽이라도 숫자가 아니면 `false`.
pub fn string_eq(a: &str, b: &str) -> bool {
    matches!((Precise::parse(a), Precise::parse(b)), (Some(x), Some(y)) if x == y)
}

pub fn string_gt(a: &str, b: &str) -> bool {
    matches!((Precise::parse(a), Precise::parse(b)), (Some(x), Some(y)) if x > y)
}

pub fn string_lt(a: &str, b: &str) -> bool {
    matches!((Precise::parse(a), Precise::parse(b)), (Some(x), Some(y)) if x < y)
}

/// 자릿수 문자열을 스텝 크기로 변환합니다.
///
/// `"8"` → `0.00000001`, `"0"` → `1`, `"-2"` → `100`.
pub fn parse_precision(digits: &str) -> Option<Decimal> {
    let digits: i32 = digits.trim().parse().ok()?;
    if digits >= 0 {
        let scale = u32::try_from(digits).ok()?;
        if scale > 28 {
            return None;
        }
        Some(Decimal::new(1, scale))
    } else {
        let mut value = Decimal::ONE;
        for _ in 0..digits.unsigned_abs() {
            value = value.checked_mul(Decimal::TEN)?;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_is_exact() {
        assert_eq!(string_mul("0.0259", "100").as_deref(), Some("2.59"));
        assert_eq!(string_mul("-0.0105", "100").as_deref(), Some("-1.05"));
    }

    #[test]
    fn test_trailing_zero_normalization() {
        assert_eq!(string_add("1.2500", "0.2500").as_deref(), Some("1.5"));
        assert_eq!(string_add("0.1", "0.2").as_deref(), Some("0.3"));
        assert_eq!(string_mul("2.50", "4").as_deref(), Some("10"));
        assert_eq!(string_sub("1.5", "1.5").as_deref(), Some("0"));
    }

    #[test]
    fn test_leading_zeros_and_signs() {
        assert_eq!(string_add("007.50", "-0002.5").as_deref(), Some("5"));
        assert_eq!(string_mul("-3", "-0.5").as_deref(), Some("1.5"));
        assert_eq!(Precise::parse("  0042 ").map(|p| p.to_string()).as_deref(), Some("42"));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(Precise::parse("1e-8").map(|p| p.value()), Some(dec!(0.00000001)));
    }

    #[test]
    fn test_invalid_operands() {
        assert_eq!(string_add("abc", "1"), None);
        assert_eq!(string_mul("", "1"), None);
        assert!(!string_eq("x", "x"));
    }

    #[test]
    fn test_eq_and_ordering() {
        assert!(string_eq("0", "0.000"));
        assert!(string_eq("1.50", "1.5"));
        assert!(!string_eq("105.5", "0"));
        assert!(string_gt("2", "1.99"));
        assert!(string_lt("-1", "0"));
    }

    #[test]
    fn test_overflow_is_none() {
        let max = Decimal::MAX.to_string();
        assert_eq!(string_mul(&max, "10"), None);
        assert_eq!(string_add(&max, &max), None);
    }

    #[test]
    fn test_precision_loss_is_none() {
        assert_eq!(string_mul("0.000000000000001", "0.000000000000001"), None);
        assert_eq!(string_add("1000000", "0.0000000000000000000000001"), None);
        assert_eq!(Precise::parse("0.00000000000000000000000000001"), None);
        assert!(!string_eq("0.00000000000000000000000000001", "0"));

        // 28자리 안에서 정확하면 그대로
        assert_eq!(
            string_mul("0.00000000000001", "0.00000000000001").as_deref(),
            Some("0.0000000000000000000000000001")
        );
        assert_eq!(string_mul("0.2", "0.5").as_deref(), Some("0.1"));
        assert_eq!(
            string_add("5000000000000000000000000000.5", "5000000000000000000000000000.5").as_deref(),
            Some("10000000000000000000000000001")
        );
        assert_eq!(
            string_sub("1000000", "0.0000000000000000000001").as_deref(),
            Some("999999.9999999999999999999999")
        );
    }

    #[test]
    fn test_parse_precision() {
        assert_eq!(parse_precision("8"), Some(dec!(0.00000001)));
        assert_eq!(parse_precision("0"), Some(dec!(1)));
        assert_eq!(parse_precision("-2"), Some(dec!(100)));
        assert_eq!(parse_precision("abc"), None);
    }

    fn decimal_string() -> impl Strategy<Value = String> {
        (-10_000_000i64..10_000_000, 0u32..10).prop_map(|(m, s)| Decimal::new(m, s).to_string())
    }

    proptest! {
        #[test]
        fn prop_add_commutes(a in decimal_string(), b in decimal_string()) {
            prop_assert_eq!(string_add(&a, &b), string_add(&b, &a));
        }

        #[test]
        fn prop_mul_matches_decimal(a in decimal_string(), b in decimal_string()) {
            let expected = Precise::new(a.parse::<Decimal>().unwrap() * b.parse::<Decimal>().unwrap());
            prop_assert_eq!(string_mul(&a, &b), Some(expected.to_string()));
        }

        #[test]
        fn prop_output_has_no_trailing_zeros(a in decimal_string(), b in decimal_string()) {
            let sum = string_add(&a, &b).unwrap();
            if sum.contains('.') {
                prop_assert!(!sum.ends_with('0'));
            }
        }
    }
}
