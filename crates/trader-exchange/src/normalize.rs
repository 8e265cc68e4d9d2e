//! 응답 정규화 도우미.
//!
//! 모든 필드 접근은 실패하지 않습니다. 필드가 없거나 타입이 다르거나 컨테이너 자체가
//! 객체가 아니면 `None`을 반환합니다. 같은 파서로 여러 엔드포인트 응답 형태를 처리할 수 있습니다.

use rust_decimal::Decimal;
use serde_json::Value;
use trader_core::{OrderBook, OrderBookLevel, Precise};

pub use trader_core::iso8601;

/// 키의 값. `null`은 없는 것으로 취급합니다.
pub fn safe_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 문자열 값. 숫자와 불리언은 문자열로 변환합니다. 빈 문자열은 그대로 유지됩니다.
pub fn safe_string(value: &Value, key: &str) -> Option<String> {
    safe_value(value, key).and_then(value_to_string)
}

/// 첫 번째 키가 없으면 두 번째 키.
pub fn safe_string2(value: &Value, key1: &str, key2: &str) -> Option<String> {
    safe_string(value, key1).or_else(|| safe_string(value, key2))
}

pub fn safe_string_lower(value: &Value, key: &str) -> Option<String> {
    safe_string(value, key).map(|s| s.to_lowercase())
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                Precise::parse(s).and_then(|p| p.value().trunc().to_string().parse().ok())
            })
        }
        _ => None,
    }
}

/// 정수 값. 숫자 문자열도 해석합니다 (소수부는 버림).
pub fn safe_integer(value: &Value, key: &str) -> Option<i64> {
    safe_value(value, key).and_then(value_to_i64)
}

pub fn safe_integer2(value: &Value, key1: &str, key2: &str) -> Option<i64> {
    safe_integer(value, key1).or_else(|| safe_integer(value, key2))
}

/// 불리언 값. `"true"`/`"false"` 문자열도 허용합니다.
pub fn safe_bool(value: &Value, key: &str) -> Option<bool> {
    match safe_value(value, key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn safe_bool2(value: &Value, key1: &str, key2: &str) -> Option<bool> {
    safe_bool(value, key1).or_else(|| safe_bool(value, key2))
}

/// 정밀 소수 값. 숫자는 문자열 표현을 거쳐 해석하므로 부동소수점 오차가 없습니다.
pub fn safe_decimal(value: &Value, key: &str) -> Option<Decimal> {
    safe_string(value, key)
        .and_then(|s| Precise::parse(&s))
        .map(|p| p.value())
}

pub fn safe_decimal2(value: &Value, key1: &str, key2: &str) -> Option<Decimal> {
    safe_decimal(value, key1).or_else(|| safe_decimal(value, key2))
}

/// 배열 값.
pub fn safe_list<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    safe_value(value, key).and_then(Value::as_array)
}

/// 배열 원소를 정밀 소수로 읽습니다 (캔들, 호가 튜플용).
pub fn safe_decimal_at(value: &Value, index: usize) -> Option<Decimal> {
    value
        .get(index)
        .and_then(value_to_string)
        .and_then(|s| Precise::parse(&s))
        .map(|p| p.value())
}

pub fn safe_integer_at(value: &Value, index: usize) -> Option<i64> {
    value.get(index).and_then(value_to_i64)
}

/// `[[price, amount], ...]` 형태의 호가 응답을 주문서로 변환합니다.
///
/// 해석할 수 없는 레벨은 건너뜁니다.
pub fn parse_order_book(
    value: &Value,
    symbol: &str,
    timestamp: Option<i64>,
    bids_key: &str,
    asks_key: &str,
) -> OrderBook {
    OrderBook::new(
        symbol,
        parse_levels(value, bids_key),
        parse_levels(value, asks_key),
        timestamp,
    )
}

fn parse_levels(value: &Value, key: &str) -> Vec<OrderBookLevel> {
    safe_list(value, key)
        .map(|levels| {
            levels
                .iter()
                .filter_map(|level| {
                    Some(OrderBookLevel {
                        price: safe_decimal_at(level, 0)?,
                        amount: safe_decimal_at(level, 1)?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// 타임스탬프 오름차순으로 정렬한 뒤 `limit`개까지 남깁니다.
///
/// `since`가 있으면 그 이후의 앞쪽 항목을, 없으면 가장 최근 항목을 남깁니다.
/// `since`가 있으면 타임스탬프가 없는 항목은 제외됩니다.
pub fn filter_by_since_limit<T, F>(
    mut items: Vec<T>,
    since: Option<i64>,
    limit: Option<usize>,
    timestamp: F,
) -> Vec<T>
where
    F: Fn(&T) -> Option<i64>,
{
    items.sort_by_key(|item| timestamp(item));
    match since {
        Some(since) => {
            items.retain(|item| timestamp(item).is_some_and(|ts| ts >= since));
            if let Some(limit) = limit {
                items.truncate(limit);
            }
        }
        None => {
            if let Some(limit) = limit {
                let excess = items.len().saturating_sub(limit);
                items.drain(..excess);
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_safe_string_variants() {
        let v = json!({"a": "x", "n": 12.5, "b": true, "e": "", "z": null, "o": {}});
        assert_eq!(safe_string(&v, "a").as_deref(), Some("x"));
        assert_eq!(safe_string(&v, "n").as_deref(), Some("12.5"));
        assert_eq!(safe_string(&v, "b").as_deref(), Some("true"));
        assert_eq!(safe_string(&v, "e").as_deref(), Some(""));
        assert_eq!(safe_string(&v, "z"), None);
        assert_eq!(safe_string(&v, "o"), None);
        assert_eq!(safe_string(&v, "missing"), None);
        assert_eq!(safe_string2(&v, "missing", "a").as_deref(), Some("x"));
    }

    #[test]
    fn test_missing_container_is_none() {
        let v = json!("not an object");
        assert_eq!(safe_string(&v, "a"), None);
        assert_eq!(safe_integer(&Value::Null, "a"), None);
        assert!(safe_list(&json!([1, 2]), "a").is_none());
    }

    #[test]
    fn test_safe_integer_parses_strings() {
        let v = json!({"i": 1677705408268i64, "s": "42", "f": "3.9", "bad": "abc"});
        assert_eq!(safe_integer(&v, "i"), Some(1677705408268));
        assert_eq!(safe_integer(&v, "s"), Some(42));
        assert_eq!(safe_integer(&v, "f"), Some(3));
        assert_eq!(safe_integer(&v, "bad"), None);
        assert_eq!(safe_integer2(&v, "none", "s"), Some(42));
    }

    #[test]
    fn test_safe_bool_and_decimal() {
        let v = json!({"t": true, "s": "false", "d": "0.00100000", "n": 0.1});
        assert_eq!(safe_bool(&v, "t"), Some(true));
        assert_eq!(safe_bool(&v, "s"), Some(false));
        assert_eq!(safe_bool(&v, "d"), None);
        assert_eq!(safe_decimal(&v, "d"), Some(dec!(0.001)));
        assert_eq!(safe_decimal(&v, "n"), Some(dec!(0.1)));
        assert_eq!(safe_bool2(&v, "missing", "t"), Some(true));
    }

    #[test]
    fn test_parse_order_book_sorts_and_skips_bad_levels() {
        let v = json!({
            "bids": [["100.5", "1"], ["101", "2"], ["bad", "1"]],
            "asks": [["103", "1"], ["102.5", "0.5"]]
        });
        let book = parse_order_book(&v, "BTC/PHP", Some(1), "bids", "asks");
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.best_bid().map(|l| l.price), Some(dec!(101)));
        assert_eq!(book.best_ask().map(|l| l.price), Some(dec!(102.5)));
        assert_eq!(book.timestamp, Some(1));
    }

    #[test]
    fn test_filter_by_since_limit() {
        let items = vec![(3, "c"), (1, "a"), (2, "b"), (4, "d")];
        let filtered = filter_by_since_limit(items, Some(2), Some(2), |(ts, _)| Some(*ts));
        assert_eq!(filtered, vec![(2, "b"), (3, "c")]);
    }

    #[test]
    fn test_filter_without_since_keeps_latest() {
        let items = vec![(3, "c"), (1, "a"), (2, "b")];
        let filtered = filter_by_since_limit(items, None, Some(1), |(ts, _)| Some(*ts));
        assert_eq!(filtered, vec![(3, "c")]);
    }

    proptest! {
        #[test]
        fn prop_filter_by_since_limit(
            stamps in proptest::collection::vec(0i64..10_000, 0..50),
            since in proptest::option::of(0i64..10_000),
            limit in proptest::option::of(0usize..60),
        ) {
            let filtered = filter_by_since_limit(stamps.clone(), since, limit, |ts| Some(*ts));

            prop_assert!(filtered.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(filtered.iter().all(|ts| since.map_or(true, |s| *ts >= s)));
            if let Some(limit) = limit {
                prop_assert!(filtered.len() <= limit);
            }
            let eligible = stamps.iter().filter(|ts| since.map_or(true, |s| **ts >= s)).count();
            prop_assert_eq!(filtered.len(), limit.map_or(eligible, |l| eligible.min(l)));
            if since.is_none() && !filtered.is_empty() {
                prop_assert_eq!(filtered.last(), stamps.iter().max());
            }
        }
    }
}
