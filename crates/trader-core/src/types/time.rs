//! 밀리초 타임스탬프 변환.

use chrono::{DateTime, SecondsFormat, Utc};

/// epoch 밀리초를 UTC 시각으로 변환합니다.
pub fn millis_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// epoch 밀리초를 ISO-8601 문자열로 변환합니다 (예: `2023-03-01T21:16:48.268Z`).
pub fn iso8601(ms: i64) -> Option<String> {
    millis_to_datetime(ms).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// 현재 시각 (epoch 밀리초).
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso8601() {
        assert_eq!(iso8601(1677705408268).as_deref(), Some("2023-03-01T21:16:48.268Z"));
        assert_eq!(iso8601(0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
    }
}
