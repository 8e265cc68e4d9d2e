//! 요청 파라미터 인코딩과 HMAC-SHA256 서명.
//!
//! 서명은 실제로 전송되는 쿼리 문자열 바이트 그대로에 대해 계산합니다.
//! 서명 이후에 순서를 바꾸거나 다시 인코딩하면 요청이 무효가 됩니다.

use crate::error::ExchangeError;
use crate::traits::ExchangeResult;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::fmt;
use trader_core::now_millis;

type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// 요청 파라미터
// ============================================================================

/// 파라미터 값.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
    /// 배열 파라미터 (예: `symbols`)
    List(Vec<String>),
}

impl Param {
    /// 스칼라 값의 쿼리 표현. 배열은 `None`.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Param::Text(s) => Some(s.clone()),
            Param::Int(i) => Some(i.to_string()),
            Param::Decimal(d) => Some(d.to_string()),
            Param::Bool(b) => Some(b.to_string()),
            Param::List(_) => None,
        }
    }

    /// 정수로 해석합니다 (`"100"` 같은 문자열 포함).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Param::Int(i) => Some(*i),
            Param::Text(s) => s.trim().parse().ok(),
            Param::Decimal(d) => d.trunc().to_string().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<&String> for Param {
    fn from(v: &String) -> Self {
        Param::Text(v.clone())
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<u32> for Param {
    fn from(v: u32) -> Self {
        Param::Int(i64::from(v))
    }
}

impl From<u64> for Param {
    fn from(v: u64) -> Self {
        // u64 범위를 넘는 값은 문자열로 보존
        i64::try_from(v).map(Param::Int).unwrap_or_else(|_| Param::Text(v.to_string()))
    }
}

impl From<Decimal> for Param {
    fn from(v: Decimal) -> Self {
        Param::Decimal(v)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<Vec<String>> for Param {
    fn from(v: Vec<String>) -> Self {
        Param::List(v)
    }
}

/// 삽입 순서를 보존하는 요청 파라미터.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    entries: Vec<(String, Param)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 형태로 파라미터를 추가합니다.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.insert(key, value);
        self
    }

    /// 값을 설정합니다. 이미 있는 키는 제자리에서 교체됩니다.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Param>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 값이 `Some`일 때만 설정합니다.
    pub fn insert_opt<V: Into<Param>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Param> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Param> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 호출별 오버라이드를 합친 사본을 만듭니다. 원본은 바뀌지 않습니다.
    pub fn merged(&self, overrides: &RequestParams) -> RequestParams {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }
}

/// 파라미터를 쿼리 문자열로 인코딩합니다.
///
/// 스칼라 값은 퍼센트 인코딩하고, 배열 값은 JSON 문자열로 만든 뒤
/// 바깥 대괄호만 `%5B`/`%5D`로 바꿉니다 (`symbols=%5B"BTCPHP","ETHPHP"%5D`).
/// 스칼라 구간과 배열 구간은 둘 다 비어 있지 않을 때만 `&` 하나로 잇습니다.
pub fn url_encode_query(params: &RequestParams) -> String {
    let mut scalars = Vec::new();
    let mut arrays = Vec::new();

    for (key, value) in params.iter() {
        match value {
            Param::List(items) => arrays.push(encode_array_param(key, items)),
            other => {
                let text = other.scalar_text().unwrap_or_default();
                scalars.push(format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&text)
                ));
            }
        }
    }

    let scalar_part = scalars.join("&");
    let array_part = arrays.join("&");
    match (scalar_part.is_empty(), array_part.is_empty()) {
        (false, false) => format!("{}&{}", scalar_part, array_part),
        (false, true) => scalar_part,
        (true, _) => array_part,
    }
}

fn encode_array_param(key: &str, items: &[String]) -> String {
    let json = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
    let inner = json
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(&json);
    format!("{}=%5B{}%5D", key, inner)
}

// ============================================================================
// 자격증명
// ============================================================================

/// API 자격증명.
///
/// # 보안
/// - 시크릿은 `SecretString`으로 보관됩니다.
/// - `Debug` 구현은 API 키를 마스킹합니다.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: SecretString::new(secret.into().into_boxed_str()),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> = self.api_key.chars().collect();
        let masked_key = if chars.len() > 8 {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        } else {
            "***REDACTED***".to_string()
        };

        f.debug_struct("Credentials")
            .field("api_key", &masked_key)
            .field("secret", &"***REDACTED***")
            .finish()
    }
}

// ============================================================================
// 서명
// ============================================================================

/// HTTP 메서드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 엔드포인트 접근 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// 인증 불필요
    Public,
    /// 서명 필요
    Private,
}

/// 전송 가능한 요청.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl SignedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// URL의 쿼리 문자열 부분.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }
}

/// 요청 서명기.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Option<Credentials>,
    recv_window: Option<u64>,
    api_key_header: &'static str,
}

impl RequestSigner {
    /// 새 서명기.
    ///
    /// # Arguments
    /// * `credentials` - 없으면 공개 요청만 가능
    /// * `recv_window` - 서명 요청에 기본으로 붙일 수신 윈도우 (밀리초)
    /// * `api_key_header` - API 키를 담을 헤더 이름
    pub fn new(
        credentials: Option<Credentials>,
        recv_window: Option<u64>,
        api_key_header: &'static str,
    ) -> Self {
        Self {
            credentials,
            recv_window,
            api_key_header,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// 자격증명이 없으면 `Authentication` 에러.
    pub fn check_required_credentials(&self) -> ExchangeResult<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            ExchangeError::Authentication("requires \"apiKey\" and \"secret\" credentials".into())
        })
    }

    /// 현재 시각으로 서명합니다.
    pub fn sign(
        &self,
        base_url: &str,
        path: &str,
        access: Access,
        method: HttpMethod,
        params: &RequestParams,
    ) -> ExchangeResult<SignedRequest> {
        self.sign_at(base_url, path, access, method, params, now_millis())
    }

    /// 주어진 타임스탬프로 서명합니다.
    ///
    /// 같은 파라미터와 타임스탬프는 항상 같은 서명을 만듭니다.
    pub fn sign_at(
        &self,
        base_url: &str,
        path: &str,
        access: Access,
        method: HttpMethod,
        params: &RequestParams,
        timestamp_ms: i64,
    ) -> ExchangeResult<SignedRequest> {
        let mut url = format!("{}/{}", base_url.trim_end_matches('/'), path);

        match access {
            Access::Public => {
                let query = url_encode_query(params);
                if !query.is_empty() {
                    url.push('?');
                    url.push_str(&query);
                }
                Ok(SignedRequest {
                    method,
                    url,
                    headers: Vec::new(),
                    body: None,
                })
            }
            Access::Private => {
                let credentials = self.check_required_credentials()?;

                let mut query = params.clone();
                query.insert("timestamp", timestamp_ms);
                if !query.contains("recvWindow") {
                    query.insert_opt("recvWindow", self.recv_window);
                }

                let encoded = url_encode_query(&query);
                let signature = hmac_sha256_hex(credentials.secret_bytes(), &encoded)?;

                url.push('?');
                url.push_str(&encoded);
                url.push_str("&signature=");
                url.push_str(&signature);

                Ok(SignedRequest {
                    method,
                    url,
                    headers: vec![(
                        self.api_key_header.to_string(),
                        credentials.api_key().to_string(),
                    )],
                    body: None,
                })
            }
        }
    }
}

/// HMAC-SHA256 hex 서명.
pub fn hmac_sha256_hex(secret: &[u8], payload: &str) -> ExchangeResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ExchangeError::Authentication(format!("invalid secret: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
