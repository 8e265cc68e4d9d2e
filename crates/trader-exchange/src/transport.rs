//! HTTP 전송 계층.
//!
//! 서명된 요청을 그대로 보내고 상태 코드와 본문을 돌려줍니다.
//! 재시도는 하지 않습니다.

use crate::error::ExchangeError;
use crate::signer::{HttpMethod, SignedRequest};
use crate::traits::ExchangeResult;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 전송 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 요청 전송 trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &SignedRequest) -> ExchangeResult<RawResponse>;
}

/// `reqwest` 기반 전송.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// 새 전송 계층 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::NetworkError`를 반환합니다.
    pub fn new(timeout: Duration) -> ExchangeResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e))
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &SignedRequest) -> ExchangeResult<RawResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(method = %request.method, status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }
}
