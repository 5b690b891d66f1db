//! 远程 HTTP 存储后端
//!
//! 协议：
//! - `POST {base}/store`：`{id, content, iv, tag, reads?, ttl?}`
//! - `GET {base}/retrieve/{id}`：`{content, iv, tag, remainingReads}`
//! - 非 2xx 响应体为 `{error}`
//!
//! id 由客户端随机生成并随写入请求提交，后端以此归档记录。

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{SecretStore, StoreRequest, StoredSecret};
use crate::config::Config;
use crate::crypto::EncryptedPayload;
use crate::error::{HidrError, Result};
use crate::token::OpaqueId;

pub struct HttpStore {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct StoreBody<'a> {
    id: String,
    content: &'a str,
    iv: &'a str,
    tag: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reads: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveBody {
    content: String,
    iv: String,
    tag: String,
    #[serde(default)]
    remaining_reads: Option<u32>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpStore {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("hidr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HidrError::backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SecretStore for HttpStore {
    async fn store(&self, request: StoreRequest) -> Result<OpaqueId> {
        let id = OpaqueId::generate()?;

        let body = StoreBody {
            id: id.to_hex(),
            content: &request.payload.content,
            iv: &request.payload.iv,
            tag: &request.payload.tag,
            reads: request.reads,
            ttl: request.ttl.map(|ttl| ttl.as_secs()),
        };

        debug!(%id, reads = ?request.reads, ttl = ?body.ttl, "storing secret");

        let response = self
            .client
            .post(format!("{}/store", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| HidrError::backend(format!("failed to store secret: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "store secret").await);
        }

        Ok(id)
    }

    async fn retrieve(&self, id: &OpaqueId) -> Result<StoredSecret> {
        debug!(%id, "retrieving secret");

        let response = self
            .client
            .get(format!("{}/retrieve/{}", self.base_url, id.to_hex()))
            .send()
            .await
            .map_err(|e| HidrError::backend(format!("failed to retrieve secret {id}: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "retrieve secret").await);
        }

        let body: RetrieveBody = response
            .json()
            .await
            .map_err(|e| HidrError::backend(format!("invalid response for secret {id}: {e}")))?;

        Ok(StoredSecret {
            payload: EncryptedPayload {
                content: body.content,
                iv: body.iv,
                tag: body.tag,
            },
            remaining_reads: body.remaining_reads,
        })
    }
}

/// 将后端错误响应转换为 Backend 错误
///
/// 响应体符合 `{error}` 时原样透出消息，否则退化为 HTTP 状态码。
async fn error_from_response(response: Response, action: &str) -> HidrError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {status}"),
    };

    warn!(%status, "failed to {action}: {message}");
    HidrError::backend(message)
}
