//! 密文存储后端
//!
//! 后端只见到 `EncryptedPayload`（密文 / nonce / tag）与读取策略，
//! 永远拿不到 key。TTL 与读取次数由后端执行，这里只负责请求。
//!
//! - `HttpStore`：远程 HTTP 后端
//! - `MemoryStore`：进程内实现（测试 / 本地演练）

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use std::time::Duration;

use async_trait::async_trait;

use crate::crypto::EncryptedPayload;
use crate::error::Result;
use crate::token::OpaqueId;

/// 写入请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRequest {
    pub payload: EncryptedPayload,
    /// 允许读取的次数，None 表示由后端决定
    pub reads: Option<u32>,
    /// 存活时间，None 表示由后端决定
    pub ttl: Option<Duration>,
}

/// 查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSecret {
    pub payload: EncryptedPayload,
    /// 剩余读取次数；后端未限制时为 None
    pub remaining_reads: Option<u32>,
}

/// 密文存储
///
/// 所有失败都以 `HidrError::Backend` 返回，错误信息可以包含 id，
/// 但不得包含任何 key 材料。
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// 保存密文，返回后端用于查找的 id
    async fn store(&self, request: StoreRequest) -> Result<OpaqueId>;

    /// 按 id 取回密文
    ///
    /// id 不存在、已过期或读取次数耗尽时返回 Backend。
    async fn retrieve(&self, id: &OpaqueId) -> Result<StoredSecret>;
}
