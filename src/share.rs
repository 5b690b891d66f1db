//! share / view 流程
//!
//! share（严格顺序）：
//! 1. 加密明文，得到密文 / nonce / tag / key
//! 2. 密文 / nonce / tag 写入存储后端，换回 id
//! 3. key + id 编码为 share token
//!
//! view（严格顺序）：
//! 1. 解码 share token，得到 key + id
//! 2. 按 id 从后端取回密文
//! 3. 校验 tag 后解密
//!
//! 注意：
//! - 随机源失败时应整体重试 share，而不是只重试某一步
//! - 本模块不做 UI / 输入输出

use std::time::Duration;

use tracing::debug;

use crate::crypto::{self, SealedSecret};
use crate::error::{HidrError, Result};
use crate::store::{SecretStore, StoreRequest};
use crate::token::ShareToken;

/// 向后端请求的读取策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShareOptions {
    pub reads: Option<u32>,
    pub ttl: Option<Duration>,
}

/// view 的结果
#[derive(Debug)]
pub struct RevealedSecret {
    pub plaintext: Vec<u8>,
    pub remaining_reads: Option<u32>,
}

/// 加密并保存 secret，返回 share token
pub async fn share_secret<S>(
    store: &S,
    plaintext: &[u8],
    options: &ShareOptions,
) -> Result<ShareToken>
where
    S: SecretStore + ?Sized,
{
    if options.reads == Some(0) {
        return Err(HidrError::invalid_input("read limit must be at least 1"));
    }

    let sealed = crypto::encrypt(plaintext)?;
    let payload = sealed.to_payload();

    let id = store
        .store(StoreRequest {
            payload,
            reads: options.reads,
            ttl: options.ttl,
        })
        .await?;

    debug!(%id, bytes = plaintext.len(), "secret shared");

    Ok(ShareToken::new(sealed.key, id))
}

/// 取回并解密 share token 对应的 secret
pub async fn view_secret<S>(store: &S, token: &ShareToken) -> Result<RevealedSecret>
where
    S: SecretStore + ?Sized,
{
    let id = token.id();
    let stored = store.retrieve(id).await?;

    let sealed = SealedSecret::from_payload(&stored.payload, token.key().clone())?;
    let plaintext = crypto::decrypt(&sealed)?;

    debug!(%id, bytes = plaintext.len(), remaining = ?stored.remaining_reads, "secret revealed");

    Ok(RevealedSecret {
        plaintext,
        remaining_reads: stored.remaining_reads,
    })
}
