//! 密文线格式
//!
//! 存储后端按 hex 字符串保存三个字段：
//! - `content`：密文
//! - `iv`：nonce
//! - `tag`：认证标签
//!
//! key 永远不属于该结构。

use serde::{Deserialize, Serialize};

use super::aead::{Nonce, SealedSecret, ShareKey, Tag};
use crate::error::{HidrError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub content: String,
    pub iv: String,
    pub tag: String,
}

impl SealedSecret {
    /// 转换为存储用的 hex 线格式（不含 key）
    pub fn to_payload(&self) -> EncryptedPayload {
        EncryptedPayload {
            content: hex::encode(&self.ciphertext),
            iv: hex::encode(self.nonce.as_bytes()),
            tag: hex::encode(self.tag.as_bytes()),
        }
    }

    /// 由存储返回的线格式与 token 中的 key 重建 SealedSecret
    ///
    /// 任一字段不是合法 hex 或长度不符时返回 Format，
    /// 此时不会进行任何解密操作。
    pub fn from_payload(payload: &EncryptedPayload, key: ShareKey) -> Result<Self> {
        let ciphertext = decode_hex("content", &payload.content)?;
        let nonce = Nonce::from_slice(&decode_hex("iv", &payload.iv)?)?;
        let tag = Tag::from_slice(&decode_hex("tag", &payload.tag)?)?;

        Ok(Self {
            ciphertext,
            nonce,
            tag,
            key,
        })
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| HidrError::format(format!("invalid hex in `{field}`: {e}")))
}
