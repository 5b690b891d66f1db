//! hidr share token 编解码
//!
//! share token 是用户唯一能看到的产物：
//!
//! ```text
//! base64url( key (16 字节) || id (8 字节) )   // 共 32 个字符，无 padding
//! ```
//!
//! 约束：
//! - 没有分隔符，也没有长度前缀，解码完全依赖 `KEY_LEN` 偏移
//! - key 与 id 长度一经发布不可变，否则所有已发放 token 失效
//! - 本模块只做编码，不做任何加密

use std::fmt;
use std::str::FromStr;

use base64::{
    Engine, alphabet,
    engine::{
        DecodePaddingMode,
        general_purpose::{GeneralPurpose, GeneralPurposeConfig},
    },
};
use rand::{RngCore, rngs::OsRng};

use crate::crypto::aead::{KEY_LEN, ShareKey};
use crate::error::{HidrError, Result};

/// 存储标识长度（字节）
pub const ID_LEN: usize = 8;

/// token 解码后的固定字节长度
pub const TOKEN_BYTES: usize = KEY_LEN + ID_LEN;

/// 输出不带 padding；输入有无 padding 均接受
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 存储后端使用的记录标识，不含任何密码学含义
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpaqueId([u8; ID_LEN]);

impl OpaqueId {
    pub fn generate() -> Result<Self> {
        let mut id = [0u8; ID_LEN];
        OsRng
            .try_fill_bytes(&mut id)
            .map_err(|_| HidrError::RandomnessUnavailable)?;
        Ok(Self(id))
    }

    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// 后端 URL 与日志中使用的小写 hex 形式
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| HidrError::format(format!("invalid id: {e}")))?;
        let bytes: [u8; ID_LEN] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            HidrError::format(format!("id must be {ID_LEN} bytes, got {}", bytes.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueId({})", self.to_hex())
    }
}

/// share token：解密所需的唯一凭证
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareToken {
    key: ShareKey,
    id: OpaqueId,
}

impl ShareToken {
    pub fn new(key: ShareKey, id: OpaqueId) -> Self {
        Self { key, id }
    }

    pub fn key(&self) -> &ShareKey {
        &self.key
    }

    pub fn id(&self) -> &OpaqueId {
        &self.id
    }

    pub fn into_parts(self) -> (ShareKey, OpaqueId) {
        (self.key, self.id)
    }

    /// 编码为 URL 安全的文本形式
    ///
    /// 字节顺序固定：key 在前，id 在后。
    pub fn encode(&self) -> String {
        let mut raw = zeroize::Zeroizing::new([0u8; TOKEN_BYTES]);
        raw[..KEY_LEN].copy_from_slice(self.key.as_bytes());
        raw[KEY_LEN..].copy_from_slice(self.id.as_bytes());

        TOKEN_ENGINE.encode(&raw[..])
    }

    /// 从文本形式解析 token
    ///
    /// # 错误
    /// - 非法 base64 返回 Format
    /// - 解码后长度不足 `KEY_LEN`（无法切分）返回 Format
    /// - 解码后长度不等于 `KEY_LEN + ID_LEN` 返回 Format
    ///
    /// 不检查记录是否存在或过期，那由后端在查询时判断。
    pub fn decode(token: &str) -> Result<Self> {
        let raw = zeroize::Zeroizing::new(
            TOKEN_ENGINE
                .decode(token.trim())
                .map_err(|e| HidrError::format(format!("share token is not valid base64url: {e}")))?,
        );

        if raw.len() < KEY_LEN {
            return Err(HidrError::format(format!(
                "share token too short: {} bytes, key alone needs {KEY_LEN}",
                raw.len()
            )));
        }

        let (key, id) = raw.split_at(KEY_LEN);
        let id: [u8; ID_LEN] = id.try_into().map_err(|_| {
            HidrError::format(format!(
                "share token must decode to {TOKEN_BYTES} bytes, got {}",
                raw.len()
            ))
        })?;

        Ok(Self {
            key: ShareKey::from_slice(key)?,
            id: OpaqueId(id),
        })
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for ShareToken {
    type Err = HidrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}
