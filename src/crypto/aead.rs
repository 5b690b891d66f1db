//! hidr AEAD 加解密模块
//!
//! 本模块基于 AES-256-GCM 实现 AEAD（Authenticated Encryption
//! with Associated Data），负责单个 secret 的加密与解密。
//!
//! 功能说明：
//! - 每次加密都生成全新的随机 key（16 字节）与 nonce（12 字节）
//! - 认证标签（tag）与密文分离保存，便于存储后端按字段存放
//! - 解密失败即表示：key 错误 或 数据被篡改
//!
//! 安全约束：
//! - key 与 nonce 严禁复用
//! - 不允许在未校验通过的情况下输出任何明文
//! - key、nonce、明文不得出现在日志或错误信息中
//!
//! 兼容性说明：
//! - AES-256-GCM 需要 32 字节工作密钥，这里沿用已发放 token 的格式，
//!   将 16 字节 key 拼接自身（key || key）得到工作密钥

use std::fmt;

use aes_gcm::{
    Aes256Gcm, Key,
    aead::{AeadInPlace, KeyInit},
};
use rand::{RngCore, rngs::OsRng};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{HidrError, Result};

/// 随机 key 长度（字节），嵌入 share token
pub const KEY_LEN: usize = 16;

/// AES-256-GCM 工作密钥长度（字节）
pub const WORKING_KEY_LEN: usize = 2 * KEY_LEN;

/// AES-GCM 使用的 nonce 长度（96 bit，标准推荐值）
pub const NONCE_LEN: usize = 12;

/// AES-GCM 认证标签长度
pub const TAG_LEN: usize = 16;

/// 每个 secret 独立的对称密钥
///
/// 与明文同等敏感：离开作用域后自动清零，`Debug` 输出不含内容。
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ShareKey([u8; KEY_LEN]);

impl ShareKey {
    /// 从系统 CSPRNG 生成新 key
    pub fn generate() -> Result<Self> {
        let mut key = Self([0u8; KEY_LEN]);
        fill_random(&mut key.0)?;
        Ok(key)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            HidrError::format(format!(
                "key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// 派生 AES-256-GCM 工作密钥：key || key
    fn working_key(&self) -> Zeroizing<[u8; WORKING_KEY_LEN]> {
        let mut working = Zeroizing::new([0u8; WORKING_KEY_LEN]);
        working[..KEY_LEN].copy_from_slice(&self.0);
        working[KEY_LEN..].copy_from_slice(&self.0);
        working
    }
}

impl fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShareKey(..)")
    }
}

/// 单次加密使用的 nonce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    pub fn generate() -> Result<Self> {
        let mut nonce = [0u8; NONCE_LEN];
        fill_random(&mut nonce)?;
        Ok(Self(nonce))
    }

    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; NONCE_LEN] = bytes.try_into().map_err(|_| {
            HidrError::format(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// AES-GCM 认证标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag([u8; TAG_LEN]);

impl Tag {
    pub fn from_bytes(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; TAG_LEN] = bytes.try_into().map_err(|_| {
            HidrError::format(format!(
                "tag must be {TAG_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }
}

/// 加密结果
///
/// ciphertext / nonce / tag 交给存储后端保存，
/// key 只进入 share token。
#[derive(Debug, Clone)]
pub struct SealedSecret {
    pub ciphertext: Vec<u8>,
    pub nonce: Nonce,
    pub tag: Tag,
    pub key: ShareKey,
}

/// 使用 AES-256-GCM 加密数据
///
/// #### 参数
/// - `plaintext`：待加密的数据（文本或文件原始字节）
///
/// #### 返回
/// - SealedSecret（包含密文、nonce、tag 与新生成的 key）
///
/// #### 安全说明
/// - 每次调用都会生成全新的随机 key 与 nonce，即使明文相同
/// - 系统随机源不可用时返回 RandomnessUnavailable
pub fn encrypt(plaintext: &[u8]) -> Result<SealedSecret> {
    let key = ShareKey::generate()?;
    let nonce = Nonce::generate()?;

    let cipher = cipher_for(&key);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(
            aes_gcm::Nonce::from_slice(nonce.as_bytes()),
            b"",
            &mut buffer,
        )
        .map_err(|_| HidrError::invalid_input("secret is too large to encrypt"))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(SealedSecret {
        ciphertext: buffer,
        nonce,
        tag: Tag(tag_bytes),
        key,
    })
}

/// 使用 AES-256-GCM 解密数据
///
/// # 错误
/// - tag 与密文不匹配时返回 Integrity
///
/// # 安全保证
/// - 在认证未通过前，不会泄露任何明文数据
pub fn decrypt(sealed: &SealedSecret) -> Result<Vec<u8>> {
    let cipher = cipher_for(&sealed.key);

    let mut buffer = sealed.ciphertext.clone();
    let verified = cipher.decrypt_in_place_detached(
        aes_gcm::Nonce::from_slice(sealed.nonce.as_bytes()),
        b"",
        &mut buffer,
        aes_gcm::Tag::from_slice(sealed.tag.as_bytes()),
    );

    if verified.is_err() {
        buffer.zeroize();
        return Err(HidrError::Integrity);
    }

    Ok(buffer)
}

fn cipher_for(key: &ShareKey) -> Aes256Gcm {
    let working = key.working_key();
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&working[..]))
}

fn fill_random(dest: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(dest)
        .map_err(|_| HidrError::RandomnessUnavailable)
}
