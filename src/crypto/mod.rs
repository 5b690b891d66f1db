//! hidr 密码学模块
//!
//! - `aead`：AES-256-GCM 加解密，每次调用生成全新的 key 与 nonce
//! - `payload`：密文在存储后端上的 hex 线格式

pub mod aead;
pub mod payload;

pub use aead::{KEY_LEN, NONCE_LEN, Nonce, SealedSecret, ShareKey, TAG_LEN, Tag, decrypt, encrypt};
pub use payload::EncryptedPayload;
