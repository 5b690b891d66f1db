//! hidr：把一段 secret 变成一个只能兑换有限次数的 share token
//!
//! - `crypto`：AES-256-GCM 加解密
//! - `token`：key + id 的 URL 安全编码
//! - `store`：密文存储后端（HTTP / 内存）
//! - `share`：share / view 流程

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod input;
pub mod share;
pub mod store;
pub mod token;
pub mod ttl;

pub use config::Config;
pub use crypto::{EncryptedPayload, SealedSecret, ShareKey, decrypt, encrypt};
pub use error::{HidrError, Result};
pub use share::{RevealedSecret, ShareOptions, share_secret, view_secret};
pub use store::{HttpStore, MemoryStore, SecretStore, StoreRequest, StoredSecret};
pub use token::{OpaqueId, ShareToken};
pub use ttl::parse_ttl;
