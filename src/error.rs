use std::path::PathBuf;

use thiserror::Error;

/// hidr 统一错误类型
///
/// 错误信息中允许出现 OpaqueId，但绝不包含明文、密钥或 nonce。
#[derive(Debug, Error)]
pub enum HidrError {
    /// 输入编码或长度不合法，在任何密码学操作之前检出
    #[error("malformed input: {0}")]
    Format(String),

    /// 认证标签校验失败：密钥错误或数据被篡改
    #[error("integrity check failed: wrong key or tampered data")]
    Integrity,

    /// 存储后端返回的错误（不存在 / 已过期 / 读取次数耗尽 / 网络失败）
    #[error("backend error: {0}")]
    Backend(String),

    #[error("secure random source unavailable")]
    RandomnessUnavailable,

    /// 调用方参数不合法（TTL、读取次数、空 secret 等）
    #[error("{0}")]
    InvalidInput(String),

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HidrError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub(crate) fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HidrError>;
