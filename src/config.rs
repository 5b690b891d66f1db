//! hidr 运行配置
//!
//! 后端地址不再写死在代码里：默认值见 `DEFAULT_BACKEND_URL`，
//! 调用方可通过命令行参数或环境变量覆盖。

use std::time::Duration;

use crate::error::{HidrError, Result};

/// 默认存储后端
pub const DEFAULT_BACKEND_URL: &str = "https://secrets-backend.msdcconnect.workers.dev";

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn new(backend_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let config = Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.backend_url.as_str();
        let has_scheme = url.starts_with("https://") || url.starts_with("http://");
        let has_host = url
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.is_empty());

        if !has_scheme || !has_host {
            return Err(HidrError::invalid_input(format!(
                "backend URL must be http(s)://..., got `{url}`"
            )));
        }

        if self.timeout.is_zero() {
            return Err(HidrError::invalid_input("timeout must be greater than zero"));
        }

        Ok(())
    }
}
