//! secret 输入来源：文件 / 终端隐藏输入

use std::path::Path;

use crate::error::{HidrError, Result};

/// 读取文件原始字节作为 secret
pub fn read_secret_file(path: &Path) -> Result<Vec<u8>> {
    let content = std::fs::read(path).map_err(|e| HidrError::io(path, e))?;

    if content.is_empty() {
        return Err(HidrError::invalid_input(format!(
            "file {} is empty",
            path.display()
        )));
    }

    Ok(content)
}

/// 在终端中隐藏输入读取一行 secret
pub fn prompt_secret() -> Result<Vec<u8>> {
    let secret = rpassword::prompt_password("Secret: ")
        .map_err(|e| HidrError::io("<tty>", e))?;

    if secret.is_empty() {
        return Err(HidrError::invalid_input("Provide a secret text or a file."));
    }

    Ok(secret.into_bytes())
}
