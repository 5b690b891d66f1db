//! 原子写入工具
//!
//! view 的输出文件「先写临时文件，成功后再替换目标文件」，
//! 避免在写入失败时截断已有文件或留下半份明文。

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, rngs::OsRng};

use crate::error::{HidrError, Result};

/// 原子写文件
///
/// 流程：
/// 1. 在目标目录创建临时文件（unix 下权限 0600）；
/// 2. 写入完整内容并 sync；
/// 3. rename 替换目标文件，失败时删除临时文件。
pub fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            HidrError::invalid_input(format!("{} is not a file path", target.display()))
        })?;

    fs::create_dir_all(parent).map_err(|e| HidrError::io(parent, e))?;

    let tmp_path = tmp_path_for(parent, file_name)?;

    let written = create_private(&tmp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });

    let replaced = written.and_then(|()| {
        if cfg!(windows) && target.exists() {
            fs::remove_file(target)?;
        }
        fs::rename(&tmp_path, target)
    });

    if let Err(err) = replaced {
        let _ = fs::remove_file(&tmp_path);
        return Err(HidrError::io(target, err));
    }

    Ok(())
}

fn create_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

fn tmp_path_for(parent: &Path, file_name: &str) -> Result<PathBuf> {
    let mut suffix = [0u8; 8];
    OsRng
        .try_fill_bytes(&mut suffix)
        .map_err(|_| HidrError::RandomnessUnavailable)?;

    Ok(parent.join(format!(
        ".{file_name}.hidr-tmp-{}-{}",
        std::process::id(),
        hex::encode(suffix)
    )))
}
