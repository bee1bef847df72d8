//! 下载落盘
//!
//! 门户导出的文件名由服务器分配，只能靠"目录中最新的文件"来关联刚触发的下载。
//! 这个判断只有在两次调用之间恰好落下一个下载时才成立，所以同一目录在运行期间
//! 必须由一个解析器独占。
//!
//! 修改时间相同的候选按文件名比较，取文件名较大的一个，结果不依赖目录遍历顺序。

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::error::DownloadError;

/// 下载解析器
///
/// 绑定一个输出目录。`resolve` 需要 `&mut self`，保证同一目录上的调用是串行的。
#[derive(Debug)]
pub struct DownloadResolver {
    output_directory: PathBuf,
    /// 本次运行已经落盘的产物，不再参与候选
    claimed: HashSet<PathBuf>,
}

impl DownloadResolver {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
            claimed: HashSet::new(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// 将最新下载的文件重命名为 `target`
    ///
    /// # 返回
    /// 落盘后的路径
    pub fn resolve(&mut self, target: &Path) -> Result<PathBuf, DownloadError> {
        let newest = self.newest_candidate(target)?;

        let Some(source) = newest else {
            warn!("⚠️ 目录 {} 中没有新下载的文件", self.output_directory.display());
            return Err(DownloadError::NotFound {
                path: target.to_path_buf(),
            });
        };

        debug!("最新下载: {} -> {}", source.display(), target.display());
        fs::rename(&source, target).map_err(|e| DownloadError::Rename {
            from: source.clone(),
            to: target.to_path_buf(),
            source: e,
        })?;

        if !target.exists() {
            return Err(DownloadError::NotFound {
                path: target.to_path_buf(),
            });
        }

        info!("✓ 已保存: {}", target.display());
        self.claimed.insert(target.to_path_buf());
        Ok(target.to_path_buf())
    }

    /// 找出修改时间最新的普通文件
    fn newest_candidate(&self, target: &Path) -> Result<Option<PathBuf>, DownloadError> {
        let read_error = |e| DownloadError::DirectoryRead {
            path: self.output_directory.clone(),
            source: e,
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in fs::read_dir(&self.output_directory).map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            let path = entry.path();
            let metadata = entry.metadata().map_err(|e| DownloadError::DirectoryRead {
                path: path.clone(),
                source: e,
            })?;

            if !metadata.is_file() || path == target || self.claimed.contains(&path) {
                continue;
            }

            let modified = metadata.modified().map_err(|e| DownloadError::DirectoryRead {
                path: path.clone(),
                source: e,
            })?;

            let candidate = (modified, path);
            if newest.as_ref().map_or(true, |current| candidate > *current) {
                newest = Some(candidate);
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}
