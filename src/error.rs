use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::models::{Flow, Period};
use crate::orchestrator::StepContext;

/// 采集错误
///
/// 所有错误对本次运行都是致命的，内部不做重试。运行期错误携带失败步骤的上下文。
#[derive(Debug, Error)]
pub enum CollectError {
    /// 请求的年份或月份不在流程的定位器表中
    #[error("不支持的期间 {period} (流程: {flow})")]
    UnsupportedPeriod { flow: Flow, period: Period },

    /// 页面导航失败
    #[error("导航失败 {context}: {source}")]
    NavigationFailure {
        context: StepContext,
        #[source]
        source: DriverError,
    },

    /// 等待元素可见超时
    #[error("等待元素超时 {context}: {source}")]
    InteractionTimeout {
        context: StepContext,
        #[source]
        source: DriverError,
    },

    /// 点击等交互失败
    #[error("交互失败 {context}: {source}")]
    InteractionFailure {
        context: StepContext,
        #[source]
        source: DriverError,
    },

    /// 下载目录无法读取
    #[error("读取下载目录失败 {context}: {source}")]
    DirectoryReadError {
        context: StepContext,
        #[source]
        source: DownloadError,
    },

    /// 导出后没有产生文件
    #[error("下载未完成 {context}: {source}")]
    DownloadNotFound {
        context: StepContext,
        #[source]
        source: DownloadError,
    },

    /// 重命名下载文件失败
    #[error("重命名下载文件失败 {context}: {source}")]
    DownloadRename {
        context: StepContext,
        #[source]
        source: DownloadError,
    },

    /// 超过整次运行的期限
    #[error("采集超时 ({}s) {context}", timeout.as_secs())]
    CollectionTimeout {
        timeout: Duration,
        context: StepContext,
    },

    /// 定位器表无效
    #[error("定位器表错误: {0}")]
    LocatorTable(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl CollectError {
    /// 失败所在的步骤上下文（如果有）
    pub fn context(&self) -> Option<&StepContext> {
        match self {
            CollectError::NavigationFailure { context, .. }
            | CollectError::InteractionTimeout { context, .. }
            | CollectError::InteractionFailure { context, .. }
            | CollectError::DirectoryReadError { context, .. }
            | CollectError::DownloadNotFound { context, .. }
            | CollectError::DownloadRename { context, .. }
            | CollectError::CollectionTimeout { context, .. } => Some(context),
            _ => None,
        }
    }

    /// 将下载错误挂到步骤上下文上
    pub fn from_download(context: StepContext, source: DownloadError) -> Self {
        match source {
            DownloadError::DirectoryRead { .. } => {
                CollectError::DirectoryReadError { context, source }
            }
            DownloadError::NotFound { .. } => CollectError::DownloadNotFound { context, source },
            DownloadError::Rename { .. } => CollectError::DownloadRename { context, source },
        }
    }
}

/// 浏览器驱动错误
#[derive(Debug, Error)]
pub enum DriverError {
    /// 元素在期限内没有变为可见
    #[error("元素 {selector} 在 {}ms 内不可见", timeout.as_millis())]
    Timeout { selector: String, timeout: Duration },

    /// 找不到元素
    #[error("找不到元素: {selector}")]
    ElementNotFound { selector: String },

    /// 底层浏览器协议错误
    #[error("浏览器错误: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DriverError {
    pub fn backend(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        DriverError::Backend(Box::new(source))
    }
}

impl From<chromiumoxide::error::CdpError> for DriverError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        DriverError::backend(err)
    }
}

/// 下载落盘错误
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("无法读取目录 {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("下载文件不存在: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("重命名 {} -> {} 失败: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 采集结果类型
pub type CollectResult<T> = Result<T, CollectError>;

/// 驱动结果类型
pub type DriverResult<T> = Result<T, DriverError>;
