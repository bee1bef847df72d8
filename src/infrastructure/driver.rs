//! 浏览器能力抽象
//!
//! 编排层只依赖这组能力，不关心背后是哪种自动化引擎。

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverResult;
use crate::models::Locator;

/// UI 驱动
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// 导航到指定 URL
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// 点击元素
    async fn click(&self, locator: &Locator) -> DriverResult<()>;

    /// 等待元素可见，超过 `timeout` 返回 [`DriverError::Timeout`](crate::error::DriverError::Timeout)
    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> DriverResult<()>;

    /// 固定等待
    async fn sleep(&self, duration: Duration) -> DriverResult<()>;

    /// 设置下载目录
    async fn set_download_directory(&self, path: &Path) -> DriverResult<()>;
}
