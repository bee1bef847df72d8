//! Chromium 驱动 - 基础设施层
//!
//! 持有唯一的 page 资源，把 [`UiDriver`] 的能力翻译成 CDP 调用。

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{DriverError, DriverResult};
use crate::infrastructure::driver::UiDriver;
use crate::models::Locator;

/// 可见性轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// XPath 查找失败的归类
///
/// 只有"找不到节点"算作 [`DriverError::ElementNotFound`]，其余 CDP 错误原样保留。
fn lookup_error(selector: &str, err: CdpError) -> DriverError {
    match err {
        CdpError::NotFound => DriverError::ElementNotFound {
            selector: selector.to_string(),
        },
        other => DriverError::from(other),
    }
}

/// 轮询 `check` 直到返回 `true` 或超过 `timeout`
///
/// 页面还在加载时 JS 求值可能失败，这类错误按"不可见"处理，继续轮询。
async fn poll_until_visible<F, Fut>(mut check: F, selector: &str, timeout: Duration) -> DriverResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DriverResult<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => debug!("可见性检查失败 {}: {}", selector, e),
        }
        if Instant::now() >= deadline {
            return Err(DriverError::Timeout {
                selector: selector.to_string(),
                timeout,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Chromium 驱动
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 不认识流程和期间
/// - 不处理业务流程
pub struct ChromiumDriver {
    page: Page,
}

impl ChromiumDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并反序列化为指定类型
    async fn eval_as<T: DeserializeOwned>(&self, js_code: String) -> DriverResult<T> {
        let result = self.page.evaluate(js_code).await?;
        result.into_value().map_err(DriverError::backend)
    }

    /// 元素是否存在且可见
    async fn is_visible(&self, locator: &Locator) -> DriverResult<bool> {
        let selector = serde_json::to_string(locator.selector()).map_err(DriverError::backend)?;
        let js_code = format!(
            r#"
            (() => {{
                let node = document.evaluate({}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
                if (!node) return false;
                if (node.nodeType !== Node.ELEMENT_NODE) node = node.parentElement;
                if (!node) return false;
                const style = window.getComputedStyle(node);
                if (style.display === 'none' || style.visibility === 'hidden') return false;
                return node.getClientRects().length > 0;
            }})()
            "#,
            selector
        );
        self.eval_as(js_code).await
    }
}

#[async_trait]
impl UiDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.page.goto(url).await?;
        debug!("已导航到: {}", url);
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> DriverResult<()> {
        let element = self
            .page
            .find_xpath(locator.selector())
            .await
            .map_err(|e| lookup_error(locator.selector(), e))?;
        element.click().await?;
        Ok(())
    }

    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> DriverResult<()> {
        poll_until_visible(|| self.is_visible(locator), locator.selector(), timeout).await
    }

    async fn sleep(&self, duration: Duration) -> DriverResult<()> {
        sleep(duration).await;
        Ok(())
    }

    async fn set_download_directory(&self, path: &Path) -> DriverResult<()> {
        let mut params = SetDownloadBehaviorParams::new(SetDownloadBehaviorBehavior::AllowAndName);
        params.download_path = Some(path.to_string_lossy().into_owned());
        params.events_enabled = Some(true);
        self.page.execute(params).await?;
        debug!("下载目录: {}", path.display());
        Ok(())
    }
}
