//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **配置校验**：在启动浏览器之前构造并校验采集请求
//! 2. **定位器表**：加载内置表或 `LOCATOR_TABLE` 指定的外部表
//! 3. **资源管理**：唯一持有 Browser 的模块，启动或连接浏览器
//! 4. **向下委托**：交给 [`Orchestrator`] 执行状态机
//!
//! 采集期限从浏览器启动之前开始计时，启动或连接浏览器的耗时也算在内。

use std::future::Future;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::{CollectError, CollectResult};
use crate::infrastructure::ChromiumDriver;
use crate::models::ExtractionRequest;
use crate::orchestrator::extraction::{ExtractionReport, Orchestrator};
use crate::orchestrator::run_state::RunState;
use crate::resolver::{LocatorTable, ParameterResolver};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    request: ExtractionRequest,
    /// 整次采集的截止时刻
    deadline: Instant,
    browser: Browser,
    /// 浏览器由本进程启动时，结束后负责关闭
    owns_browser: bool,
    orchestrator: Orchestrator<ChromiumDriver>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let request = config
            .extraction_request()
            .context("无法构造采集请求")?;

        logging::log_startup(&request);
        let deadline = Instant::now() + request.collection_deadline;

        let table = match &config.locator_table {
            Some(path) => LocatorTable::from_file(path)?,
            None => LocatorTable::builtin()?,
        };

        let (browser, page, owns_browser) = match config.browser_debug_port {
            Some(port) => {
                let step = format!("connect_browser({})", port);
                let (browser, page) =
                    within_deadline(&request, deadline, step, browser::connect_to_browser(port))
                        .await??;
                (browser, page, false)
            }
            None => {
                let options = config.launch_options();
                let step = "launch_browser".to_string();
                let (browser, page) =
                    within_deadline(&request, deadline, step, browser::launch_browser(&options))
                        .await??;
                (browser, page, true)
            }
        };

        let orchestrator = Orchestrator::new(
            ChromiumDriver::new(page),
            ParameterResolver::new(table),
            config.portal_url.clone(),
            config.visible_timeout,
        );

        Ok(Self {
            request,
            deadline,
            browser,
            owns_browser,
            orchestrator,
        })
    }

    /// 运行采集，结束后关闭浏览器
    pub async fn run(mut self) -> Result<ExtractionReport> {
        let result = self
            .orchestrator
            .run_until(&self.request, self.deadline)
            .await;

        if self.owns_browser {
            if let Err(e) = self.browser.close().await {
                warn!("⚠️ 关闭浏览器失败: {}", e);
            } else {
                info!("浏览器已关闭");
            }
        }

        let report = result?;
        logging::log_report(&report);
        Ok(report)
    }
}

/// 在采集期限内完成浏览器准备工作
///
/// 超时按 [`CollectError::CollectionTimeout`] 报告，步骤记为 `step`。
pub(crate) async fn within_deadline<T, F>(
    request: &ExtractionRequest,
    deadline: Instant,
    step: String,
    fut: F,
) -> CollectResult<T>
where
    F: Future<Output = T>,
{
    match timeout_at(deadline, fut).await {
        Ok(value) => Ok(value),
        Err(_) => {
            let mut state = RunState::new(request.period());
            state.begin_step(step);
            let context = state.context();
            error!("❌ 采集超时 {}", context);
            Err(CollectError::CollectionTimeout {
                timeout: request.collection_deadline,
                context,
            })
        }
    }
}
