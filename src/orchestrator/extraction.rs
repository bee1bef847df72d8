//! 采集状态机 - 编排层
//!
//! ## 状态
//!
//! ```text
//! Init → Navigated → FlowSelected(flow) → PeriodSelected(flow) → Exported(flow) → … → Done
//! ```
//!
//! 每个流程走一遍，顺序固定（先工资单，后津贴），共用一个浏览器会话。
//!
//! ## 失败处理
//!
//! 任何一步失败都立即终止整次运行，后续步骤不会再发给驱动，也不重试。
//! 失败后的页面状态不可信，调用方只能从 Init 重新开始。
//!
//! 除了点击前的可见性等待，界面异步只靠固定的 settle 等待来兜底，
//! 状态机是否正确取决于外部调好的等待时长。

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info};

use crate::error::{CollectError, CollectResult, DriverError, DriverResult};
use crate::infrastructure::UiDriver;
use crate::models::{ActionStep, DownloadArtifact, ExtractionRequest, Flow, Month, Year};
use crate::orchestrator::plan;
use crate::orchestrator::run_state::{RunState, Stage, StepContext};
use crate::resolver::{DownloadResolver, ParameterResolver, PeriodSelection};

/// 一次采集的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub month: Month,
    pub year: Year,
    /// 产物路径，按流程顺序排列
    pub files: Vec<PathBuf>,
}

/// 采集编排器
pub struct Orchestrator<D> {
    driver: D,
    resolver: ParameterResolver,
    portal_url: String,
    visible_timeout: Duration,
}

impl<D: UiDriver> Orchestrator<D> {
    pub fn new(
        driver: D,
        resolver: ParameterResolver,
        portal_url: impl Into<String>,
        visible_timeout: Duration,
    ) -> Self {
        Self {
            driver,
            resolver,
            portal_url: portal_url.into(),
            visible_timeout,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// 执行整次采集
    ///
    /// 整次运行受 `collection_deadline` 约束，超时时正在进行的浏览器操作被取消。
    pub async fn run(&self, request: &ExtractionRequest) -> CollectResult<ExtractionReport> {
        self.run_until(request, Instant::now() + request.collection_deadline)
            .await
    }

    /// 执行整次采集，截止到给定时刻
    ///
    /// `deadline` 由调用方提前算好，浏览器启动等准备工作占用的时间也计入期限。
    pub async fn run_until(
        &self,
        request: &ExtractionRequest,
        deadline: Instant,
    ) -> CollectResult<ExtractionReport> {
        let mut state = RunState::new(request.period());

        let outcome = timeout_at(deadline, self.run_flows(request, &mut state)).await;

        match outcome {
            Ok(Ok(files)) => Ok(ExtractionReport {
                month: request.month,
                year: request.year.clone(),
                files,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                let context = state.context();
                error!("❌ 采集超时 {}", context);
                Err(CollectError::CollectionTimeout {
                    timeout: request.collection_deadline,
                    context,
                })
            }
        }
    }

    async fn run_flows(
        &self,
        request: &ExtractionRequest,
        state: &mut RunState,
    ) -> CollectResult<Vec<PathBuf>> {
        let settle = request.step_settle_delay;

        // 先解析全部流程的期间，不支持的期间不必打开门户
        let mut selections = Vec::with_capacity(Flow::ORDER.len());
        for flow in Flow::ORDER {
            selections.push((flow, self.resolver.resolve(flow, &request.year, request.month)?));
        }

        info!("🌐 打开门户 ({})...", state.period());
        let steps = plan::navigation(&self.portal_url, &request.output_directory, settle);
        self.execute(state, &steps).await?;
        state.advance(Stage::Navigated);

        let mut downloads = DownloadResolver::new(&request.output_directory);
        let mut files = Vec::with_capacity(selections.len());
        for (flow, selection) in &selections {
            let file = self
                .run_flow(*flow, selection, request, state, &mut downloads)
                .await?;
            files.push(file);
        }

        state.advance(Stage::Done);
        info!("✅ 采集完成，共 {} 个文件", files.len());
        Ok(files)
    }

    async fn run_flow(
        &self,
        flow: Flow,
        selection: &PeriodSelection,
        request: &ExtractionRequest,
        state: &mut RunState,
        downloads: &mut DownloadResolver,
    ) -> CollectResult<PathBuf> {
        let settle = request.step_settle_delay;
        let period = state.period().clone();
        state.begin_flow(flow);

        info!("[{}] 进入流程 ({})...", flow, period);
        self.execute(state, &plan::flow_selection(self.resolver.entry(flow), settle))
            .await?;
        state.advance(Stage::FlowSelected(flow));

        if selection.skips_month() {
            info!("[{}] 默认期间，只选择年份 {}", flow, period.year);
        } else {
            info!("[{}] 选择期间 {}...", flow, period);
        }
        self.execute(state, &plan::period_selection(selection, settle))
            .await?;
        state.advance(Stage::PeriodSelected(flow));

        let artifact = DownloadArtifact::new(&request.output_directory, flow, &period);
        info!(
            "[{}] 📥 导出 Excel ({})...",
            artifact.flow_tag,
            artifact.expected_path.display()
        );
        self.execute(state, &plan::export(self.resolver.export(flow), settle))
            .await?;
        state.advance(Stage::Exported(flow));

        state.begin_step(format!("resolve_download({})", artifact.expected_path.display()));
        let file = downloads
            .resolve(&artifact.expected_path)
            .map_err(|e| {
                let context = state.context();
                error!("❌ 下载落盘失败 {}: {}", context, e);
                CollectError::from_download(context, e)
            })?;
        state.complete_step();

        info!("[{}] ✓ 下载完成", flow);
        Ok(file)
    }

    /// 依次执行动作，第一个失败即返回
    async fn execute(&self, state: &mut RunState, steps: &[ActionStep]) -> CollectResult<()> {
        for step in steps {
            state.begin_step(step.to_string());
            debug!("步骤 #{}: {}", state.completed_steps() + 1, step);

            if let Err(e) = self.perform(step).await {
                let context = state.context();
                error!("❌ 步骤失败 {}: {}", context, e);
                return Err(classify(step, context, e));
            }
            state.complete_step();
        }
        Ok(())
    }

    async fn perform(&self, step: &ActionStep) -> DriverResult<()> {
        match step {
            ActionStep::Navigate(url) => self.driver.navigate(url).await,
            ActionStep::Click(locator) => self.driver.click(locator).await,
            ActionStep::WaitVisible(locator) => {
                self.driver.wait_visible(locator, self.visible_timeout).await
            }
            ActionStep::Sleep(duration) => self.driver.sleep(*duration).await,
            ActionStep::SetDownloadTarget(path) => self.driver.set_download_directory(path).await,
        }
    }
}

fn classify(step: &ActionStep, context: StepContext, source: DriverError) -> CollectError {
    match (step, &source) {
        (ActionStep::Navigate(_), _) => CollectError::NavigationFailure { context, source },
        (_, DriverError::Timeout { .. }) => CollectError::InteractionTimeout { context, source },
        _ => CollectError::InteractionFailure { context, source },
    }
}
