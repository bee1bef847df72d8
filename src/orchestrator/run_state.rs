//! 运行状态与步骤上下文
//!
//! 只用于失败时报告"停在哪一步"，不支持断点续跑。

use std::fmt;

use crate::models::{Flow, Period};

/// 状态机阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Navigated,
    FlowSelected(Flow),
    PeriodSelected(Flow),
    Exported(Flow),
    Done,
}

impl Stage {
    pub fn flow(self) -> Option<Flow> {
        match self {
            Stage::FlowSelected(flow) | Stage::PeriodSelected(flow) | Stage::Exported(flow) => {
                Some(flow)
            }
            Stage::Init | Stage::Navigated | Stage::Done => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => write!(f, "init"),
            Stage::Navigated => write!(f, "navigated"),
            Stage::FlowSelected(flow) => write!(f, "flow_selected({})", flow),
            Stage::PeriodSelected(flow) => write!(f, "period_selected({})", flow),
            Stage::Exported(flow) => write!(f, "exported({})", flow),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// 失败步骤的上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepContext {
    /// 失败时已到达的阶段
    pub stage: Stage,
    pub flow: Option<Flow>,
    /// 失败步骤的序号（从 1 开始，全局计数）
    pub step_index: usize,
    pub step: String,
    pub period: Period,
}

impl fmt::Display for StepContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flow = self.flow.map_or("-", |flow| flow.file_prefix());
        write!(
            f,
            "[期间 {} | 流程 {} | 阶段 {} | 步骤 #{} {}]",
            self.period, flow, self.stage, self.step_index, self.step
        )
    }
}

/// 运行状态
#[derive(Debug, Clone)]
pub struct RunState {
    period: Period,
    stage: Stage,
    /// 正在执行的流程（可能还没到达 FlowSelected）
    active_flow: Option<Flow>,
    completed_steps: usize,
    current_step: Option<String>,
}

impl RunState {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            stage: Stage::Init,
            active_flow: None,
            completed_steps: 0,
            current_step: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn active_flow(&self) -> Option<Flow> {
        self.active_flow
    }

    pub fn completed_steps(&self) -> usize {
        self.completed_steps
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub(crate) fn begin_flow(&mut self, flow: Flow) {
        self.active_flow = Some(flow);
    }

    pub(crate) fn advance(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn begin_step(&mut self, description: String) {
        self.current_step = Some(description);
    }

    pub(crate) fn complete_step(&mut self) {
        self.completed_steps += 1;
        self.current_step = None;
    }

    /// 当前（未完成）步骤的上下文
    pub fn context(&self) -> StepContext {
        StepContext {
            stage: self.stage,
            flow: self.active_flow,
            step_index: self.completed_steps + 1,
            step: self
                .current_step
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            period: self.period.clone(),
        }
    }
}
