//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 校验配置、加载定位器表
//! - 持有浏览器资源
//!
//! ### `extraction` - 采集状态机
//! - 按固定顺序执行两个导出流程
//! - 全局期限、失败即终止
//!
//! ### `plan` - 动作序列
//! - 每个阶段生成的 `ActionStep` 列表
//!
//! ### `run_state` - 运行状态
//! - 阶段、当前流程、已完成步骤，只用于报告失败位置
//!
//! ## 层次关系
//!
//! ```text
//! app (持有 Browser)
//!     ↓
//! extraction::Orchestrator (状态机)
//!     ↓
//! resolver (定位器表 / 期间解析 / 下载落盘)
//!     ↓
//! infrastructure (UiDriver / ChromiumDriver)
//! ```

pub mod app;
pub mod extraction;
pub mod plan;
pub mod run_state;

pub use app::App;
pub use extraction::{ExtractionReport, Orchestrator};
pub use run_state::{RunState, Stage, StepContext};
