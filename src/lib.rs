//! # MPSC Collector
//!
//! 从 MPSC 透明度门户导出指定月份的工资单和津贴表格。门户没有 API，
//! 只能驱动浏览器完成导航、标签切换、期间选择和导出，再把下载落盘为确定的文件名。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - `UiDriver` 能力抽象，`ChromiumDriver` 是唯一的 page owner
//! - `browser/` - 启动或连接浏览器
//!
//! ### ② 解析层（Resolver）
//! - `LocatorTable` - 启动时加载的定位器表
//! - `ParameterResolver` - (流程, 年份, 月份) → 定位器
//! - `DownloadResolver` - 最新下载 → `membros-ativos-<prefix>-<MM>-<YYYY>.xlsx`
//!
//! ### ③ 编排层（Orchestration）
//! - `Orchestrator` - 状态机，失败即终止，受全局期限约束
//! - `App` - 持有浏览器，组装上述组件
//!
//! ## 运行约束
//!
//! 同一个下载目录同一时间只能有一次采集在运行，否则"最新文件"的判断会错配。

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod resolver;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{CollectError, CollectResult, DownloadError, DriverError};
pub use infrastructure::{ChromiumDriver, UiDriver};
pub use models::{ActionStep, ExtractionRequest, Flow, Locator, Month, Period, Year};
pub use orchestrator::{App, ExtractionReport, Orchestrator};
pub use resolver::{DownloadResolver, LocatorTable, ParameterResolver};
pub use utils::logging;
