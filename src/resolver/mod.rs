//! 解析层
//!
//! - `table` - 定位器表（TOML 配置）
//! - `parameter` - 期间 → 定位器
//! - `download` - 最新下载 → 确定性文件名

pub mod download;
pub mod parameter;
pub mod table;

pub use download::DownloadResolver;
pub use parameter::{MonthSelection, ParameterResolver, PeriodSelection};
pub use table::{DefaultPeriod, FlowTable, LocatorTable};
