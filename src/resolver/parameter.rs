//! 期间参数解析
//!
//! 把 (流程, 年份, 月份) 映射为选择该期间所需的定位器。

use tracing::debug;

use crate::error::{CollectError, CollectResult};
use crate::models::{Flow, Locator, Month, Period, Year};
use crate::resolver::table::LocatorTable;

/// 月份选择方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthSelection {
    /// 点击该月份
    Click(Locator),
    /// 默认期间，门户已经预选，不点击月份
    Skip,
}

/// 选择期间所需的定位器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSelection {
    pub year: Locator,
    pub month: MonthSelection,
}

impl PeriodSelection {
    pub fn skips_month(&self) -> bool {
        self.month == MonthSelection::Skip
    }
}

/// 期间参数解析器
pub struct ParameterResolver {
    table: LocatorTable,
}

impl ParameterResolver {
    pub fn new(table: LocatorTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LocatorTable {
        &self.table
    }

    /// 流程入口定位器
    pub fn entry(&self, flow: Flow) -> &Locator {
        &self.table.flow(flow).entry
    }

    /// 流程导出按钮定位器
    pub fn export(&self, flow: Flow) -> &Locator {
        &self.table.flow(flow).export
    }

    /// 解析期间
    ///
    /// 年份或月份不在表中时返回 `UnsupportedPeriod`，不做任何默认回退。
    /// 请求的期间等于流程的默认期间时，只返回年份定位器。
    pub fn resolve(&self, flow: Flow, year: &Year, month: Month) -> CollectResult<PeriodSelection> {
        let table = self.table.flow(flow);
        let unsupported = || CollectError::UnsupportedPeriod {
            flow,
            period: Period::new(month, year.clone()),
        };

        let year_locator = table.years.get(year).ok_or_else(unsupported)?;
        let month_locator = table.months.get(&month).ok_or_else(unsupported)?;

        let is_default = table
            .default_period
            .as_ref()
            .is_some_and(|p| p.matches(year, month));

        let month = if is_default {
            debug!("流程 {} 期间 {}/{} 为默认期间，跳过月份选择", flow, month, year);
            MonthSelection::Skip
        } else {
            MonthSelection::Click(month_locator.clone())
        };

        Ok(PeriodSelection {
            year: year_locator.clone(),
            month,
        })
    }
}
