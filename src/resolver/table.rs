//! 定位器表
//!
//! 进程级只读配置，启动时从 TOML 加载。内置表编译进二进制，
//! 也可以通过 `LOCATOR_TABLE` 指定外部文件覆盖。

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CollectError, CollectResult};
use crate::models::{Flow, Locator, Month, Year};

const BUILTIN_TABLE: &str = include_str!("../../config/locators.toml");

/// TOML 中的定位器写法
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LocatorSpec {
    Title(String),
    Search(String),
    Path(String),
}

impl LocatorSpec {
    fn into_locator(self, key: &str) -> CollectResult<Locator> {
        match self {
            LocatorSpec::Title(title) => Ok(Locator::by_title(&title)),
            LocatorSpec::Search(xpath) => Ok(Locator::search(xpath)),
            LocatorSpec::Path(path) => Locator::positional(path.as_str()).ok_or_else(|| {
                CollectError::LocatorTable(format!("{} 的绝对路径无效: {}", key, path))
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum MonthDerivation {
    /// 由月份缩写生成 title 定位器
    TitleAbbreviation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum MonthsSpec {
    Derived(MonthDerivation),
    Explicit(BTreeMap<String, LocatorSpec>),
}

#[derive(Debug, Clone, Deserialize)]
struct DefaultPeriodSpec {
    year: String,
    month: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FlowTableSpec {
    entry: LocatorSpec,
    export: LocatorSpec,
    years: BTreeMap<String, LocatorSpec>,
    months: MonthsSpec,
    default_period: Option<DefaultPeriodSpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct TableSpec {
    payroll: FlowTableSpec,
    compensation: FlowTableSpec,
}

/// 门户加载时预选的期间
///
/// 不指定月份时，整年都视为默认期间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPeriod {
    pub year: Year,
    pub month: Option<Month>,
}

impl DefaultPeriod {
    pub fn matches(&self, year: &Year, month: Month) -> bool {
        &self.year == year && self.month.map_or(true, |m| m == month)
    }
}

/// 单个流程的定位器
#[derive(Debug, Clone)]
pub struct FlowTable {
    /// 进入流程的入口（工资单磁贴 / 津贴标签页）
    pub entry: Locator,
    /// 导出 Excel 按钮
    pub export: Locator,
    pub years: BTreeMap<Year, Locator>,
    pub months: BTreeMap<Month, Locator>,
    pub default_period: Option<DefaultPeriod>,
}

impl FlowTable {
    fn from_spec(flow: Flow, spec: FlowTableSpec) -> CollectResult<Self> {
        let key = flow.table_key();

        let entry = spec.entry.into_locator(&format!("{}.entry", key))?;
        let export = spec.export.into_locator(&format!("{}.export", key))?;

        let mut years = BTreeMap::new();
        for (token, locator) in spec.years {
            let year = Year::parse(&token).ok_or_else(|| {
                CollectError::LocatorTable(format!("{}.years 中的年份无效: {}", key, token))
            })?;
            let locator = locator.into_locator(&format!("{}.years.{}", key, token))?;
            years.insert(year, locator);
        }

        let months: BTreeMap<Month, Locator> = match spec.months {
            MonthsSpec::Derived(MonthDerivation::TitleAbbreviation) => Month::ALL
                .iter()
                .map(|&m| (m, Locator::by_title(m.abbreviation())))
                .collect(),
            MonthsSpec::Explicit(entries) => {
                let mut months = BTreeMap::new();
                for (code, locator) in entries {
                    let month = Month::from_code(&code).ok_or_else(|| {
                        CollectError::LocatorTable(format!("{}.months 中的月份无效: {}", key, code))
                    })?;
                    let locator = locator.into_locator(&format!("{}.months.{}", key, code))?;
                    months.insert(month, locator);
                }
                months
            }
        };

        let default_period = match spec.default_period {
            Some(period) => {
                let year = Year::parse(&period.year)
                    .filter(|y| years.contains_key(y))
                    .ok_or_else(|| {
                        CollectError::LocatorTable(format!(
                            "{}.default_period 的年份不在年份表中: {}",
                            key, period.year
                        ))
                    })?;
                let month = match period.month {
                    Some(code) => Some(Month::from_code(&code).ok_or_else(|| {
                        CollectError::LocatorTable(format!(
                            "{}.default_period 的月份无效: {}",
                            key, code
                        ))
                    })?),
                    None => None,
                };
                Some(DefaultPeriod { year, month })
            }
            None => None,
        };

        debug!(
            "流程 {} 定位器表: {} 个年份, {} 个月份",
            flow,
            years.len(),
            months.len()
        );

        Ok(Self {
            entry,
            export,
            years,
            months,
            default_period,
        })
    }
}

/// 全部流程的定位器表
#[derive(Debug, Clone)]
pub struct LocatorTable {
    payroll: FlowTable,
    compensation: FlowTable,
}

impl LocatorTable {
    /// 内置定位器表
    pub fn builtin() -> CollectResult<Self> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> CollectResult<Self> {
        let spec: TableSpec = toml::from_str(content)
            .map_err(|e| CollectError::LocatorTable(format!("TOML 解析失败: {}", e)))?;

        Ok(Self {
            payroll: FlowTable::from_spec(Flow::Payroll, spec.payroll)?,
            compensation: FlowTable::from_spec(Flow::Compensation, spec.compensation)?,
        })
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> CollectResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CollectError::LocatorTable(format!("无法读取 {}: {}", path.display(), e))
        })?;
        let table = Self::from_toml_str(&content)?;
        info!("✓ 已加载定位器表: {}", path.display());
        Ok(table)
    }

    pub fn flow(&self, flow: Flow) -> &FlowTable {
        match flow {
            Flow::Payroll => &self.payroll,
            Flow::Compensation => &self.compensation,
        }
    }
}
