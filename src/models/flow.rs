use std::fmt;

use serde::{Deserialize, Serialize};

/// 导出流程
///
/// 每个流程对应门户上的一棵 UI 子树和一张定位器表。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// 工资单（contracheque）
    Payroll,
    /// 补偿性津贴（verbas indenizatórias）
    Compensation,
}

impl Flow {
    /// 固定执行顺序：先工资单，后津贴
    pub const ORDER: [Flow; 2] = [Flow::Payroll, Flow::Compensation];

    /// 产物文件名前缀，下游解析器依赖这个值
    pub fn file_prefix(self) -> &'static str {
        match self {
            Flow::Payroll => "contracheque",
            Flow::Compensation => "verbas-indenizatorias",
        }
    }

    /// 定位器表中的键名
    pub fn table_key(self) -> &'static str {
        match self {
            Flow::Payroll => "payroll",
            Flow::Compensation => "compensation",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}
