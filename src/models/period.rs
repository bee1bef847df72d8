//! 采集期间（月份 + 年份）

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// 月份枚举
///
/// 门户上的月份按葡语三字母缩写展示，文件名则使用两位数字代码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// 全部月份，按自然顺序
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 获取月份序号（1-12）
    pub fn number(self) -> u8 {
        self as u8
    }

    /// 获取两位数字代码，例如 `"03"`
    pub fn code(self) -> String {
        format!("{:02}", self.number())
    }

    /// 获取门户使用的葡语缩写（title 属性值）
    pub fn abbreviation(self) -> &'static str {
        match self {
            Month::January => "jan",
            Month::February => "fev",
            Month::March => "mar",
            Month::April => "abr",
            Month::May => "mai",
            Month::June => "jun",
            Month::July => "jul",
            Month::August => "ago",
            Month::September => "set",
            Month::October => "out",
            Month::November => "nov",
            Month::December => "dez",
        }
    }

    /// 从序号解析月份
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// 从数字代码解析月份
    ///
    /// 接受 `"01"`..`"12"`，也接受不补零的 `"1"`..`"9"`。
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() || code.len() > 2 || !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        code.parse::<u8>().ok().and_then(Self::from_number)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.number())
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("年份正则表达式无效"))
}

/// 年份标记（四位数字字符串）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Year(String);

impl Year {
    /// 解析年份，必须恰好是四位数字
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        year_pattern()
            .is_match(token)
            .then(|| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 采集期间
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    pub month: Month,
    pub year: Year,
}

impl Period {
    pub fn new(month: Month, year: Year) -> Self {
        Self { month, year }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}
