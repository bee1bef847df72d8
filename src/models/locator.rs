use std::fmt;

/// 定位器的解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorStrategy {
    /// 在整个文档中搜索（例如按 title 属性）
    SearchByText,
    /// 从 `/html` 开始的绝对路径
    Positional,
}

/// UI 元素地址
///
/// 选择器统一为 XPath，策略决定它如何被校验和解析。创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: String,
    strategy: LocatorStrategy,
}

impl Locator {
    /// 按 title 属性定位，例如 `//*[@title='dez']`
    pub fn by_title(title: &str) -> Self {
        Self {
            selector: format!("//*[@title='{}']", title),
            strategy: LocatorStrategy::SearchByText,
        }
    }

    /// 任意文档级 XPath 搜索
    pub fn search(xpath: impl Into<String>) -> Self {
        Self {
            selector: xpath.into(),
            strategy: LocatorStrategy::SearchByText,
        }
    }

    /// 绝对路径定位；路径必须以单个 `/` 开头
    pub fn positional(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        if !path.starts_with('/') || path.starts_with("//") {
            return None;
        }
        Some(Self {
            selector: path,
            strategy: LocatorStrategy::Positional,
        })
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn strategy(&self) -> LocatorStrategy {
        self.strategy
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector)
    }
}
