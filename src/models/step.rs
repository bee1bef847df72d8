use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::locator::Locator;

/// 单个浏览器动作的描述
///
/// 只是数据，执行交给 [`UiDriver`](crate::infrastructure::UiDriver)。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStep {
    Navigate(String),
    Click(Locator),
    WaitVisible(Locator),
    Sleep(Duration),
    SetDownloadTarget(PathBuf),
}

impl fmt::Display for ActionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStep::Navigate(url) => write!(f, "navigate({})", url),
            ActionStep::Click(locator) => write!(f, "click({})", locator),
            ActionStep::WaitVisible(locator) => write!(f, "wait_visible({})", locator),
            ActionStep::Sleep(duration) => write!(f, "sleep({}ms)", duration.as_millis()),
            ActionStep::SetDownloadTarget(path) => {
                write!(f, "set_download_target({})", path.display())
            }
        }
    }
}
