//! 各阶段的动作序列
//!
//! 纯函数，只生成 [`ActionStep`]，不执行。

use std::path::Path;
use std::time::Duration;

use crate::models::{ActionStep, Locator};
use crate::resolver::{MonthSelection, PeriodSelection};

/// Init → Navigated：打开门户并设置下载目录
pub fn navigation(portal_url: &str, output_directory: &Path, settle: Duration) -> Vec<ActionStep> {
    vec![
        ActionStep::Navigate(portal_url.to_string()),
        ActionStep::Sleep(settle),
        ActionStep::SetDownloadTarget(output_directory.to_path_buf()),
    ]
}

/// → FlowSelected：进入流程（工资单磁贴 / 津贴标签页）
pub fn flow_selection(entry: &Locator, settle: Duration) -> Vec<ActionStep> {
    vec![
        ActionStep::WaitVisible(entry.clone()),
        ActionStep::Click(entry.clone()),
        ActionStep::Sleep(settle),
    ]
}

/// → PeriodSelected：选择年份，必要时选择月份
///
/// 默认期间只点击年份。
pub fn period_selection(selection: &PeriodSelection, settle: Duration) -> Vec<ActionStep> {
    let mut steps = vec![
        ActionStep::WaitVisible(selection.year.clone()),
        ActionStep::Sleep(settle),
        ActionStep::Click(selection.year.clone()),
        ActionStep::Sleep(settle),
    ];
    if let MonthSelection::Click(month) = &selection.month {
        steps.push(ActionStep::WaitVisible(month.clone()));
        steps.push(ActionStep::Click(month.clone()));
        steps.push(ActionStep::Sleep(settle));
    }
    steps
}

/// → Exported：点击导出按钮并等待下载
pub fn export(trigger: &Locator, settle: Duration) -> Vec<ActionStep> {
    vec![
        ActionStep::WaitVisible(trigger.clone()),
        ActionStep::Click(trigger.clone()),
        ActionStep::Sleep(settle),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_click_waits_first() {
        let selection = PeriodSelection {
            year: Locator::by_title("2020"),
            month: MonthSelection::Click(Locator::by_title("dez")),
        };
        let settle = Duration::from_millis(10);
        let steps: Vec<_> = [
            flow_selection(&Locator::search("//*[@id='67']"), settle),
            period_selection(&selection, settle),
            export(&Locator::by_title("Enviar para Excel"), settle),
        ]
        .concat();

        for (i, step) in steps.iter().enumerate() {
            if let ActionStep::Click(target) = step {
                let waited = steps[..i]
                    .iter()
                    .rev()
                    .find(|s| !matches!(s, ActionStep::Sleep(_)));
                assert_eq!(waited, Some(&ActionStep::WaitVisible(target.clone())));
            }
        }
    }

    #[test]
    fn test_default_period_has_no_month_click() {
        let year = Locator::by_title("2021");
        let selection = PeriodSelection {
            year: year.clone(),
            month: MonthSelection::Skip,
        };
        let steps = period_selection(&selection, Duration::ZERO);
        let clicks: Vec<_> = steps
            .iter()
            .filter(|s| matches!(s, ActionStep::Click(_)))
            .collect();
        assert_eq!(clicks, vec![&ActionStep::Click(year)]);
    }
}
