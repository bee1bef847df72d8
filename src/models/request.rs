//! 采集请求与下载产物

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::flow::Flow;
use crate::models::period::{Month, Period, Year};

/// 一次采集请求
///
/// 由调用方持有，以引用方式贯穿整个流程。
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub month: Month,
    pub year: Year,
    /// 下载目录，运行期间必须由本次请求独占
    pub output_directory: PathBuf,
    /// 整次运行的总期限
    pub collection_deadline: Duration,
    /// 每个 UI 动作之后的固定等待
    pub step_settle_delay: Duration,
}

impl ExtractionRequest {
    pub fn period(&self) -> Period {
        Period::new(self.month, self.year.clone())
    }
}

/// 构造产物文件名：`membros-ativos-<prefix>-<MM>-<YYYY>.xlsx`
pub fn artifact_file_name(flow: Flow, period: &Period) -> String {
    format!(
        "membros-ativos-{}-{}-{}.xlsx",
        flow.file_prefix(),
        period.month.code(),
        period.year
    )
}

/// 一次导出的预期产物
///
/// 在点击导出之前创建，导出完成后由 DownloadResolver 落盘，不跨越流程。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub expected_path: PathBuf,
    pub flow_tag: &'static str,
}

impl DownloadArtifact {
    pub fn new(output_directory: &Path, flow: Flow, period: &Period) -> Self {
        Self {
            expected_path: output_directory.join(artifact_file_name(flow, period)),
            flow_tag: flow.file_prefix(),
        }
    }
}
