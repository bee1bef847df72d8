/// 日志工具模块
///
/// 日志统一写到 stderr，stdout 只输出采集结果。
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::ExtractionRequest;
use crate::orchestrator::ExtractionReport;

/// 初始化日志
///
/// 默认级别 `info`，可通过 `RUST_LOG` 调整。重复调用不会报错。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(request: &ExtractionRequest) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 开始采集 {} - {}",
        request.period(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📁 下载目录: {}", request.output_directory.display());
    info!(
        "⏱️ 总期限: {}s, 步骤间隔: {}ms",
        request.collection_deadline.as_secs(),
        request.step_settle_delay.as_millis()
    );
    info!("{}", "=".repeat(60));
}

/// 记录采集结果
pub fn log_report(report: &ExtractionReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 采集完成 {}/{}", report.month, report.year);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    for file in &report.files {
        info!("✅ {}", file.display());
    }
    info!("{}", "=".repeat(60));
}
