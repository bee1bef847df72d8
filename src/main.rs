use anyhow::Result;
use mpsc_collector::{logging, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    let report = App::initialize(config).await?.run().await?;

    // 结果输出到 stdout，供下游读取
    println!("{}", serde_json::to_string(&report)?);

    Ok(())
}
