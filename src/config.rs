use std::path::PathBuf;
use std::time::Duration;

use crate::browser::LaunchOptions;
use crate::error::{CollectError, CollectResult};
use crate::models::{ExtractionRequest, Month, Year};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 采集月份（两位数字）
    pub month: Option<String>,
    /// 采集年份（四位数字）
    pub year: Option<String>,
    /// 下载目录
    pub output_folder: PathBuf,
    /// 整次采集的期限
    pub collection_timeout: Duration,
    /// 每步之后的固定等待
    pub time_between_steps: Duration,
    /// 等待元素可见的期限
    pub visible_timeout: Duration,
    /// 门户地址
    pub portal_url: String,
    /// 是否无头运行
    pub headless: bool,
    /// 浏览器可执行文件
    pub chrome_executable: Option<PathBuf>,
    /// 已打开的浏览器调试端口，设置后不再启动新浏览器
    pub browser_debug_port: Option<u16>,
    /// 外部定位器表
    pub locator_table: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            month: None,
            year: None,
            output_folder: PathBuf::from("./output"),
            collection_timeout: Duration::from_secs(120),
            time_between_steps: Duration::from_millis(5000),
            visible_timeout: Duration::from_secs(30),
            portal_url: "https://transparencia.mpsc.mp.br/QvAJAXZfc/opendoc.htm?document=Portal%20Transparencia%2FPortal%20Transp%20MPSC.qvw&host=QVS%40qvias&anonymous=false".to_string(),
            headless: true,
            chrome_executable: None,
            browser_debug_port: None,
            locator_table: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            month: std::env::var("MONTH").ok().or(default.month),
            year: std::env::var("YEAR").ok().or(default.year),
            output_folder: std::env::var("OUTPUT_FOLDER").map(PathBuf::from).unwrap_or(default.output_folder),
            collection_timeout: std::env::var("GENERAL_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(default.collection_timeout),
            time_between_steps: std::env::var("TIME_BETWEEN_STEPS_MS").ok().and_then(|v| v.parse().ok()).map(Duration::from_millis).unwrap_or(default.time_between_steps),
            visible_timeout: std::env::var("VISIBLE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(default.visible_timeout),
            portal_url: std::env::var("PORTAL_URL").unwrap_or(default.portal_url),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from).or(default.chrome_executable),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(default.browser_debug_port),
            locator_table: std::env::var("LOCATOR_TABLE").ok().map(PathBuf::from).or(default.locator_table),
        }
    }

    /// 浏览器启动参数
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            headless: self.headless,
            executable: self.chrome_executable.clone(),
        }
    }

    /// 校验配置并构造采集请求
    ///
    /// 会创建下载目录，并把它转换为绝对路径（浏览器只接受绝对路径）。
    pub fn extraction_request(&self) -> CollectResult<ExtractionRequest> {
        let month_code = self
            .month
            .as_deref()
            .ok_or_else(|| CollectError::Config("MONTH 未设置".to_string()))?;
        let month = Month::from_code(month_code)
            .ok_or_else(|| CollectError::Config(format!("MONTH 无效: {}", month_code)))?;

        let year_token = self
            .year
            .as_deref()
            .ok_or_else(|| CollectError::Config("YEAR 未设置".to_string()))?;
        let year = Year::parse(year_token)
            .ok_or_else(|| CollectError::Config(format!("YEAR 无效: {}", year_token)))?;

        if self.collection_timeout.is_zero() {
            return Err(CollectError::Config("GENERAL_TIMEOUT_SECS 必须大于 0".to_string()));
        }

        std::fs::create_dir_all(&self.output_folder).map_err(|e| {
            CollectError::Config(format!(
                "无法创建下载目录 {}: {}",
                self.output_folder.display(),
                e
            ))
        })?;
        let output_directory = std::fs::canonicalize(&self.output_folder).map_err(|e| {
            CollectError::Config(format!(
                "无法解析下载目录 {}: {}",
                self.output_folder.display(),
                e
            ))
        })?;

        Ok(ExtractionRequest {
            month,
            year,
            output_directory,
            collection_deadline: self.collection_timeout,
            step_settle_delay: self.time_between_steps,
        })
    }
}
