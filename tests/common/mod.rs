//! 测试用的脚本化驱动
//!
//! 记录每一次调用；可以在第 N 次调用时失败、在指定元素上超时或挂起，
//! 点击导出按钮时往下载目录写一个随机命名的文件，模拟浏览器下载。

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mpsc_collector::error::{DriverError, DriverResult};
use mpsc_collector::{
    ExtractionRequest, Flow, Locator, LocatorTable, Month, Orchestrator, ParameterResolver,
    UiDriver, Year,
};

pub const PORTAL_URL: &str = "http://portal.test/opendoc.htm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    Click(String),
    WaitVisible(String),
    Sleep(Duration),
    SetDownloadDirectory(PathBuf),
}

#[derive(Default)]
pub struct MockDriver {
    calls: Mutex<Vec<Call>>,
    download_dir: Mutex<Option<PathBuf>>,
    downloads: AtomicUsize,
    /// 第 N 次调用（从 1 开始）返回错误
    fail_at: Option<usize>,
    /// 点击后会产生下载的选择器
    export_triggers: HashSet<String>,
    /// 等待这些选择器时返回超时
    timeout_on: HashSet<String>,
    /// 等待这些选择器时永远挂起
    hang_on: HashSet<String>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub fn downloads_on(mut self, locator: &Locator) -> Self {
        self.export_triggers.insert(locator.selector().to_string());
        self
    }

    pub fn times_out_on(mut self, locator: &Locator) -> Self {
        self.timeout_on.insert(locator.selector().to_string());
        self
    }

    pub fn hangs_on(mut self, locator: &Locator) -> Self {
        self.hang_on.insert(locator.selector().to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Click(selector) => Some(selector),
                _ => None,
            })
            .collect()
    }

    /// 记录调用，返回调用序号
    fn record(&self, call: Call) -> DriverResult<usize> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        let index = calls.len();
        if self.fail_at == Some(index) {
            return Err(DriverError::ElementNotFound {
                selector: format!("scripted failure #{}", index),
            });
        }
        Ok(index)
    }

    fn simulate_download(&self) {
        let dir = self.download_dir.lock().unwrap().clone();
        if let Some(dir) = dir {
            let n = self.downloads.fetch_add(1, Ordering::SeqCst);
            let path = dir.join(format!("download-{}-{:08x}", n, n * 7919 + 17));
            std::fs::write(path, format!("xlsx #{}", n)).unwrap();
        }
    }
}

#[async_trait]
impl UiDriver for MockDriver {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.record(Call::Navigate(url.to_string()))?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> DriverResult<()> {
        self.record(Call::Click(locator.selector().to_string()))?;
        if self.export_triggers.contains(locator.selector()) {
            self.simulate_download();
        }
        Ok(())
    }

    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> DriverResult<()> {
        self.record(Call::WaitVisible(locator.selector().to_string()))?;
        if self.hang_on.contains(locator.selector()) {
            std::future::pending::<()>().await;
        }
        if self.timeout_on.contains(locator.selector()) {
            return Err(DriverError::Timeout {
                selector: locator.selector().to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn sleep(&self, duration: Duration) -> DriverResult<()> {
        self.record(Call::Sleep(duration))?;
        Ok(())
    }

    async fn set_download_directory(&self, path: &Path) -> DriverResult<()> {
        self.record(Call::SetDownloadDirectory(path.to_path_buf()))?;
        *self.download_dir.lock().unwrap() = Some(path.to_path_buf());
        Ok(())
    }
}

pub fn table() -> LocatorTable {
    LocatorTable::builtin().unwrap()
}

/// 两个流程的导出按钮都会产生下载
pub fn downloading_driver() -> MockDriver {
    let table = table();
    MockDriver::new()
        .downloads_on(&table.flow(Flow::Payroll).export)
        .downloads_on(&table.flow(Flow::Compensation).export)
}

pub fn request(month: &str, year: &str, output: &Path) -> ExtractionRequest {
    ExtractionRequest {
        month: Month::from_code(month).unwrap(),
        year: Year::parse(year).unwrap(),
        output_directory: output.to_path_buf(),
        collection_deadline: Duration::from_secs(60),
        step_settle_delay: Duration::from_millis(250),
    }
}

pub fn orchestrator(driver: MockDriver) -> Orchestrator<MockDriver> {
    Orchestrator::new(
        driver,
        ParameterResolver::new(table()),
        PORTAL_URL,
        Duration::from_secs(5),
    )
}
