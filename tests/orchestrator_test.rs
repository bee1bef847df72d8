mod common;

use std::time::Duration;

use common::{downloading_driver, orchestrator, request, table, Call, MockDriver, PORTAL_URL};
use mpsc_collector::orchestrator::Stage;
use mpsc_collector::{CollectError, Flow, Locator};

#[tokio::test]
async fn test_full_run_produces_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(downloading_driver());

    let report = orchestrator
        .run(&request("12", "2020", dir.path()))
        .await
        .unwrap();

    let expected = vec![
        dir.path().join("membros-ativos-contracheque-12-2020.xlsx"),
        dir.path().join("membros-ativos-verbas-indenizatorias-12-2020.xlsx"),
    ];
    assert_eq!(report.files, expected);
    for file in &expected {
        assert!(file.exists(), "{} 应该存在", file.display());
    }
    assert_eq!(std::fs::read_to_string(&expected[0]).unwrap(), "xlsx #0");
    assert_eq!(std::fs::read_to_string(&expected[1]).unwrap(), "xlsx #1");

    let calls = orchestrator.driver().calls();
    assert_eq!(calls[0], Call::Navigate(PORTAL_URL.to_string()));
    assert_eq!(calls[1], Call::Sleep(Duration::from_millis(250)));
    assert_eq!(calls[2], Call::SetDownloadDirectory(dir.path().to_path_buf()));
}

#[tokio::test]
async fn test_compensation_december_2020_selects_year_and_month() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(downloading_driver());
    orchestrator
        .run(&request("12", "2020", dir.path()))
        .await
        .unwrap();

    let table = table();
    let compensation = table.flow(Flow::Compensation);
    let payroll = table.flow(Flow::Payroll);
    let year = compensation.years.values().nth(2).unwrap().selector().to_string();
    assert_eq!(year, "/html/body/div[5]/div/div[67]/div[3]/div/div[1]/div[5]");

    assert_eq!(
        orchestrator.driver().clicks(),
        vec![
            payroll.entry.selector().to_string(),
            "//*[@title='2020']".to_string(),
            "//*[@title='dez']".to_string(),
            payroll.export.selector().to_string(),
            compensation.entry.selector().to_string(),
            year,
            "/html/body/div[5]/div/div[64]/div[3]/div/div[1]/div[12]".to_string(),
            compensation.export.selector().to_string(),
        ]
    );
    assert!(dir
        .path()
        .join("membros-ativos-verbas-indenizatorias-12-2020.xlsx")
        .exists());
}

#[tokio::test]
async fn test_default_period_skips_month_click() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(downloading_driver());
    let report = orchestrator
        .run(&request("12", "2021", dir.path()))
        .await
        .unwrap();

    assert_eq!(
        report.files[0],
        dir.path().join("membros-ativos-contracheque-12-2021.xlsx")
    );

    let clicks = orchestrator.driver().clicks();
    assert!(clicks.contains(&"//*[@title='2021']".to_string()));
    assert!(!clicks.contains(&Locator::by_title("dez").selector().to_string()));
    let table = table();
    for month in table.flow(Flow::Compensation).months.values() {
        assert!(!clicks.contains(&month.selector().to_string()));
    }
    // 每个流程：入口、年份、导出
    assert_eq!(clicks.len(), 6);
}

#[tokio::test]
async fn test_aborts_after_first_failing_step() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(downloading_driver().fail_at(3));

    let err = orchestrator
        .run(&request("05", "2019", dir.path()))
        .await
        .unwrap_err();

    assert_eq!(orchestrator.driver().calls().len(), 3);
    match err {
        CollectError::InteractionFailure { context, .. } => {
            assert_eq!(context.step_index, 3);
            assert!(context.step.starts_with("set_download_target"));
            assert_eq!(context.stage, Stage::Init);
            assert_eq!(context.period.to_string(), "05/2019");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_navigation_failure() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(downloading_driver().fail_at(1));

    let err = orchestrator
        .run(&request("05", "2019", dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, CollectError::NavigationFailure { .. }));
    assert_eq!(orchestrator.driver().calls().len(), 1);
}

#[tokio::test]
async fn test_unsupported_period_never_touches_browser() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(downloading_driver());

    let err = orchestrator
        .run(&request("01", "2025", dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CollectError::UnsupportedPeriod {
            flow: Flow::Payroll,
            ..
        }
    ));
    assert!(orchestrator.driver().calls().is_empty());
}

#[tokio::test]
async fn test_visibility_timeout_reports_flow() {
    let dir = tempfile::tempdir().unwrap();
    let table = table();
    let month = table.flow(Flow::Compensation).months.values().next_back().unwrap().clone();
    let orchestrator = orchestrator(downloading_driver().times_out_on(&month));

    let err = orchestrator
        .run(&request("12", "2018", dir.path()))
        .await
        .unwrap_err();

    match &err {
        CollectError::InteractionTimeout { context, .. } => {
            assert_eq!(context.flow, Some(Flow::Compensation));
            assert_eq!(context.stage, Stage::FlowSelected(Flow::Compensation));
            assert!(context.step.contains(month.selector()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("verbas-indenizatorias"));
    assert!(err.to_string().contains("12/2018"));

    // 月份等待失败后不再点击
    let calls = orchestrator.driver().calls();
    assert_eq!(calls.last(), Some(&Call::WaitVisible(month.selector().to_string())));
}

#[tokio::test]
async fn test_export_without_download_fails() {
    let dir = tempfile::tempdir().unwrap();
    let table = table();
    // 只有工资单会产生下载
    let driver = MockDriver::new().downloads_on(&table.flow(Flow::Payroll).export);
    let orchestrator = orchestrator(driver);

    let err = orchestrator
        .run(&request("03", "2022", dir.path()))
        .await
        .unwrap_err();

    match err {
        CollectError::DownloadNotFound { context, .. } => {
            assert_eq!(context.flow, Some(Flow::Compensation));
            assert_eq!(context.stage, Stage::Exported(Flow::Compensation));
        }
        other => panic!("unexpected error: {other}"),
    }
    // 工资单产物没有被误认成津贴
    assert!(dir
        .path()
        .join("membros-ativos-contracheque-03-2022.xlsx")
        .exists());
    assert!(!dir
        .path()
        .join("membros-ativos-verbas-indenizatorias-03-2022.xlsx")
        .exists());
}

#[tokio::test(start_paused = true)]
async fn test_collection_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let table = table();
    let entry = table.flow(Flow::Compensation).entry.clone();
    let orchestrator = orchestrator(downloading_driver().hangs_on(&entry));

    let mut request = request("07", "2020", dir.path());
    request.collection_deadline = Duration::from_secs(90);

    let err = orchestrator.run(&request).await.unwrap_err();
    match err {
        CollectError::CollectionTimeout { timeout, context } => {
            assert_eq!(timeout, Duration::from_secs(90));
            assert_eq!(context.flow, Some(Flow::Compensation));
            assert!(context.step.starts_with("wait_visible"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_deadline_includes_time_spent_before_run() {
    let dir = tempfile::tempdir().unwrap();
    let table = table();
    let entry = table.flow(Flow::Payroll).entry.clone();
    let orchestrator = orchestrator(downloading_driver().hangs_on(&entry));

    let mut request = request("07", "2020", dir.path());
    request.collection_deadline = Duration::from_secs(60);

    let start = tokio::time::Instant::now();
    let deadline = start + request.collection_deadline;
    // 浏览器启动已经用掉了 50 秒
    tokio::time::advance(Duration::from_secs(50)).await;

    let err = orchestrator.run_until(&request, deadline).await.unwrap_err();
    assert!(matches!(err, CollectError::CollectionTimeout { .. }));

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(60), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(61), "elapsed {elapsed:?}");
}
