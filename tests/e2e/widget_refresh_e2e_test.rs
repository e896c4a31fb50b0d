//! End-to-end tests for waiting on dashboard widgets.
//!
//! A widget's content is generated asynchronously by the system under test;
//! the dashboard has to be refreshed until it shows up. These tests drive the
//! poller against the dashboard fake and a mockall mock:
//! 1. content that appears after a few refreshes
//! 2. content that never appears
//! 3. read errors, propagated or tolerated
//! 4. dashboard checks collected with soft assertions and cleaned up by finalizers

use assert_matches::assert_matches;
use provcheck_core::{PollError, Poller};
use provcheck_e2e_tests::utils::{POLL_DELAY_MS, WAIT_TIMEOUT_MS};
use provcheck_test_utils::{
    assertions::assert_polled,
    gen_alphanumeric,
    implementations::FakeDashboard,
    init_test_tracing,
    mocks::{Dashboard, DashboardError, MockDashboard},
    Finalizers, SoftAssert, TestConfig,
};
use std::time::Duration;

fn test_config() -> TestConfig {
    TestConfig {
        timeout: Duration::from_millis(WAIT_TIMEOUT_MS),
        retry_interval: Duration::from_millis(POLL_DELAY_MS),
    }
}

#[test]
fn test_widget_content_appears_after_refreshes() {
    init_test_tracing();
    let dashboard = FakeDashboard::new();
    let title = gen_alphanumeric(12);
    dashboard.add_pending(&title, 3);

    let polled = test_config()
        .poller()
        .message(format!("widget {} to generate content", title))
        .fail_func(|| dashboard.refresh())
        .until(|| dashboard.last_updated(&title).ok().flatten())
        .expect("widget content should be generated");

    assert_eq!(polled.value, Some("refresh #3".to_string()));
    assert_polled(&polled, 4, Duration::from_millis(POLL_DELAY_MS)).unwrap();
    assert_eq!(dashboard.refresh_count(), 3);
}

#[test]
fn test_widget_content_never_appears() {
    init_test_tracing();
    let dashboard = FakeDashboard::new();
    dashboard.add_pending("stuck", usize::MAX);

    let err = Poller::new(Duration::from_millis(40))
        .delay(Duration::from_millis(POLL_DELAY_MS))
        .message("widget stuck to generate content")
        .fail_func(|| dashboard.refresh())
        .until(|| dashboard.last_updated("stuck").ok().flatten())
        .unwrap_err();

    assert_eq!(err.message, "widget stuck to generate content");
    assert_eq!(err.last_value, Some(None));
    assert!(err.attempts >= 2);
    assert!(err.elapsed >= Duration::from_millis(40));
    // One refresh between each pair of evaluations, none after the last
    assert_eq!(dashboard.refresh_count(), err.attempts - 1);
}

#[test]
fn test_read_error_stops_waiting() {
    init_test_tracing();
    let dashboard = FakeDashboard::new();
    dashboard.add_ready("chart", "now");
    dashboard.fail_reads("chart", 1);

    let result = test_config()
        .poller()
        .fail_func(|| dashboard.refresh())
        .try_until(|| dashboard.last_updated("chart"));

    assert_matches!(
        result,
        Err(PollError::Condition { attempt: 1, source: DashboardError::Unavailable(_) })
    );
    assert_eq!(dashboard.refresh_count(), 0);
}

#[test]
fn test_read_errors_tolerated_when_handled() {
    init_test_tracing();
    let dashboard = FakeDashboard::new();
    dashboard.add_ready("chart", "now");
    dashboard.fail_reads("chart", 2);

    let polled = test_config()
        .poller()
        .handle_errors(true)
        .fail_func(|| dashboard.refresh())
        .try_until(|| dashboard.last_updated("chart"))
        .expect("errors should count as failed attempts");

    assert_eq!(polled.value, Some("now".to_string()));
    assert_eq!(polled.attempts, 3);
}

#[test]
fn test_refresh_called_between_polls_on_mock() {
    init_test_tracing();
    let mut dashboard = MockDashboard::new();
    let mut reads = 0;
    dashboard
        .expect_last_updated()
        .times(3)
        .returning(move |_| {
            reads += 1;
            Ok((reads == 3).then(|| "2026-10-16 09:00".to_string()))
        });
    dashboard.expect_refresh().times(2).return_const(());

    let polled = test_config()
        .poller()
        .fail_func(|| dashboard.refresh())
        .try_until(|| dashboard.last_updated("chart"))
        .unwrap();

    assert_eq!(polled.attempts, 3);
    assert_eq!(polled.into_value().as_deref(), Some("2026-10-16 09:00"));
}

#[test]
fn test_widgets_on_dashboard() {
    init_test_tracing();
    let dashboard = FakeDashboard::new();
    let custom_widgets: Vec<String> = (0..3).map(|_| gen_alphanumeric(10)).collect();
    let finalizers = Finalizers::new();

    for title in &custom_widgets {
        dashboard.add_ready(title, "today");
        let dashboard = &dashboard;
        finalizers.add(format!("remove widget {}", title), move || {
            anyhow::ensure!(dashboard.remove(title), "widget {} already gone", title);
            Ok(())
        });
    }

    let soft = SoftAssert::new();
    soft.check_eq(
        dashboard.widget_titles().len(),
        custom_widgets.len(),
        "Count of the widgets",
    );
    for title in &custom_widgets {
        soft.check(
            dashboard.widget_titles().contains(title),
            format!("Widget {} not found on dashboard", title),
        );
    }
    soft.check(
        !dashboard.widget_titles().iter().any(|t| t == "Missing"),
        "unexpected widget Missing",
    );

    finalizers.run_all().unwrap();
    assert!(dashboard.widget_titles().is_empty());
    soft.finish().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_widget_content_async() {
    init_test_tracing();
    let dashboard = FakeDashboard::new();
    dashboard.add_pending("chart", 2);
    let widgets = &dashboard;

    let polled = Poller::new(Duration::from_secs(60))
        .delay(Duration::from_secs(5))
        .fail_func(|| dashboard.refresh())
        .until_async(|| async move { widgets.last_updated("chart").ok().flatten() })
        .await
        .unwrap();

    assert_eq!(polled.attempts, 3);
    assert!(polled.elapsed >= Duration::from_secs(10));
}
