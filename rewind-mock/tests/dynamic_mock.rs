use std::time::Duration;

use rewind_core::{HistoryError, HistoryRequest, StartAt};
use rewind_mock::{DynamicMockSource, MockBehavior, generate_history};

#[tokio::test]
async fn test_mock_scripted_return_then_fail() {
    let (mock, controller) = DynamicMockSource::new_with_controller("N0");
    let ops = generate_history("alice", 2, 1..=2, 3);
    controller
        .push_behavior(MockBehavior::Return(ops.clone()))
        .await;
    controller
        .push_behavior(MockBehavior::Fail(HistoryError::source("N0", "boom")))
        .await;

    let req = HistoryRequest::new("alice", StartAt::Latest, 9);
    assert_eq!(mock.fetch_page(&req).await.expect("page"), ops);
    let err = mock.fetch_page(&req).await.expect_err("err");
    assert_eq!(err, HistoryError::source("N0", "boom"));
    // queue drained, no fallback: empty page
    assert!(mock.fetch_page(&req).await.expect("page").is_empty());
}

#[tokio::test]
async fn test_mock_logs_requests() {
    let (mock, controller) = DynamicMockSource::new_with_controller("N0");
    let a = HistoryRequest::new("alice", StartAt::Latest, 9);
    let b = HistoryRequest::new("alice", StartAt::Index(40), 9);
    let _ = mock.fetch_page(&a).await;
    let _ = mock.fetch_page(&b).await;
    assert_eq!(controller.requests().await, vec![a, b]);

    controller.clear_all_behaviors().await;
    assert!(controller.requests().await.is_empty());
}

#[tokio::test]
async fn test_mock_fallback_applies_after_queue() {
    let (mock, controller) = DynamicMockSource::new_with_controller("N0");
    controller
        .set_fallback(MockBehavior::Fail(HistoryError::Other("down".into())))
        .await;
    let req = HistoryRequest::new("alice", StartAt::Latest, 9);
    for _ in 0..3 {
        assert!(matches!(
            mock.fetch_page(&req).await,
            Err(HistoryError::Other(_))
        ));
    }
}

#[tokio::test(start_paused = true)]
async fn test_mock_hang_never_resolves() {
    let (mock, controller) = DynamicMockSource::new_with_controller("N0");
    controller.push_behavior(MockBehavior::Hang).await;
    let req = HistoryRequest::new("alice", StartAt::Latest, 9);
    let res = tokio::time::timeout(Duration::from_secs(30), mock.fetch_page(&req)).await;
    assert!(res.is_err(), "hang should time out");
}
