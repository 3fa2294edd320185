use std::sync::Arc;

use proptest::prelude::*;
use rewind::{AccountHistory, HistoryRequest, PaginatingFetcher, StartAt};
use rewind_mock::{MockHistorySource, generate_history, newest_first_transactions};

/// Requests a walk over `len` single-operation records must issue with `page_size`.
fn expected_requests(len: u64, page_size: u64) -> Vec<HistoryRequest> {
    let eff = page_size - 1;
    let calls = len.div_ceil(page_size).max(1);
    (0..calls)
        .map(|k| {
            if k == 0 {
                HistoryRequest::new("alice", StartAt::Latest, eff as u32)
            } else {
                let from = len - 1 - k * page_size;
                HistoryRequest::new("alice", StartAt::Index(from), eff.min(from) as u32)
            }
        })
        .collect()
}

async fn walk(len: usize, page_size: u32) -> (Arc<MockHistorySource>, usize) {
    let mock = Arc::new(MockHistorySource::new(generate_history(
        "alice",
        len,
        1..=1,
        len as u64,
    )));
    let history = AccountHistory::builder()
        .source(mock.clone())
        .account("alice")
        .page_size(page_size)
        .overlap_depth(1)
        .build()
        .unwrap();
    let out = history.iter().collect_all().await.unwrap();
    assert_eq!(out, newest_first_transactions(mock.ops()));
    (mock, out.len())
}

#[tokio::test]
async fn exact_multiple_of_page_size() {
    for n in 1..5u64 {
        let (mock, _) = walk((10 * n) as usize, 10).await;
        assert_eq!(mock.call_count().await, n as usize);
    }
}

#[tokio::test]
async fn one_more_than_a_multiple() {
    for n in 1..5u64 {
        let (mock, _) = walk((10 * n + 1) as usize, 10).await;
        assert_eq!(mock.call_count().await, n as usize + 1);
    }
}

#[tokio::test]
async fn one_less_than_a_multiple() {
    for n in 1..5u64 {
        let (mock, _) = walk((10 * n - 1) as usize, 10).await;
        assert_eq!(mock.call_count().await, n as usize);
    }
}

#[tokio::test]
async fn empty_history_takes_one_call() {
    let (mock, emitted) = walk(0, 10).await;
    assert_eq!(emitted, 0);
    assert_eq!(mock.call_count().await, 1);
}

#[tokio::test]
async fn first_request_uses_latest_and_effective_size() {
    let (mock, _) = walk(25, 10).await;
    let calls = mock.calls().await;
    assert_eq!(calls, expected_requests(25, 10));
    assert_eq!(calls[0].to_params(), serde_json::json!(["alice", -1, 9]));
}

#[tokio::test]
async fn exhausted_fetcher_stops_calling_the_source() {
    let mock = Arc::new(MockHistorySource::new(generate_history("alice", 5, 1..=1, 1)));
    let mut fetcher = PaginatingFetcher::new(mock.clone(), "alice", 10).unwrap();

    let page = fetcher.fetch_next_page().await.unwrap().unwrap();
    assert!(page.is_last);
    assert_eq!(page.fragments.len(), 5);
    assert_eq!(page.fragments[0].block_number, mock.ops()[4].block_number);

    assert!(fetcher.fetch_next_page().await.unwrap().is_none());
    assert!(fetcher.fetch_next_page().await.unwrap().is_none());
    assert_eq!(mock.call_count().await, 1);
}

#[tokio::test]
async fn failed_fetch_leaves_the_cursor_alone() {
    let mock = Arc::new(
        MockHistorySource::new(generate_history("alice", 30, 1..=1, 1)).fail_on_call(2),
    );
    let mut fetcher = PaginatingFetcher::new(mock.clone(), "alice", 10).unwrap();

    fetcher.fetch_next_page().await.unwrap();
    let before = fetcher.cursor();
    assert!(fetcher.fetch_next_page().await.is_err());
    assert_eq!(fetcher.cursor(), before);

    fetcher.fetch_next_page().await.unwrap();
    let calls = mock.calls().await;
    assert_eq!(calls[1], calls[2]);
}

#[test]
fn fetcher_rejects_bad_arguments() {
    let mock = MockHistorySource::new(Vec::new()).into_shared();
    assert!(PaginatingFetcher::new(mock.clone(), "al", 10).is_err());
    assert!(PaginatingFetcher::new(mock.clone(), "alice", 0).is_err());
    assert!(PaginatingFetcher::new(mock.clone(), "alice", rewind::MAX_PAGE_SIZE + 1).is_err());
    assert!(PaginatingFetcher::new(mock, "alice", rewind::MAX_PAGE_SIZE).is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn call_count_and_arguments(len in 0usize..200, page_size in 4u32..40) {
        tokio_test::block_on(async move {
            let (mock, emitted) = walk(len, page_size).await;
            assert_eq!(emitted, len);
            assert_eq!(
                mock.calls().await,
                expected_requests(len as u64, u64::from(page_size))
            );
        });
    }
}
