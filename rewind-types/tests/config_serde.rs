use rewind_types::{HistoryConfig, HistoryError, MAX_PAGE_SIZE};

#[test]
fn config_roundtrips_through_json() {
    let cfg = HistoryConfig {
        account: "wise-team".to_string(),
        page_size: 500,
        overlap_depth: 10,
    };
    let s = serde_json::to_string(&cfg).unwrap();
    let back: HistoryConfig = serde_json::from_str(&s).unwrap();
    assert_eq!(back, cfg);
    assert!(back.validate().is_ok());
}

#[test]
fn config_validation_reports_offending_option() {
    let short = HistoryConfig::new("ab");
    match short.validate() {
        Err(HistoryError::InvalidArg(msg)) => assert!(msg.contains("account")),
        other => panic!("unexpected: {other:?}"),
    }

    let big = HistoryConfig {
        page_size: MAX_PAGE_SIZE + 1,
        ..HistoryConfig::new("alice")
    };
    match big.validate() {
        Err(HistoryError::InvalidArg(msg)) => assert!(msg.contains("page_size")),
        other => panic!("unexpected: {other:?}"),
    }

    let deep = HistoryConfig {
        page_size: 10,
        overlap_depth: 8,
        ..HistoryConfig::new("alice")
    };
    match deep.validate() {
        Err(HistoryError::InvalidArg(msg)) => assert!(msg.contains("overlap_depth")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn error_serde_and_retry_classification() {
    let err = HistoryError::source("node", "boom");
    let s = serde_json::to_string(&err).unwrap();
    let back: HistoryError = serde_json::from_str(&s).unwrap();
    assert_eq!(back, err);
    assert!(err.is_retryable());
    assert!(!HistoryError::protocol("empty page").is_retryable());
    assert!(!HistoryError::AlreadyDone.is_retryable());
}
