//! Decoding of account-history entries as the ledger node returns them.
//!
//! Each entry is a two-element JSON array:
//!
//! ```text
//! [17, { "block": 1234, "trx_id": "ab..", "trx_in_block": 3, "op_in_trx": 0,
//!        "virtual_op": 0, "timestamp": "2018-03-01T12:00:00",
//!        "op": ["vote", { "voter": "..", ... }] }]
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::{HistoryError, OperationPayload, RawOperation};

#[derive(Debug, Deserialize)]
struct WireDescriptor {
    block: u64,
    trx_id: String,
    trx_in_block: u32,
    #[serde(default)]
    op_in_trx: u32,
    #[serde(default)]
    #[allow(dead_code)]
    virtual_op: u64,
    timestamp: String,
    op: (String, serde_json::Value),
}

/// Parse a ledger timestamp.
///
/// The node omits the zone designator (`2018-03-01T12:00:00`) but means UTC.
/// Timestamps that do carry a zone are accepted as RFC 3339.
///
/// # Errors
/// Returns `Data` if neither form parses.
pub fn parse_ledger_timestamp(raw: &str) -> Result<DateTime<Utc>, HistoryError> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HistoryError::Data(format!("bad timestamp {raw:?}: {e}")))
}

impl RawOperation {
    /// Decode one history entry.
    ///
    /// # Errors
    /// Returns `Data` if the entry does not have the expected shape.
    pub fn from_wire(value: serde_json::Value) -> Result<Self, HistoryError> {
        let (global_index, d): (u64, WireDescriptor) = serde_json::from_value(value)
            .map_err(|e| HistoryError::Data(format!("malformed history entry: {e}")))?;
        let timestamp = parse_ledger_timestamp(&d.timestamp)?;
        let (name, body) = d.op;
        Ok(Self {
            global_index,
            block_number: d.block,
            trx_in_block: d.trx_in_block,
            transaction_id: d.trx_id,
            op_in_trx: d.op_in_trx,
            timestamp,
            payload: OperationPayload::new(name, body),
        })
    }
}

/// Decode a whole response page, preserving order.
///
/// # Errors
/// Returns the first decoding failure.
pub fn decode_page(values: Vec<serde_json::Value>) -> Result<Vec<RawOperation>, HistoryError> {
    values.into_iter().map(RawOperation::from_wire).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn zoneless_timestamp_is_utc() {
        let got = parse_ledger_timestamp("2018-03-01T12:00:00").unwrap();
        assert_eq!(got, Utc.with_ymd_and_hms(2018, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn zoned_timestamp_is_converted() {
        let got = parse_ledger_timestamp("2018-03-01T14:00:00+02:00").unwrap();
        assert_eq!(got, Utc.with_ymd_and_hms(2018, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn garbage_timestamp_is_data_error() {
        let err = parse_ledger_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, HistoryError::Data(_)));
    }

    #[test]
    fn decodes_vote_entry() {
        let entry = json!([
            42,
            {
                "block": 1000,
                "trx_id": "deadbeef",
                "trx_in_block": 2,
                "op_in_trx": 1,
                "virtual_op": 0,
                "timestamp": "2018-03-01T12:00:03",
                "op": ["vote", { "voter": "alice", "author": "bob", "permlink": "p", "weight": 10000 }]
            }
        ]);
        let op = RawOperation::from_wire(entry).unwrap();
        assert_eq!(op.global_index, 42);
        assert_eq!(op.block_number, 1000);
        assert_eq!(op.trx_in_block, 2);
        assert_eq!(op.op_in_trx, 1);
        let vote = op.payload.as_vote().expect("vote");
        assert_eq!(vote.voter, "alice");
        assert_eq!(vote.weight, 10000);
        assert!(op.payload.as_custom_json().is_none());
    }

    #[test]
    fn malformed_entry_is_data_error() {
        let err = RawOperation::from_wire(json!({"not": "a tuple"})).unwrap_err();
        assert!(matches!(err, HistoryError::Data(_)));
    }
}
