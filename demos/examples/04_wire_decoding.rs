use rewind::{AccountHistory, decode_page};
use rewind_demos::common::DEMO_ACCOUNT;
use rewind_mock::MockHistorySource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A raw `get_account_history` response, oldest entry first.
    let response = serde_json::json!([
        [0, {
            "block": 19_000_000, "trx_id": "a1f3c0de00000000000000000000000000000001",
            "trx_in_block": 4, "op_in_trx": 0, "virtual_op": 0,
            "timestamp": "2018-01-01T00:00:00",
            "op": ["vote", { "voter": "alice", "author": "bob", "permlink": "hello", "weight": 10000 }]
        }],
        [1, {
            "block": 19_000_000, "trx_id": "a1f3c0de00000000000000000000000000000001",
            "trx_in_block": 4, "op_in_trx": 1, "virtual_op": 0,
            "timestamp": "2018-01-01T00:00:00",
            "op": ["custom_json", {
                "id": "follow", "json": "[\"follow\",{\"following\":\"bob\"}]",
                "required_auths": [], "required_posting_auths": ["alice"]
            }]
        }],
        [2, {
            "block": 19_000_007, "trx_id": "b2e4d1ef00000000000000000000000000000002",
            "trx_in_block": 0, "op_in_trx": 0, "virtual_op": 0,
            "timestamp": "2018-01-01T00:00:21",
            "op": ["vote", { "voter": "alice", "author": "carol", "permlink": "news", "weight": -500 }]
        }]
    ]);
    let entries = match response {
        serde_json::Value::Array(entries) => entries,
        _ => Vec::new(),
    };

    let ops = decode_page(entries.clone())?;
    println!("decoded {} operations", ops.len());

    let history = AccountHistory::builder()
        .source(MockHistorySource::from_wire(entries)?.into_shared())
        .account(DEMO_ACCOUNT)
        .page_size(10)
        .overlap_depth(2)
        .build()?;

    for trx in history.iter().collect_all().await? {
        let names: Vec<_> = trx.operations.iter().map(|op| op.name.as_str()).collect();
        println!("{} block {}: {names:?}", trx.transaction_id, trx.block_number);
    }

    Ok(())
}
