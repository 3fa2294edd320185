use rewind::AccountHistory;
use rewind_demos::common::{DEMO_ACCOUNT, get_source};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Describe the walk: source, account and paging.
    let history = AccountHistory::builder()
        .source(get_source())
        .account(DEMO_ACCOUNT)
        .page_size(100)
        .build()?;

    // 2. Pull transactions newest first until the history runs out.
    let mut iter = history.iter();
    let mut count = 0usize;
    while let Some((trx, is_final)) = iter.next_with_final().await? {
        count += 1;
        if count <= 5 || is_final {
            let votes: Vec<_> = trx
                .operations
                .iter()
                .filter_map(rewind::OperationPayload::as_vote)
                .map(|v| format!("{}/{} ({})", v.author, v.permlink, v.weight))
                .collect();
            println!(
                "#{count:>4} block {} trx {} at {}: {} ops, votes {:?}{}",
                trx.block_number,
                &trx.transaction_id[..8],
                trx.timestamp,
                trx.operations.len(),
                votes,
                if is_final { " (oldest)" } else { "" }
            );
        }
    }

    // 3. The iterator reports completion once; asking again is an error.
    println!("{count} transactions");
    assert!(iter.next_transaction().await.is_err());

    Ok(())
}
