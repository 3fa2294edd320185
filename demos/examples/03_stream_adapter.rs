use futures::StreamExt;
use rewind::AccountHistory;
use rewind_demos::common::{DEMO_ACCOUNT, get_source};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let history = AccountHistory::builder()
        .source(get_source())
        .account(DEMO_ACCOUNT)
        .page_size(64)
        .overlap_depth(8)
        .build()?;

    // Only the pages needed for the first ten transactions are fetched.
    let recent: Vec<_> = history.iter().into_stream().take(10).collect().await;
    for trx in recent {
        let trx = trx?;
        println!(
            "{} {} {}",
            trx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            trx.block_number,
            trx.transaction_id
        );
    }

    Ok(())
}
