use std::sync::{Arc, Mutex};

use rewind::{AccountHistory, Chainable, Filter, Limiter, Sink, Transaction, Transformer};
use rewind_demos::common::{DEMO_ACCOUNT, get_source};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let history = AccountHistory::builder()
        .source(get_source())
        .account(DEMO_ACCOUNT)
        .page_size(200)
        .build()?;

    let follows = Arc::new(Mutex::new(0usize));
    let follows_in = Arc::clone(&follows);

    // One supplier, two independent branches:
    // - print the five most recent transaction ids, then stop that branch;
    // - count custom_json operations over the whole history.
    let mut supplier = history.supplier();
    supplier
        .branch(|s| {
            s.chain(Limiter::new(5))
                .chain(Transformer::map(|t: Transaction| {
                    format!("{} @ block {}", t.transaction_id, t.block_number)
                }))
                .chain(Sink::new(|line: String| {
                    println!("recent: {line}");
                    true
                }));
        })
        .branch(|s| {
            s.chain(Filter::new(|t: &Transaction| {
                t.operations.iter().any(|op| op.name == "custom_json")
            }))
            .chain(Sink::new(move |t: Transaction| {
                let n = t
                    .operations
                    .iter()
                    .filter_map(rewind::OperationPayload::as_custom_json)
                    .count();
                *follows_in.lock().unwrap_or_else(std::sync::PoisonError::into_inner) += n;
                true
            }))
            .catch(|err| {
                eprintln!("history failed: {err}");
                false
            });
        });

    supplier.start().await?;

    let follows = *follows.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    println!("custom_json operations: {follows}");
    println!("supplier state: {:?}", supplier.state());

    Ok(())
}
