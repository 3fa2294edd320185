use rewind::AccountHistory;
use rewind_demos::common::{DEMO_ACCOUNT, get_source};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,rewind=debug,rewind_core=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Small pages so every fetch and join step shows up in the log
    let history = AccountHistory::builder()
        .source(get_source())
        .account(DEMO_ACCOUNT)
        .page_size(50)
        .overlap_depth(5)
        .build()?;

    let all = history.iter().collect_all().await?;
    tracing::info!(transactions = all.len(), "walked full history");

    Ok(())
}
