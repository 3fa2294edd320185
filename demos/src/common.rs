use std::sync::Arc;

use rewind::HistorySource;
use rewind_mock::{MockHistorySource, generate_history};

/// Account every demo walks.
pub const DEMO_ACCOUNT: &str = "alice";

/// Return a history source for demos.
///
/// Serves a synthetic history of `REWIND_EXAMPLES_TRX` transactions (default
/// 250), generated from `REWIND_EXAMPLES_SEED` (default 2018).
#[must_use]
pub fn get_source() -> Arc<dyn HistorySource> {
    let trx_count = env_or("REWIND_EXAMPLES_TRX", 250);
    let seed = env_or("REWIND_EXAMPLES_SEED", 2018);
    println!("--- (Using mock history: {trx_count} transactions, seed {seed}) ---");
    MockHistorySource::new(generate_history(
        DEMO_ACCOUNT,
        usize::try_from(trx_count).unwrap_or(usize::MAX),
        2..=5,
        seed,
    ))
    .into_shared()
}

fn env_or(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
