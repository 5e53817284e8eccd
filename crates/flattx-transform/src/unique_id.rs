//! Identifier generation for `unique_id` fields.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use chrono::Utc;
use flattx_model::UniqueIdStrategy;
use uuid::Uuid;

/// Prefix that marks fallback identifiers.
pub const FALLBACK_PREFIX: &str = "unique-";

/// Generate a fresh identifier for the given strategy.
///
/// - `Uuid`: random v4 UUID, canonical hyphenated lowercase form
/// - `Incremental`: nanoseconds since the Unix epoch, measured on a monotonic
///   clock anchored once per process. Values never go backwards within a
///   thread; concurrent callers may observe equal tokens.
/// - `Fallback`: `unique-` followed by the current Unix time in milliseconds
pub fn generate_unique_id(strategy: UniqueIdStrategy) -> String {
    match strategy {
        UniqueIdStrategy::Uuid => Uuid::new_v4().to_string(),
        UniqueIdStrategy::Incremental => monotonic_nanos().to_string(),
        UniqueIdStrategy::Fallback => {
            format!("{FALLBACK_PREFIX}{}", Utc::now().timestamp_millis())
        }
    }
}

fn monotonic_nanos() -> u128 {
    static ANCHOR: OnceLock<(Instant, u128)> = OnceLock::new();
    let (instant, epoch_nanos) = ANCHOR.get_or_init(|| {
        let epoch_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        (Instant::now(), epoch_nanos)
    });
    epoch_nanos + instant.elapsed().as_nanos()
}
