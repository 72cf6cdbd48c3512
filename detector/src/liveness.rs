use crate::model::{Miner, MinerStatus};
use chrono::{DateTime, Duration, Utc};

/// Permitted silence before a miner is flagged as a suspected ghost.
pub const DEFAULT_GHOST_TIMEOUT_SECS: i64 = 75;

pub fn default_ghost_timeout() -> Duration {
    Duration::seconds(DEFAULT_GHOST_TIMEOUT_SECS)
}

/// Computes a miner's status against `now`. Pure and idempotent: it reads
/// `last_heard`, never writes it, so repeated evaluation at a fixed `now`
/// yields the same answer. Silence of exactly the timeout is not yet a ghost
/// (strict greater-than).
pub fn evaluate(miner: &Miner, now: DateTime<Utc>, timeout: Duration) -> MinerStatus {
    if now - miner.last_heard > timeout {
        MinerStatus::SuspectedGhost
    } else if miner.refreshed {
        MinerStatus::Active
    } else {
        MinerStatus::Monitoring
    }
}
