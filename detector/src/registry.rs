use crate::liveness;
use crate::model::{Miner, MinerView, Reading, ReadingPayload, RegisterRequest};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info};

/// Bound on the retained reading log.
pub const READING_LOG_CAP: usize = 100;

/// Owns the monitored-miner table and the reading log. All mutation goes
/// through here; callers hold it behind a single lock.
#[derive(Debug)]
pub struct Registry {
    miners: HashMap<String, Miner>,
    /// Newest first, never longer than `READING_LOG_CAP`.
    readings: VecDeque<Reading>,
    ghost_timeout: Duration,
}

impl Registry {
    pub fn new(ghost_timeout: Duration) -> Self {
        Self {
            miners: HashMap::new(),
            readings: VecDeque::with_capacity(READING_LOG_CAP),
            ghost_timeout,
        }
    }

    /// Puts a miner under watch. Registration is an upsert: a duplicate mac
    /// overwrites the previous entry, resetting `last_heard` and any ghost
    /// status, and never errors.
    pub fn register(&mut self, req: RegisterRequest, now: DateTime<Utc>) -> MinerView {
        let miner = Miner {
            mac: req.mac.clone(),
            claimed_lat: req.lat,
            claimed_lon: req.lon,
            // Assume heard now so a fresh registration is never an instant ghost.
            last_heard: now,
            refreshed: false,
        };
        let view = self.view_of(&miner, now);
        info!("Started monitoring miner: {}", req.mac);
        self.miners.insert(req.mac, miner);
        view
    }

    /// Stores a reading and refreshes liveness. Every registered miner's
    /// `last_heard` moves to `now` on any accepted reading; no proximity
    /// correlation is done between the reporting sensor and a miner's
    /// claimed coordinates.
    pub fn ingest(&mut self, payload: ReadingPayload, source: String, now: DateTime<Utc>) -> Reading {
        let reading = Reading {
            received_at: now,
            rssi: payload.rssi,
            snr: payload.snr,
            size: payload.size,
            source,
        };

        for miner in self.miners.values_mut() {
            miner.last_heard = now;
            miner.refreshed = true;
        }

        debug!(
            "Received reading from {}: rssi={} snr={} size={}",
            reading.source, reading.rssi, reading.snr, reading.size
        );

        self.readings.push_front(reading.clone());
        if self.readings.len() > READING_LOG_CAP {
            self.readings.pop_back();
        }

        reading
    }

    /// Snapshot of all miners with status evaluated against `now`, sorted by
    /// mac for deterministic output.
    pub fn miners(&self, now: DateTime<Utc>) -> Vec<MinerView> {
        let mut views: Vec<MinerView> = self
            .miners
            .values()
            .map(|m| self.view_of(m, now))
            .collect();
        views.sort_by(|a, b| a.mac.cmp(&b.mac));
        views
    }

    /// Snapshot of the reading log, newest first.
    pub fn readings(&self) -> Vec<Reading> {
        self.readings.iter().cloned().collect()
    }

    pub fn miner_count(&self) -> usize {
        self.miners.len()
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    fn view_of(&self, miner: &Miner, now: DateTime<Utc>) -> MinerView {
        MinerView {
            mac: miner.mac.clone(),
            claimed_lat: miner.claimed_lat,
            claimed_lon: miner.claimed_lon,
            last_heard: miner.last_heard,
            status: liveness::evaluate(miner, now, self.ghost_timeout),
        }
    }
}
