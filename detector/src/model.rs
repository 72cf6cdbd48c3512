use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived liveness state of a monitored miner. Never stored as independent
/// truth; always recomputed from `last_heard` and the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinerStatus {
    /// Registered, no reading observed since registration.
    Monitoring,
    /// At least one reading observed within the timeout window.
    Active,
    /// Silent for longer than the ghost timeout.
    SuspectedGhost,
}

/// A miner under watch. The claimed coordinates are an attestation taken at
/// registration time and are never updated afterwards.
#[derive(Debug, Clone)]
pub struct Miner {
    pub mac: String,
    pub claimed_lat: f64,
    pub claimed_lon: f64,
    /// Monotonically non-decreasing per miner.
    pub last_heard: DateTime<Utc>,
    /// Set by the first post-registration reading; display-only distinction
    /// between Monitoring and Active.
    pub refreshed: bool,
}

/// One observation from a field sensor, kept only as a liveness signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    /// Stamped at the ingestion boundary, never taken from the sender.
    pub received_at: DateTime<Utc>,
    pub rssi: f64,
    pub snr: f64,
    pub size: u32,
    /// Network origin of the report, recorded for audit only.
    pub source: String,
}

/// Validated registration request, produced by the boundary's parser.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterRequest {
    pub mac: String,
    pub lat: f64,
    pub lon: f64,
}

/// Validated reading payload, before the registry stamps `received_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingPayload {
    pub rssi: f64,
    pub snr: f64,
    pub size: u32,
}

/// Miner row as reported by the observe endpoint, status already evaluated.
#[derive(Debug, Clone, Serialize)]
pub struct MinerView {
    pub mac: String,
    pub claimed_lat: f64,
    pub claimed_lon: f64,
    pub last_heard: DateTime<Utc>,
    pub status: MinerStatus,
}

/// Observe-state response: miners with live statuses plus the reading log.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub miners: Vec<MinerView>,
    pub readings: Vec<Reading>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub mac: String,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub received: Reading,
}
