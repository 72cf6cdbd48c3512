use serde::{Deserialize, Serialize};

/// Wire payload a field sensor reports for each sniffed packet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub rssi: i32,
    pub snr: f64,
    pub size: u32,
}
