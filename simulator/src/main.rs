mod reading;

use rand::seq::SliceRandom;
use rand::Rng;
use reading::SensorReading;
use std::env;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let server_url =
        env::var("SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let interval_secs: u64 = env::var("INTERVAL_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);
    let num_sensors: usize = env::var("SENSORS")
        .unwrap_or_else(|_| "1".to_string())
        .parse()
        .unwrap_or(1);

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting field sensor simulator");
    info!(
        "Target: {}, interval: {}s, sensors: {}",
        server_url, interval_secs, num_sensors
    );

    let endpoint = format!("{}/api/v1/readings", server_url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_else(|e| {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        });

    let mut rng = rand::thread_rng();

    loop {
        for (sensor, payload) in generate_batch(&mut rng, num_sensors).into_iter().enumerate() {
            info!(
                "Sensor {}: sending reading rssi={} snr={} size={}",
                sensor, payload.rssi, payload.snr, payload.size
            );

            match client.post(&endpoint).json(&payload).send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.json::<serde_json::Value>().await {
                        Ok(body) => info!("Server responded {}: {}", status, body),
                        Err(e) => {
                            warn!("Server responded {} with unreadable body: {}", status, e)
                        }
                    }
                }
                Err(e) => {
                    error!("Error sending reading: {}", e);
                }
            }
        }

        tokio::time::sleep(Duration::from_secs(interval_secs)).await;
    }
}

fn generate_reading(rng: &mut impl Rng) -> SensorReading {
    // Random but realistic LoRa sniffer numbers.
    let rssi = -rng.gen_range(30..=110);
    let snr = (rng.gen_range(-5.0..10.0) * 10.0_f64).round() / 10.0;
    let size = *[16u32, 32, 64].choose(rng).unwrap_or(&32);

    SensorReading { rssi, snr, size }
}

/// One batch per tick: every simulated sensor reports once.
fn generate_batch(rng: &mut impl Rng, num_sensors: usize) -> Vec<SensorReading> {
    (0..num_sensors).map(|_| generate_reading(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_readings_stay_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let r = generate_reading(&mut rng);
            assert!((-110..=-30).contains(&r.rssi));
            assert!((-5.0..=10.0).contains(&r.snr));
            assert!([16, 32, 64].contains(&r.size));
        }
    }

    #[test]
    fn test_batch_has_one_reading_per_sensor() {
        let mut rng = rand::thread_rng();
        assert_eq!(generate_batch(&mut rng, 1).len(), 1);
        assert_eq!(generate_batch(&mut rng, 5).len(), 5);
        assert!(generate_batch(&mut rng, 0).is_empty());
    }
}
