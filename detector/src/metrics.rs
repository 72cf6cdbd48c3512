use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref REGISTRATIONS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "detector_registrations_total",
        "Total miner registrations (including re-registrations)"
    ))
    .unwrap();
    pub static ref READINGS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "detector_readings_total",
        "Total sensor readings accepted"
    ))
    .unwrap();
    pub static ref REJECTED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "detector_rejected_total",
        "Total requests rejected by validation"
    ))
    .unwrap();
    pub static ref MONITORED_MINERS: Gauge = Gauge::with_opts(Opts::new(
        "detector_monitored_miners",
        "Number of miners currently under watch"
    ))
    .unwrap();
    pub static ref READING_LOG_SIZE: Gauge = Gauge::with_opts(Opts::new(
        "detector_reading_log_size",
        "Number of readings retained in the bounded log"
    ))
    .unwrap();
    pub static ref SUSPECTED_GHOSTS: Gauge = Gauge::with_opts(Opts::new(
        "detector_suspected_ghosts",
        "Number of miners flagged as suspected ghosts at last observation"
    ))
    .unwrap();
}

pub fn init_metrics() {
    REGISTRY
        .register(Box::new(REGISTRATIONS_TOTAL.clone()))
        .unwrap();
    REGISTRY.register(Box::new(READINGS_TOTAL.clone())).unwrap();
    REGISTRY.register(Box::new(REJECTED_TOTAL.clone())).unwrap();
    REGISTRY
        .register(Box::new(MONITORED_MINERS.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(READING_LOG_SIZE.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(SUSPECTED_GHOSTS.clone()))
        .unwrap();
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
