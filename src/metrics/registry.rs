use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramVec,
    IntCounterVec, IntGauge,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Error Metrics
    pub static ref ERRORS_TRANSLATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "errors_translated_total",
        "Total failed requests translated into an error response",
        &["error_code"]
    )
    .unwrap();

    // Health Metrics
    pub static ref HEALTH_PROBES_REGISTERED: IntGauge = register_int_gauge!(
        "health_probes_registered",
        "Number of health probes registered at startup"
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&ERRORS_TRANSLATED_TOTAL);
    lazy_static::initialize(&HEALTH_PROBES_REGISTERED);
}
