//! Prometheus recorder and metric descriptions

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the global recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .install_recorder()?;
    Ok(handle)
}

/// Register HELP/TYPE lines so every metric shows up from startup.
pub fn describe_metrics() {
    describe_counter!("safecar_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "safecar_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "safecar_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    describe_counter!("safecar_auth_sign_in_total", "Sign-in attempts by result");
    describe_counter!(
        "safecar_telemetry_records_total",
        "Telemetry samples accepted from devices"
    );
    describe_counter!(
        "safecar_insights_generated_total",
        "Insight generation attempts by result"
    );
    describe_counter!(
        "safecar_payment_webhook_events_total",
        "Payment provider webhook events by type"
    );
    describe_counter!(
        "safecar_appointment_transitions_total",
        "Appointment status changes by target status"
    );

    counter!("safecar_auth_sign_in_total", "result" => "success").absolute(0);
    counter!("safecar_auth_sign_in_total", "result" => "failure").absolute(0);
    counter!("safecar_telemetry_records_total").absolute(0);
    counter!("safecar_insights_generated_total", "result" => "success").absolute(0);
    gauge!("safecar_http_requests_in_flight").set(0.0);
}
