use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static BOOKINGS_CREATED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static BOOKINGS_CANCELLED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PAYMENTS_VERIFIED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static REFUNDS_PROCESSED_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Installs the HTTP metrics recorder and registers the booking counters.
/// Calling it twice is a no-op.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);

    let registry = Registry::new();

    let created = IntCounterVec::new(
        Opts::new("bookings_created_total", "Bookings created by kind"),
        &["kind"],
    )?;
    let cancelled = IntCounterVec::new(
        Opts::new(
            "bookings_cancelled_total",
            "Cancelled bookings by refund outcome",
        ),
        &["refund_status"],
    )?;
    let verified = IntCounterVec::new(
        Opts::new(
            "payments_verified_total",
            "Payment verifications by portion and result",
        ),
        &["payment_type", "result"],
    )?;
    let refunds = IntCounter::new("refunds_processed_total", "Refunds sent to the gateway")?;

    registry.register(Box::new(created.clone()))?;
    registry.register(Box::new(cancelled.clone()))?;
    registry.register(Box::new(verified.clone()))?;
    registry.register(Box::new(refunds.clone()))?;

    let _ = PROMETHEUS_REGISTRY.set(registry);
    let _ = BOOKINGS_CREATED_TOTAL.set(created);
    let _ = BOOKINGS_CANCELLED_TOTAL.set(cancelled);
    let _ = PAYMENTS_VERIFIED_TOTAL.set(verified);
    let _ = REFUNDS_PROCESSED_TOTAL.set(refunds);

    Ok(())
}

pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

/// `kind` is `ceremony`, `dosha` or `epuja`.
pub fn record_booking_created(kind: &str) {
    if let Some(counter) = BOOKINGS_CREATED_TOTAL.get() {
        counter.with_label_values(&[kind]).inc();
    }
}

pub fn record_booking_cancelled(refund_status: &str) {
    if let Some(counter) = BOOKINGS_CANCELLED_TOTAL.get() {
        counter.with_label_values(&[refund_status]).inc();
    }
}

pub fn record_payment_verification(payment_type: &str, verified: bool) {
    if let Some(counter) = PAYMENTS_VERIFIED_TOTAL.get() {
        let result = if verified { "verified" } else { "rejected" };
        counter.with_label_values(&[payment_type, result]).inc();
    }
}

pub fn record_refund_processed() {
    if let Some(counter) = REFUNDS_PROCESSED_TOTAL.get() {
        counter.inc();
    }
}
