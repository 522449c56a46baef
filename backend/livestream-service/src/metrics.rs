use std::time::Duration;

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, TextEncoder};

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "livestream_service_http_requests_total",
            "Total HTTP requests handled by livestream-service",
        ),
        &["method", "path", "status"],
    )
    .expect("failed to create livestream_service_http_requests_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register livestream_service_http_requests_total");
    counter
});

static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "livestream_service_http_request_duration_seconds",
            "HTTP request latency for livestream-service",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
        ]),
        &["method", "path", "status"],
    )
    .expect("failed to create livestream_service_http_request_duration_seconds");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("failed to register livestream_service_http_request_duration_seconds");
    histogram
});

static STREAMS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new(
        "livestream_service_streams_created_total",
        "Streams created",
    )
    .expect("failed to create livestream_service_streams_created_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register livestream_service_streams_created_total");
    counter
});

static STREAMS_ENDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new("livestream_service_streams_ended_total", "Streams ended")
        .expect("failed to create livestream_service_streams_ended_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register livestream_service_streams_ended_total");
    counter
});

static COMMENTS_CREATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "livestream_service_comments_created_total",
            "Comment submissions, labelled by whether they folded into an existing comment",
        ),
        &["deduplicated"],
    )
    .expect("failed to create livestream_service_comments_created_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register livestream_service_comments_created_total");
    counter
});

pub fn observe_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    let status_label = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status_label])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path, &status_label])
        .observe(elapsed.as_secs_f64());
}

pub fn record_stream_created() {
    STREAMS_CREATED_TOTAL.inc();
}

pub fn record_stream_ended() {
    STREAMS_ENDED_TOTAL.inc();
}

pub fn record_comment_submitted(deduplicated: bool) {
    let label = if deduplicated { "true" } else { "false" };
    COMMENTS_CREATED_TOTAL.with_label_values(&[label]).inc();
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
