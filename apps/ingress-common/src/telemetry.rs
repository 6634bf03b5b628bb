use tracing::Span;
use wr_telemetry::{TelemetryLabels, record_counter, with_common_fields};

const INGRESS_COUNTER: &str = "messages_ingressed";

/// Increment the ingress counter for one delivered webhook.
pub fn record_ingress(platform: &str) {
    record_counter(INGRESS_COUNTER, 1, &TelemetryLabels::new(platform));
}

pub fn start_ingress_span(platform: &str, msg_id: Option<&str>, request_id: &str) -> Span {
    let span = tracing::info_span!(
        "ingress.handle",
        platform = tracing::field::Empty,
        msg_id = tracing::field::Empty,
        req_id = %request_id
    );
    with_common_fields(&span, platform, msg_id);
    span
}
