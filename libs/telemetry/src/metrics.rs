use crate::context::TelemetryLabels;
use metrics::Label;
use tracing::Span;

pub fn with_common_fields(span: &Span, platform: &str, msg_id: Option<&str>) {
    span.record("platform", tracing::field::display(platform));
    if let Some(msg_id) = msg_id {
        span.record("msg_id", tracing::field::display(msg_id));
    }
}

fn to_labels(labels: &TelemetryLabels) -> Vec<Label> {
    labels
        .tags()
        .into_iter()
        .map(|(key, value)| Label::new(key, value))
        .collect()
}

pub fn record_counter(name: &'static str, value: u64, labels: &TelemetryLabels) {
    metrics::counter!(name, to_labels(labels)).increment(value);
}
