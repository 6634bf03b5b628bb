use axum::{
    Extension, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, RawQuery},
    http::{HeaderMap, header::CONTENT_TYPE},
    middleware,
    routing::get,
};
use tracing::warn;
use wr_ingress_common::{RequestId, healthz, record_ingress, start_ingress_span, with_request_id};

use crate::config::{HEALTH_PATH, IngressConfig};
use crate::event::{InboundEvent, decode_body, decode_query};
use crate::handler::handle_inbound;
use crate::twiml::MessagingResponse;

pub const PLATFORM: &str = "twilio";

/// Router exposing the webhook (GET and POST) and the health probe.
/// Bodies are not size limited so an oversized delivery is still answered.
pub fn build_router(config: &IngressConfig) -> Router {
    Router::new()
        .route(&config.webhook_path, get(receive).post(receive))
        .route(HEALTH_PATH, get(healthz))
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(with_request_id))
}

async fn receive(
    Extension(request_id): Extension<RequestId>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> MessagingResponse {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let event = extract_event(query.as_deref(), content_type, &body);

    let span = start_ingress_span(PLATFORM, event.message_sid.as_deref(), request_id.as_str());
    let response = span.in_scope(|| handle_inbound(&event));
    record_ingress(PLATFORM);
    response
}

/// Merge query and body parameters the way Twilio Functions build `event`.
/// Parameters that cannot be decoded are dropped; the request never fails.
pub fn extract_event(
    query: Option<&str>,
    content_type: Option<&str>,
    body: &[u8],
) -> InboundEvent {
    let from_query = match query.map(decode_query).transpose() {
        Ok(event) => event.unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "ignoring undecodable webhook query");
            InboundEvent::default()
        }
    };
    let from_body = match decode_body(content_type, body) {
        Ok(event) => event,
        Err(err) => {
            warn!(
                error = %err,
                content_type = content_type.unwrap_or(""),
                "ignoring undecodable webhook body"
            );
            InboundEvent::default()
        }
    };
    from_query.overlay(from_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_parameters_override_query_parameters() {
        let event = extract_event(
            Some("From=q&To=q-to"),
            Some("application/x-www-form-urlencoded"),
            b"From=b&Body=hi",
        );
        assert_eq!(event.from.as_deref(), Some("b"));
        assert_eq!(event.to.as_deref(), Some("q-to"));
        assert_eq!(event.body.as_deref(), Some("hi"));
    }

    #[test]
    fn undecodable_body_keeps_query_parameters() {
        let event = extract_event(
            Some("MessageSid=SM9"),
            Some("application/json"),
            b"{not json",
        );
        assert_eq!(event.message_sid.as_deref(), Some("SM9"));
        assert_eq!(event.body, None);
    }

    #[test]
    fn nothing_at_all_is_an_empty_event() {
        assert_eq!(extract_event(None, None, b""), InboundEvent::default());
    }

    #[test]
    fn accepted_config_paths_build_a_router() {
        for path in ["/whatsapp", "/hooks/twilio", "/in:bound"] {
            let config = IngressConfig::from_lookup(|key| {
                (key == "TWILIO_WEBHOOK_PATH").then(|| path.to_string())
            })
            .expect("config");
            let _router = build_router(&config);
        }
    }
}
