use tracing::{info, warn};

use crate::event::InboundEvent;
use crate::twiml::MessagingResponse;

/// Tracing target of the per-message inbound log line.
pub const INBOUND_LOG_TARGET: &str = "inbound";

/// Log the inbound message and answer with an empty TwiML document so that
/// Twilio sends no auto-reply. There is no failure path.
pub fn handle_inbound(event: &InboundEvent) -> MessagingResponse {
    match serde_json::to_string(&event.log_record()) {
        Ok(record) => info!(target: INBOUND_LOG_TARGET, "INBOUND: {record}"),
        Err(err) => warn!(target: INBOUND_LOG_TARGET, error = %err, "INBOUND: <unserialisable>"),
    }

    MessagingResponse::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn event(from: &str, to: &str, body: Option<&str>, sid: &str) -> InboundEvent {
        InboundEvent {
            from: Some(from.into()),
            to: Some(to.into()),
            body: body.map(str::to_string),
            message_sid: Some(sid.into()),
        }
    }

    #[test]
    #[traced_test]
    fn logs_all_four_fields_once_and_returns_empty_document() {
        let response = handle_inbound(&event("A", "B", Some("hi"), "SM123"));
        assert!(response.is_empty());

        logs_assert(|lines: &[&str]| {
            let inbound: Vec<_> = lines.iter().filter(|l| l.contains("INBOUND:")).collect();
            match inbound.as_slice() {
                [line] if line.contains(
                    r#"{"from":"A","to":"B","body":"hi","messageSid":"SM123"}"#,
                ) =>
                {
                    Ok(())
                }
                other => Err(format!("expected one inbound line, got {other:?}")),
            }
        });
    }

    #[test]
    #[traced_test]
    fn missing_body_is_tolerated() {
        let response = handle_inbound(&event("A", "B", None, "SM124"));
        assert!(response.is_empty());
        assert!(logs_contain(r#"INBOUND: {"from":"A","to":"B","messageSid":"SM124"}"#));
    }

    #[test]
    #[traced_test]
    fn entirely_empty_event_still_logs_and_answers() {
        let response = handle_inbound(&InboundEvent::default());
        assert_eq!(response, MessagingResponse::new());
        assert!(logs_contain("INBOUND: {}"));
    }

    #[test]
    fn repeated_invocations_yield_the_same_document() {
        let input = event("A", "B", Some("hi"), "SM123");
        let first = handle_inbound(&input).to_xml();
        for _ in 0..5 {
            assert_eq!(handle_inbound(&input).to_xml(), first);
        }
        let parsed = MessagingResponse::parse(&first).expect("parse");
        assert!(parsed.verbs().is_empty());
    }
}
