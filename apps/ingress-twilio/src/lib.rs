//! Twilio messaging ingress: logs every inbound WhatsApp/SMS webhook and
//! answers with an empty TwiML `<Response/>` so no auto-reply is sent.
//!
//! ```text
//! Twilio calls `{webhook_path}` (GET or POST); the receiver writes one
//! `INBOUND: {...}` log line and returns `<?xml ...?><Response/>`.
//! ```

pub mod config;
pub mod event;
pub mod handler;
pub mod http;
pub mod twiml;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

pub use config::IngressConfig;
pub use event::{InboundEvent, InboundLogRecord};
pub use handler::{INBOUND_LOG_TARGET, handle_inbound};
pub use http::build_router;
pub use twiml::{MessagingResponse, TwimlError, Verb};

/// Serve the ingress until Ctrl-C.
pub async fn run(config: IngressConfig) -> Result<()> {
    let router = build_router(&config);
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        webhook_path = %config.webhook_path,
        "ingress-twilio listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
