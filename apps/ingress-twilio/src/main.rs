use anyhow::Result;
use wr_ingress_twilio::{IngressConfig, run};
use wr_telemetry::install as init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry("ingress-twilio")?;

    let config = IngressConfig::from_env()?;
    run(config).await
}
