//! Hosting configuration for the Twilio ingress.

use std::{
    fs,
    net::SocketAddr,
    path::Path,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub const CONFIG_PATH_ENV: &str = "INGRESS_CONFIG";
pub const DEFAULT_BIND: &str = "0.0.0.0:8088";
pub const DEFAULT_WEBHOOK_PATH: &str = "/whatsapp";
pub const HEALTH_PATH: &str = "/healthz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressConfig {
    pub addr: SocketAddr,
    pub webhook_path: String,
}

#[derive(Debug, Default, Deserialize)]
struct IngressFile {
    #[serde(default)]
    bind: Option<String>,
    #[serde(default)]
    webhook_path: Option<String>,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8088)),
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

impl IngressConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an optional YAML file named by
    /// `INGRESS_CONFIG`, with `BIND` and `TWILIO_WEBHOOK_PATH` taking precedence.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(CONFIG_PATH_ENV) {
            Some(path) => load_file(Path::new(&path))?,
            None => IngressFile::default(),
        };

        let bind = lookup("BIND")
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let addr: SocketAddr = bind
            .trim()
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;

        let webhook_path = normalize_path(
            &lookup("TWILIO_WEBHOOK_PATH")
                .or(file.webhook_path)
                .unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string()),
        )?;

        Ok(Self { addr, webhook_path })
    }
}

fn load_file(path: &Path) -> Result<IngressFile> {
    if !path.exists() {
        return Ok(IngressFile::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read ingress config {}", path.display()))?;
    serde_yaml_bw::from_str(&raw).with_context(|| format!("parse ingress config {}", path.display()))
}

fn normalize_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    if path == "/" {
        bail!("webhook path must not be the root path");
    }
    if path == HEALTH_PATH {
        bail!("webhook path {HEALTH_PATH} is reserved for health checks");
    }
    let has_capture = path.split('/').any(|segment| segment.starts_with(':'));
    if has_capture || path.contains(['{', '}', '*', '?', '#']) {
        bail!("webhook path {path:?} must be a literal path");
    }
    Ok(path)
}
