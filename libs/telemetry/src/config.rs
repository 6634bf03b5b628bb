use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub json_logs: bool,
}

impl TelemetryConfig {
    pub fn from_env(default_service_name: &str, default_service_version: &str) -> Self {
        Self::from_lookup(default_service_name, default_service_version, |key| {
            env::var(key).ok()
        })
    }

    /// Same as [`TelemetryConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(
        default_service_name: &str,
        default_service_version: &str,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_name =
            lookup("OTEL_SERVICE_NAME").unwrap_or_else(|| default_service_name.to_string());
        let service_version = lookup("OTEL_SERVICE_VERSION")
            .unwrap_or_else(|| default_service_version.to_string());
        let environment = lookup("OTEL_RESOURCE_ATTRIBUTES")
            .and_then(parse_environment_from_resource)
            .unwrap_or_else(|| lookup("DEPLOYMENT_ENV").unwrap_or_else(|| "dev".into()));
        let json_logs = lookup("LOG_FORMAT")
            .map(|v| !matches!(v.to_lowercase().as_str(), "text" | "pretty" | "plain"))
            .unwrap_or(true);

        Self {
            service_name,
            service_version,
            environment,
            json_logs,
        }
    }
}

fn parse_environment_from_resource(value: String) -> Option<String> {
    for kv in value.split(',') {
        let mut parts = kv.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == "deployment.environment" {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = TelemetryConfig::from_lookup("twilio-ingress", "0.1.0", lookup_from(&[]));
        assert_eq!(cfg.service_name, "twilio-ingress");
        assert_eq!(cfg.service_version, "0.1.0");
        assert_eq!(cfg.environment, "dev");
        assert!(cfg.json_logs);
    }

    #[test]
    fn plain_log_formats_disable_json() {
        for format in ["text", "PRETTY", "plain"] {
            let cfg = TelemetryConfig::from_lookup(
                "svc",
                "0",
                lookup_from(&[("LOG_FORMAT", format)]),
            );
            assert!(!cfg.json_logs, "{format} should disable json logs");
        }
        let cfg = TelemetryConfig::from_lookup("svc", "0", lookup_from(&[("LOG_FORMAT", "json")]));
        assert!(cfg.json_logs);
    }

    #[test]
    fn resource_attributes_take_precedence_over_deployment_env() {
        let cfg = TelemetryConfig::from_lookup(
            "svc",
            "0",
            lookup_from(&[
                (
                    "OTEL_RESOURCE_ATTRIBUTES",
                    "service.namespace=wa, deployment.environment=prod",
                ),
                ("DEPLOYMENT_ENV", "staging"),
            ]),
        );
        assert_eq!(cfg.environment, "prod");
    }

    #[test]
    fn deployment_env_is_used_without_resource_attribute() {
        let cfg = TelemetryConfig::from_lookup(
            "svc",
            "0",
            lookup_from(&[
                ("OTEL_RESOURCE_ATTRIBUTES", "service.namespace=wa"),
                ("DEPLOYMENT_ENV", "staging"),
                ("OTEL_SERVICE_NAME", "receiver"),
            ]),
        );
        assert_eq!(cfg.environment, "staging");
        assert_eq!(cfg.service_name, "receiver");
    }
}
