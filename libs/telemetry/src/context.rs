#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryLabels {
    pub platform: String,
}

impl TelemetryLabels {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    pub fn tags(&self) -> Vec<(String, String)> {
        vec![("platform".into(), self.platform.clone())]
    }
}
