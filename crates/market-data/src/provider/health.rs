use serde::Serialize;

/// Availability of an upstream provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Result of a provider health probe.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    pub status: HealthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderHealth {
    pub fn healthy(http_status: u16) -> Self {
        Self {
            status: HealthState::Healthy,
            http_status: Some(http_status),
            error: None,
        }
    }

    pub fn assumed_healthy() -> Self {
        Self {
            status: HealthState::Healthy,
            http_status: None,
            error: None,
        }
    }

    pub fn unhealthy(http_status: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            status: HealthState::Unhealthy,
            http_status,
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}
