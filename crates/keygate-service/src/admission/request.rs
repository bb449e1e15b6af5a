//! Inputs to the admission engine.

/// Connection metadata captured for the audit trail.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Source address, `"unknown"` when it cannot be determined.
    pub ip_address: String,
    /// User-Agent header, empty when absent.
    pub user_agent: String,
}

/// A connect attempt.
#[derive(Debug, Clone, Default)]
pub struct ConnectRequest {
    /// Secret or display name of the key.
    pub credential: Option<String>,
    /// Hardware identifier.
    pub hwid: Option<String>,
    /// Connection metadata.
    pub client: ClientInfo,
}

/// A disconnect attempt.
#[derive(Debug, Clone, Default)]
pub struct DisconnectRequest {
    /// Secret or display name of the key.
    pub credential: Option<String>,
    /// Hardware identifier.
    pub hwid: Option<String>,
    /// Connection metadata.
    pub client: ClientInfo,
}

/// Empty strings count as missing.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
