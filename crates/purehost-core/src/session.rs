// ── Array session ──
//
// Owns one authenticated `ArrayClient`. Built from an `ArrayConfig`,
// hands out a `HostReconciler` borrowing the client, and closes the
// session on the way out.

use tracing::{debug, info, warn};

use purehost_api::{ArrayClient, Credentials, Host, TlsMode, TransportConfig};

use crate::config::{ArrayConfig, TlsVerification};
use crate::error::CoreError;
use crate::reconciler::HostReconciler;

/// An authenticated connection to one array.
pub struct ArraySession {
    client: ArrayClient,
}

impl ArraySession {
    /// Build the HTTP client and open a session.
    pub async fn connect(config: &ArrayConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = ArrayClient::new(config.url.clone(), &config.api_version, &transport)?;

        let credentials = Credentials::from(&config.auth);
        let session = client.authenticate(&credentials).await?;
        debug!(username = ?session.username, "session authentication successful");

        info!(url = %config.url, "connected to array");
        Ok(Self { client })
    }

    /// Host lifecycle operations against this array.
    pub fn hosts(&self) -> HostReconciler<&ArrayClient> {
        HostReconciler::new(&self.client)
    }

    /// Raw host records, as the array lists them.
    pub async fn list_hosts(&self) -> Result<Vec<Host>, CoreError> {
        Ok(self.client.list_hosts().await?)
    }

    /// End the session. A failed logout is logged, not returned.
    pub async fn close(self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
        debug!("disconnected");
    }
}

fn build_transport(config: &ArrayConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        cookie_jar: None, // ArrayClient::new adds one
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
