//! HTTP execution of platform probes.
//!
//! One GET per probe: the response status is classified against the
//! platform's `available_status`, and transport failures become
//! [`ProbeVerdict::Inconclusive`] rather than errors. Retry, redirects, and
//! TLS details stay inside the `reqwest` client.

use crate::error::HandleCheckError;
use crate::probes::catalog::PlatformSpec;
use crate::probes::Probe;
use crate::types::ProbeVerdict;
use async_trait::async_trait;
use std::time::Duration;

/// Build the shared HTTP client used by all probes in a scan.
///
/// The timeout bounds every individual probe request so a stalled platform
/// can never wedge a verifier worker indefinitely.
pub fn build_probe_client(timeout: Duration) -> Result<reqwest::Client, HandleCheckError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            HandleCheckError::network_with_source("Failed to create probe HTTP client", e.to_string())
        })
}

/// A [`Probe`] that issues a single GET against a platform profile URL.
#[derive(Clone)]
pub struct HttpProbe {
    spec: PlatformSpec,
    client: reqwest::Client,
}

impl HttpProbe {
    /// Create a probe for one platform over a shared client.
    pub fn new(spec: PlatformSpec, client: reqwest::Client) -> Self {
        Self { spec, client }
    }

    /// The descriptor this probe executes.
    pub fn spec(&self) -> &PlatformSpec {
        &self.spec
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn platform(&self) -> &str {
        &self.spec.name
    }

    async fn check(&self, handle: &str) -> ProbeVerdict {
        let url = self.spec.url_for(handle);

        match self.client.get(&url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if status == self.spec.available_status {
                    ProbeVerdict::Available
                } else {
                    tracing::trace!(
                        platform = %self.spec.name,
                        handle,
                        status,
                        "probe classified handle as taken"
                    );
                    ProbeVerdict::Taken
                }
            }
            Err(e) => {
                tracing::debug!(
                    platform = %self.spec.name,
                    handle,
                    error = %e,
                    "probe request failed, treating as inconclusive"
                );
                ProbeVerdict::Inconclusive(e.to_string())
            }
        }
    }
}
