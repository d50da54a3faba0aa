//! Joint availability verification across an ordered probe set.
//!
//! The verifier holds the probe order and the short-circuit policy in one
//! place: probes run strictly in sequence, and the first non-available
//! verdict ends evaluation for that handle. Inconclusive probes count as
//! non-available; a handle only passes when every platform positively
//! confirmed it free.

use crate::error::HandleCheckError;
use crate::probes::{build_probe_client, HttpProbe, PlatformSpec, Probe};
use crate::types::{HandleResult, ProbeVerdict};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Evaluates the configured probes for one handle at a time.
///
/// # Example
///
/// ```rust,no_run
/// use handle_check_lib::{default_platforms, HandleVerifier};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let verifier = HandleVerifier::from_specs(&default_platforms(), Duration::from_secs(5))?;
///     let result = verifier.verify("abc").await;
///     println!("{}: available = {}", result.handle, result.available);
///     Ok(())
/// }
/// ```
pub struct HandleVerifier {
    /// Probes in evaluation order. The order is fixed for the lifetime of
    /// the verifier so every handle sees the same policy.
    probes: Vec<Arc<dyn Probe>>,
}

impl HandleVerifier {
    /// Create a verifier from an ordered probe set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the probe set is empty: a scan with no
    /// probes would vacuously report every handle as available.
    pub fn new(probes: Vec<Arc<dyn Probe>>) -> Result<Self, HandleCheckError> {
        if probes.is_empty() {
            return Err(HandleCheckError::config(
                "at least one platform probe is required",
            ));
        }
        Ok(Self { probes })
    }

    /// Build HTTP probes for the given platform descriptors, in order,
    /// sharing a single client with the given per-request timeout.
    pub fn from_specs(
        specs: &[PlatformSpec],
        timeout: Duration,
    ) -> Result<Self, HandleCheckError> {
        for spec in specs {
            spec.validate()?;
        }

        let client = build_probe_client(timeout)?;
        let probes = specs
            .iter()
            .map(|spec| Arc::new(HttpProbe::new(spec.clone(), client.clone())) as Arc<dyn Probe>)
            .collect();

        Self::new(probes)
    }

    /// Number of configured probes.
    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    /// Platform names in evaluation order.
    pub fn platform_order(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.platform()).collect()
    }

    /// Decide joint availability for one handle.
    ///
    /// Probes run in configured order; evaluation stops at the first probe
    /// that does not return `Available`, and the remaining probes are never
    /// invoked for that handle.
    pub async fn verify(&self, handle: &str) -> HandleResult {
        let started = Instant::now();
        let mut probes_run = 0;

        for probe in &self.probes {
            probes_run += 1;
            match probe.check(handle).await {
                ProbeVerdict::Available => continue,
                ProbeVerdict::Taken => {
                    return HandleResult {
                        handle: handle.to_string(),
                        available: false,
                        rejected_by: Some(probe.platform().to_string()),
                        probes_run,
                        check_duration: Some(started.elapsed()),
                    };
                }
                ProbeVerdict::Inconclusive(reason) => {
                    tracing::debug!(
                        handle,
                        platform = probe.platform(),
                        %reason,
                        "inconclusive probe, marking handle unavailable"
                    );
                    return HandleResult {
                        handle: handle.to_string(),
                        available: false,
                        rejected_by: Some(probe.platform().to_string()),
                        probes_run,
                        check_duration: Some(started.elapsed()),
                    };
                }
            }
        }

        HandleResult {
            handle: handle.to_string(),
            available: true,
            rejected_by: None,
            probes_run,
            check_duration: Some(started.elapsed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A probe that returns a fixed verdict and counts its invocations.
    struct ScriptedProbe {
        name: String,
        verdict: ProbeVerdict,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(name: &str, verdict: ProbeVerdict) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                verdict,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        fn platform(&self) -> &str {
            &self.name
        }

        async fn check(&self, _handle: &str) -> ProbeVerdict {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.clone()
        }
    }

    #[tokio::test]
    async fn test_available_only_when_every_probe_agrees() {
        let a = ScriptedProbe::new("a", ProbeVerdict::Available);
        let b = ScriptedProbe::new("b", ProbeVerdict::Available);
        let verifier = HandleVerifier::new(vec![a.clone(), b.clone()]).unwrap();

        let result = verifier.verify("abc").await;
        assert!(result.available);
        assert_eq!(result.rejected_by, None);
        assert_eq!(result.probes_run, 2);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_circuit_stops_at_first_taken() {
        let first = ScriptedProbe::new("first", ProbeVerdict::Available);
        let second = ScriptedProbe::new("second", ProbeVerdict::Taken);
        let third = ScriptedProbe::new("third", ProbeVerdict::Available);
        let verifier =
            HandleVerifier::new(vec![first.clone(), second.clone(), third.clone()]).unwrap();

        let result = verifier.verify("abc").await;
        assert!(!result.available);
        assert_eq!(result.rejected_by.as_deref(), Some("second"));
        assert_eq!(result.probes_run, 2);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0, "probe after short-circuit must not run");
    }

    #[tokio::test]
    async fn test_inconclusive_is_conservatively_unavailable() {
        let flaky = ScriptedProbe::new(
            "flaky",
            ProbeVerdict::Inconclusive("connection reset".to_string()),
        );
        let after = ScriptedProbe::new("after", ProbeVerdict::Available);
        let verifier = HandleVerifier::new(vec![flaky.clone(), after.clone()]).unwrap();

        let result = verifier.verify("abc").await;
        assert!(!result.available);
        assert_eq!(result.rejected_by.as_deref(), Some("flaky"));
        assert_eq!(after.calls(), 0);
    }

    #[tokio::test]
    async fn test_probe_order_is_evaluation_order() {
        let a = ScriptedProbe::new("alpha", ProbeVerdict::Taken);
        let b = ScriptedProbe::new("beta", ProbeVerdict::Taken);
        let verifier = HandleVerifier::new(vec![a.clone(), b.clone()]).unwrap();

        let result = verifier.verify("abc").await;
        // Only the first probe in configured order may run
        assert_eq!(result.rejected_by.as_deref(), Some("alpha"));
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 0);
    }

    #[test]
    fn test_empty_probe_set_is_rejected() {
        assert!(HandleVerifier::new(Vec::new()).is_err());
    }

    #[test]
    fn test_from_specs_validates_templates() {
        let specs = vec![PlatformSpec::new("bad", "https://example.com/no-placeholder")];
        assert!(HandleVerifier::from_specs(&specs, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_platform_order_reflects_specs() {
        let specs = crate::probes::default_platforms();
        let verifier = HandleVerifier::from_specs(&specs, Duration::from_secs(1)).unwrap();
        assert_eq!(
            verifier.platform_order(),
            vec!["github", "twitter", "linkedin", "instagram"]
        );
    }
}
