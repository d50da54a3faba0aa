//! Platform descriptors and the built-in platform catalog.
//!
//! Platforms are configuration, not code: each one is a name, a profile URL
//! template, and the HTTP status that means "this handle is unregistered".
//! Adding a platform means adding one [`PlatformSpec`] (via the config file
//! or [`default_platforms`]) with no changes to the verification logic.

use crate::error::HandleCheckError;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the handle when rendering a probe URL.
pub const HANDLE_PLACEHOLDER: &str = "{handle}";

/// Describes how to probe one platform for handle availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    /// Short platform name used in ordering, logs, and CLI selection
    pub name: String,

    /// Profile URL template containing the `{handle}` placeholder
    pub url_template: String,

    /// HTTP status that classifies the handle as available
    /// Default: 404
    #[serde(default = "default_available_status")]
    pub available_status: u16,
}

fn default_available_status() -> u16 {
    404
}

impl PlatformSpec {
    /// Create a spec with the standard `404 ⇒ available` predicate.
    pub fn new<N: Into<String>, T: Into<String>>(name: N, url_template: T) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            available_status: default_available_status(),
        }
    }

    /// Render the probe URL for a handle.
    pub fn url_for(&self, handle: &str) -> String {
        self.url_template.replace(HANDLE_PLACEHOLDER, handle)
    }

    /// Validate the descriptor before any work starts.
    pub fn validate(&self) -> Result<(), HandleCheckError> {
        if self.name.trim().is_empty() {
            return Err(HandleCheckError::config("platform name cannot be empty"));
        }
        if !self.url_template.contains(HANDLE_PLACEHOLDER) {
            return Err(HandleCheckError::config(format!(
                "platform '{}' template '{}' is missing the {} placeholder",
                self.name, self.url_template, HANDLE_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

/// The built-in platform set, in default probe order.
///
/// The order is a policy choice, not a correctness requirement: probing the
/// most selective platform first minimizes request volume under
/// short-circuit evaluation. Callers may reorder or subset it.
pub fn default_platforms() -> Vec<PlatformSpec> {
    vec![
        PlatformSpec::new("github", "https://github.com/{handle}"),
        PlatformSpec::new("twitter", "https://twitter.com/{handle}"),
        PlatformSpec::new("linkedin", "https://www.linkedin.com/in/{handle}"),
        PlatformSpec::new("instagram", "https://www.instagram.com/{handle}/"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_platforms_order() {
        let names: Vec<String> = default_platforms().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["github", "twitter", "linkedin", "instagram"]);
    }

    #[test]
    fn test_url_for_substitutes_handle() {
        let spec = PlatformSpec::new("github", "https://github.com/{handle}");
        assert_eq!(spec.url_for("abc"), "https://github.com/abc");

        let spec = PlatformSpec::new("instagram", "https://www.instagram.com/{handle}/");
        assert_eq!(spec.url_for("xyz"), "https://www.instagram.com/xyz/");
    }

    #[test]
    fn test_validate_rejects_template_without_placeholder() {
        let spec = PlatformSpec::new("broken", "https://example.com/profile");
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("broken"));
        assert!(err.to_string().contains("{handle}"));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let spec = PlatformSpec::new("  ", "https://example.com/{handle}");
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_all_default_platforms_validate() {
        for spec in default_platforms() {
            assert!(spec.validate().is_ok(), "default spec {} invalid", spec.name);
            assert_eq!(spec.available_status, 404);
        }
    }

    #[test]
    fn test_available_status_defaults_in_toml() {
        let spec: PlatformSpec = toml::from_str(
            r#"
name = "mastodon"
url_template = "https://mastodon.social/@{handle}"
"#,
        )
        .unwrap();
        assert_eq!(spec.available_status, 404);
    }
}
