//! Reconciler configuration.
//!
//! Configuration is plain JSON. Every field is optional:
//!
//! ```json
//! {
//!     "policy": "strict",
//!     "required_permissions": ["record-audio", "camera", "fine-location"],
//!     "messages": { "granted": "Microphone ready" }
//! }
//! ```

use std::path::Path;

use bridgekit_permission::Permission;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Policy;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has unknown fields.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The lenient policy was selected with nothing to prompt for.
    #[error("the lenient policy needs a non-empty prompt_bundle")]
    EmptyPromptBundle,
}

/// Texts of the notices the reconciler shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    /// Shown when a capability request is granted.
    pub granted: String,
    /// Shown when a capability request is denied.
    pub denied: String,
    /// Shown when a prompt ends with everything granted.
    pub prompt_granted: String,
    /// Shown when a prompt ends with something refused.
    pub prompt_denied: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            granted: "Microphone enabled".into(),
            denied: "Microphone permission missing. Allow it in Settings.".into(),
            prompt_granted: "Permissions granted".into(),
            prompt_denied: "Some permissions were denied. Open Settings > Apps > Permissions to allow them.".into(),
        }
    }
}

/// Configuration of a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcilerConfig {
    /// Which policy decides capability requests.
    pub policy: Policy,
    /// Permissions requested at startup.
    pub required_permissions: Vec<Permission>,
    /// Permissions prompted for by the lenient policy.
    pub prompt_bundle: Vec<Permission>,
    /// Notice texts.
    pub messages: Messages,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Strict,
            required_permissions: Permission::ALL.to_vec(),
            prompt_bundle: Permission::ALL.to_vec(),
            messages: Messages::default(),
        }
    }
}

impl ReconcilerConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] for malformed input and
    /// [`ConfigError::EmptyPromptBundle`] for an unusable lenient policy.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`ReconcilerConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check settings that cannot be expressed in the JSON shape.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptyPromptBundle`] when the lenient policy has
    /// nothing to prompt for.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policy == Policy::LenientWithPrompt && self.prompt_bundle.is_empty() {
            return Err(ConfigError::EmptyPromptBundle);
        }
        Ok(())
    }

    /// Use `policy`.
    #[must_use]
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Use `permissions` as the startup list.
    #[must_use]
    pub fn with_required_permissions(mut self, permissions: impl Into<Vec<Permission>>) -> Self {
        self.required_permissions = permissions.into();
        self
    }

    /// Use `permissions` as the lenient policy's prompt bundle.
    #[must_use]
    pub fn with_prompt_bundle(mut self, permissions: impl Into<Vec<Permission>>) -> Self {
        self.prompt_bundle = permissions.into();
        self
    }
}
