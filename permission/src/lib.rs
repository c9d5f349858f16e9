//! OS permission state for the web-view bridge.
//!
//! This crate names the OS permissions a hybrid app needs before it can
//! hand microphone, camera or location access to embedded web content,
//! and defines the [`PermissionProvider`] seam through which the
//! reconciler reads and prompts for them.

#![warn(missing_docs)]

mod prompt;
mod scripted;

/// Platform-specific implementations.
pub mod sys;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use prompt::PromptSlot;
pub use scripted::ScriptedPermissions;

/// OS permissions the host may hold on behalf of embedded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// Record audio from the microphone.
    RecordAudio,
    /// Use the camera.
    Camera,
    /// Access precise device location.
    FineLocation,
    /// Change global audio settings (speakerphone, routing).
    ModifyAudioSettings,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::RecordAudio,
        Self::Camera,
        Self::FineLocation,
        Self::ModifyAudioSettings,
    ];

    /// The Android manifest identifier for this permission.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::RecordAudio => "android.permission.RECORD_AUDIO",
            Self::Camera => "android.permission.CAMERA",
            Self::FineLocation => "android.permission.ACCESS_FINE_LOCATION",
            Self::ModifyAudioSettings => "android.permission.MODIFY_AUDIO_SETTINGS",
        }
    }

    /// The kebab-case name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RecordAudio => "record-audio",
            Self::Camera => "camera",
            Self::FineLocation => "fine-location",
            Self::ModifyAudioSettings => "modify-audio-settings",
        }
    }

    /// Look up a permission by its Android manifest identifier.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|permission| permission.identifier() == identifier)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known permission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    /// Accepts either the kebab-case name or the manifest identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|permission| permission.name() == s)
            .or_else(|| Self::from_identifier(s))
            .ok_or_else(|| UnknownPermission(s.to_owned()))
    }
}

/// The current status of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// Permission has been granted by the user.
    Granted,
    /// Permission has been denied by the user.
    Denied,
    /// Permission has not been requested yet.
    NotDetermined,
}

impl PermissionStatus {
    /// Returns `true` for [`PermissionStatus::Granted`].
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Fold Android's binary permission check into a tri-state status.
    ///
    /// Android reports not-granted both before the first prompt and after a
    /// refusal. A permission refused in this process (`answered`) or one the
    /// activity offers a rationale for reads as [`PermissionStatus::Denied`];
    /// anything else not granted has never been asked.
    #[must_use]
    pub const fn from_android_check(granted: bool, answered: bool, rationale: bool) -> Self {
        if granted {
            Self::Granted
        } else if answered || rationale {
            Self::Denied
        } else {
            Self::NotDetermined
        }
    }
}

/// Errors that can occur when prompting for permissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// Runtime prompts are not available on this platform.
    #[error("permission prompts not supported on this platform")]
    NotSupported,
    /// A newer prompt replaced this one before it was answered.
    #[error("permission prompt superseded by a newer request")]
    Superseded,
    /// The platform layer failed.
    #[error("platform error: {0}")]
    Platform(String),
}

/// The user's answers to one batched permission prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptOutcome {
    answers: BTreeMap<Permission, bool>,
}

impl PromptOutcome {
    /// Create an empty outcome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for one permission.
    pub fn record(&mut self, permission: Permission, granted: bool) {
        self.answers.insert(permission, granted);
    }

    /// The answer for `permission`, if it was part of the prompt.
    #[must_use]
    pub fn answer(&self, permission: Permission) -> Option<bool> {
        self.answers.get(&permission).copied()
    }

    /// Returns `true` when every answered permission was granted.
    #[must_use]
    pub fn all_granted(&self) -> bool {
        self.answers.values().all(|granted| *granted)
    }

    /// Permissions the user refused.
    #[must_use]
    pub fn denied(&self) -> Vec<Permission> {
        self.answers
            .iter()
            .filter(|(_, granted)| !**granted)
            .map(|(permission, _)| *permission)
            .collect()
    }

    /// Iterate over `(permission, granted)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Permission, bool)> + '_ {
        self.answers.iter().map(|(p, g)| (*p, *g))
    }

    /// Number of answered permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Returns `true` if nothing was answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(Permission, bool)> for PromptOutcome {
    fn from_iter<T: IntoIterator<Item = (Permission, bool)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Future resolving to the answers of a batched prompt.
pub type PromptFuture = Pin<Box<dyn Future<Output = Result<PromptOutcome, PermissionError>> + Send>>;

/// Source of live OS permission state.
///
/// `check` is a fresh synchronous read every time; implementations must
/// not cache. `request_many` returns immediately and the prompt's answers
/// arrive later through the returned future.
pub trait PermissionProvider {
    /// Read the current status of `permission`.
    fn check(&self, permission: Permission) -> PermissionStatus;

    /// Show one OS prompt covering `permissions`.
    fn request_many(&self, permissions: &[Permission]) -> PromptFuture;
}

impl<P: PermissionProvider + ?Sized> PermissionProvider for &P {
    fn check(&self, permission: Permission) -> PermissionStatus {
        (**self).check(permission)
    }

    fn request_many(&self, permissions: &[Permission]) -> PromptFuture {
        (**self).request_many(permissions)
    }
}

impl<P: PermissionProvider + ?Sized> PermissionProvider for std::sync::Arc<P> {
    fn check(&self, permission: Permission) -> PermissionStatus {
        (**self).check(permission)
    }

    fn request_many(&self, permissions: &[Permission]) -> PromptFuture {
        (**self).request_many(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_check_folds_into_three_states() {
        assert_eq!(
            PermissionStatus::from_android_check(true, true, true),
            PermissionStatus::Granted
        );
        assert_eq!(
            PermissionStatus::from_android_check(true, false, false),
            PermissionStatus::Granted
        );
        assert_eq!(
            PermissionStatus::from_android_check(false, true, false),
            PermissionStatus::Denied
        );
        assert_eq!(
            PermissionStatus::from_android_check(false, false, true),
            PermissionStatus::Denied
        );
        assert_eq!(
            PermissionStatus::from_android_check(false, false, false),
            PermissionStatus::NotDetermined
        );
    }

    #[test]
    fn parses_names_and_manifest_identifiers() {
        assert_eq!("camera".parse(), Ok(Permission::Camera));
        assert_eq!(
            "android.permission.RECORD_AUDIO".parse(),
            Ok(Permission::RecordAudio)
        );
        assert_eq!(
            "sms".parse::<Permission>(),
            Err(UnknownPermission("sms".into()))
        );
    }

    #[test]
    fn outcome_lists_refused_permissions() {
        let outcome: PromptOutcome = [
            (Permission::Camera, false),
            (Permission::RecordAudio, true),
        ]
        .into_iter()
        .collect();

        assert!(!outcome.all_granted());
        assert_eq!(outcome.denied(), vec![Permission::Camera]);
        assert_eq!(outcome.answer(Permission::RecordAudio), Some(true));
        assert_eq!(outcome.answer(Permission::FineLocation), None);
    }

    #[test]
    fn empty_outcome_counts_as_all_granted() {
        assert!(PromptOutcome::new().all_granted());
    }
}
