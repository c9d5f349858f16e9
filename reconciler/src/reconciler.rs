use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bridgekit_notification::{Notice, Notifier};
use bridgekit_permission::{
    Permission, PermissionError, PermissionProvider, PermissionStatus, PromptFuture, PromptOutcome,
};
use log::{debug, info, warn};

use crate::{Capability, CapabilityRequest, ConfigError, Policy, ReconcilerConfig, Resolution};

/// An OS prompt triggered as a side effect of a denied request.
///
/// Awaiting it yields the user's answers. Dropping it is fine: the prompt
/// stays on screen and the OS still records the answers.
pub struct PendingPrompt {
    permissions: Vec<Permission>,
    future: PromptFuture,
}

impl PendingPrompt {
    /// The permissions the prompt asks for.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

impl Future for PendingPrompt {
    type Output = Result<PromptOutcome, PermissionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for PendingPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingPrompt")
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

/// What [`Reconciler::handle_capability_request`] did.
#[derive(Debug)]
pub struct Reconciliation {
    /// The answer given to the request.
    pub resolution: Resolution,
    /// The OS prompt triggered alongside a denial, if any.
    pub prompt: Option<PendingPrompt>,
}

/// Classification of an answered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSummary {
    /// The user granted everything asked for.
    AllGranted,
    /// The user refused at least one permission.
    PartiallyDenied {
        /// The refused permissions.
        denied: Vec<Permission>,
    },
}

impl PromptSummary {
    fn classify(outcome: &PromptOutcome) -> Self {
        if outcome.all_granted() {
            Self::AllGranted
        } else {
            Self::PartiallyDenied {
                denied: outcome.denied(),
            }
        }
    }
}

/// Result of [`Reconciler::request_missing_permissions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Nothing was missing, so no prompt was shown.
    AlreadyGranted,
    /// A prompt was shown and answered.
    Prompted(PromptSummary),
}

enum Decision {
    Grant,
    Deny { prompt: Vec<Permission> },
}

/// Decides capability requests from embedded content against OS permissions.
#[derive(Debug)]
pub struct Reconciler<P, N> {
    provider: P,
    notifier: N,
    config: ReconcilerConfig,
}

impl<P, N> Reconciler<P, N>
where
    P: PermissionProvider,
    N: Notifier,
{
    /// Create a reconciler with the default configuration.
    pub fn new(provider: P, notifier: N) -> Self {
        Self::build(provider, notifier, ReconcilerConfig::default())
    }

    /// Create a reconciler with `config`.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptyPromptBundle`] when `config` selects the
    /// lenient policy with nothing to prompt for.
    pub fn with_config(
        provider: P,
        notifier: N,
        config: ReconcilerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(provider, notifier, config))
    }

    fn build(provider: P, notifier: N, config: ReconcilerConfig) -> Self {
        if config.policy.is_superseded() {
            warn!("{:?} policy is superseded by strict checking", config.policy);
        }
        Self {
            provider,
            notifier,
            config,
        }
    }

    /// The active policy.
    pub const fn policy(&self) -> Policy {
        self.config.policy
    }

    /// The active configuration.
    pub const fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// The permission provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The notifier.
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Answer a capability request from embedded content.
    ///
    /// The request is always resolved before this returns. A denial may
    /// come with an OS prompt; its answers do not re-run the request, the
    /// content has to ask again.
    pub fn handle_capability_request(&self, request: CapabilityRequest) -> Reconciliation {
        let (resources, responder) = request.into_parts();
        debug!("capability request for {resources:?} under {:?}", self.config.policy);

        let decision = match self.config.policy {
            Policy::Strict => self.decide_strict(&resources),
            Policy::LenientWithPrompt => self.decide_lenient(),
            Policy::Trusting => {
                warn!("granting {resources:?} without checking OS permissions");
                Decision::Grant
            }
        };

        match decision {
            Decision::Grant => {
                let resolution = responder.grant(resources);
                self.notifier
                    .notify(Notice::short(&self.config.messages.granted));
                Reconciliation {
                    resolution,
                    prompt: None,
                }
            }
            Decision::Deny { prompt } => {
                let resolution = responder.deny();
                self.notifier.notify(Notice::long(&self.config.messages.denied));
                Reconciliation {
                    resolution,
                    prompt: (!prompt.is_empty()).then(|| self.prompt(prompt)),
                }
            }
        }
    }

    fn decide_strict(&self, resources: &[Capability]) -> Decision {
        let mut required: Vec<Permission> = Vec::new();
        for permission in resources.iter().filter_map(Capability::required_permission) {
            if !required.contains(&permission) {
                required.push(permission);
            }
        }

        let mut satisfied = true;
        let mut prompt = Vec::new();
        for permission in required {
            match self.provider.check(permission) {
                PermissionStatus::Granted => {}
                PermissionStatus::NotDetermined => {
                    satisfied = false;
                    prompt.push(permission);
                }
                PermissionStatus::Denied => {
                    debug!("{permission} denied by the user; not prompting again");
                    satisfied = false;
                }
            }
        }

        if satisfied {
            Decision::Grant
        } else {
            Decision::Deny { prompt }
        }
    }

    fn decide_lenient(&self) -> Decision {
        if self.provider.check(Permission::RecordAudio).is_granted() {
            Decision::Grant
        } else {
            Decision::Deny {
                prompt: self.config.prompt_bundle.clone(),
            }
        }
    }

    fn prompt(&self, permissions: Vec<Permission>) -> PendingPrompt {
        info!("prompting for {permissions:?}");
        let future = self.provider.request_many(&permissions);
        PendingPrompt {
            permissions,
            future,
        }
    }

    /// Required permissions not currently granted, in configuration order.
    pub fn missing_permissions(&self) -> Vec<Permission> {
        let mut missing: Vec<Permission> = Vec::new();
        for permission in &self.config.required_permissions {
            if !missing.contains(permission) && !self.provider.check(*permission).is_granted() {
                missing.push(*permission);
            }
        }
        missing
    }

    /// Prompt once for every required permission not yet granted.
    ///
    /// Waits for the user's answers, shows a notice summarizing them and
    /// returns the classification. Nothing is retried.
    ///
    /// # Errors
    /// Returns the provider's [`PermissionError`] if the prompt could not be
    /// shown or was superseded before it was answered.
    pub async fn request_missing_permissions(&self) -> Result<StartupOutcome, PermissionError> {
        let missing = self.missing_permissions();
        if missing.is_empty() {
            debug!("all required permissions already granted");
            return Ok(StartupOutcome::AlreadyGranted);
        }

        let prompt = self.prompt(missing);
        self.settle_prompt(prompt)
            .await
            .map(StartupOutcome::Prompted)
    }

    /// Wait for `prompt` to be answered and notify the user of the result.
    ///
    /// # Errors
    /// Returns the provider's [`PermissionError`] if the prompt failed.
    pub async fn settle_prompt(
        &self,
        prompt: PendingPrompt,
    ) -> Result<PromptSummary, PermissionError> {
        let outcome = prompt.await?;
        let summary = PromptSummary::classify(&outcome);
        info!("permission prompt answered: {summary:?}");

        let messages = &self.config.messages;
        match &summary {
            PromptSummary::AllGranted => {
                self.notifier.notify(Notice::short(&messages.prompt_granted));
            }
            PromptSummary::PartiallyDenied { .. } => {
                self.notifier.notify(Notice::long(&messages.prompt_denied));
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridgekit_notification::{NoticeLength, RecordingNotifier};
    use bridgekit_permission::ScriptedPermissions;

    fn reconciler(
        provider: ScriptedPermissions,
    ) -> Reconciler<ScriptedPermissions, RecordingNotifier> {
        Reconciler::new(provider, RecordingNotifier::new())
    }

    #[test]
    fn repeated_capabilities_are_checked_once() {
        let reconciler = reconciler(ScriptedPermissions::new());
        let (request, _receiver) = CapabilityRequest::channel(vec![
            Capability::AudioCapture,
            Capability::AudioCapture,
            Capability::VideoCapture,
        ]);

        let reconciliation = reconciler.handle_capability_request(request);
        let prompt = reconciliation.prompt.unwrap();

        assert_eq!(
            prompt.permissions(),
            [Permission::RecordAudio, Permission::Camera]
        );
    }

    #[test]
    fn denial_notice_is_long() {
        let reconciler = reconciler(
            ScriptedPermissions::new().with_status(Permission::RecordAudio, PermissionStatus::Denied),
        );
        let (request, _receiver) = CapabilityRequest::channel(vec![Capability::AudioCapture]);

        reconciler.handle_capability_request(request);

        let notices = reconciler.notifier().notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].display_length(), NoticeLength::Long);
    }

    #[test]
    fn missing_permissions_follow_configuration_order() {
        let provider =
            ScriptedPermissions::new().with_status(Permission::Camera, PermissionStatus::Granted);
        let config = ReconcilerConfig::default().with_required_permissions([
            Permission::FineLocation,
            Permission::Camera,
            Permission::RecordAudio,
            Permission::FineLocation,
        ]);
        let reconciler =
            Reconciler::with_config(provider, RecordingNotifier::new(), config).unwrap();

        assert_eq!(
            reconciler.missing_permissions(),
            vec![Permission::FineLocation, Permission::RecordAudio]
        );
    }

    #[test]
    fn lenient_config_without_bundle_is_rejected() {
        let config = ReconcilerConfig::default()
            .with_policy(Policy::LenientWithPrompt)
            .with_prompt_bundle(Vec::new());

        let result = Reconciler::with_config(
            ScriptedPermissions::new(),
            RecordingNotifier::new(),
            config,
        );

        assert!(matches!(result, Err(ConfigError::EmptyPromptBundle)));
    }
}
