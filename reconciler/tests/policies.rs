//! Capability request handling under each policy.

use std::sync::{Arc, Mutex};

use bridgekit_notification::RecordingNotifier;
use bridgekit_permission::{Permission, PermissionStatus, ScriptedPermissions};
use bridgekit_reconciler::{
    Capability, CapabilityRequest, Policy, PromptSummary, Reconciler, ReconcilerConfig,
    Resolution, Responder,
};

type TestReconciler = Reconciler<ScriptedPermissions, RecordingNotifier>;

fn reconciler(policy: Policy, provider: ScriptedPermissions) -> TestReconciler {
    let config = ReconcilerConfig::default().with_policy(policy);
    Reconciler::with_config(provider, RecordingNotifier::new(), config).unwrap()
}

/// A request whose responder records every call it receives.
fn recorded_request(resources: Vec<Capability>) -> (CapabilityRequest, Arc<Mutex<Vec<Resolution>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let responder = Responder::new(move |resolution: Resolution| {
        sink.lock().unwrap().push(resolution);
    });
    (CapabilityRequest::new(resources, responder), calls)
}

#[test]
fn strict_grants_audio_when_microphone_is_held() {
    let provider = ScriptedPermissions::new()
        .with_status(Permission::RecordAudio, PermissionStatus::Granted)
        .with_status(Permission::Camera, PermissionStatus::NotDetermined);
    let reconciler = reconciler(Policy::Strict, provider);
    let (request, calls) = recorded_request(vec![Capability::AudioCapture]);

    let reconciliation = reconciler.handle_capability_request(request);

    assert_eq!(
        *calls.lock().unwrap(),
        vec![Resolution::Granted(vec![Capability::AudioCapture])]
    );
    assert!(reconciliation.prompt.is_none());
    assert!(reconciler.provider().prompts().is_empty());
    assert_eq!(
        reconciler.notifier().texts(),
        vec![reconciler.config().messages.granted.clone()]
    );
}

#[test]
fn strict_denies_and_prompts_for_undetermined_permissions() {
    let reconciler = reconciler(Policy::Strict, ScriptedPermissions::new());
    let (request, calls) =
        recorded_request(vec![Capability::AudioCapture, Capability::VideoCapture]);

    let reconciliation = reconciler.handle_capability_request(request);

    assert_eq!(*calls.lock().unwrap(), vec![Resolution::Denied]);
    let prompt = reconciliation.prompt.expect("prompt triggered");
    assert_eq!(
        prompt.permissions(),
        [Permission::RecordAudio, Permission::Camera]
    );
    assert_eq!(
        reconciler.provider().prompts(),
        vec![vec![Permission::RecordAudio, Permission::Camera]]
    );
}

#[test]
fn strict_never_reprompts_a_denied_permission() {
    let provider =
        ScriptedPermissions::new().with_status(Permission::RecordAudio, PermissionStatus::Denied);
    let reconciler = reconciler(Policy::Strict, provider);
    let (request, calls) = recorded_request(vec![Capability::AudioCapture]);

    let reconciliation = reconciler.handle_capability_request(request);

    assert_eq!(*calls.lock().unwrap(), vec![Resolution::Denied]);
    assert!(reconciliation.prompt.is_none());
    assert!(reconciler.provider().prompts().is_empty());
}

#[test]
fn strict_prompt_excludes_granted_and_denied_permissions() {
    let provider = ScriptedPermissions::new()
        .with_status(Permission::RecordAudio, PermissionStatus::Denied)
        .with_status(Permission::Camera, PermissionStatus::NotDetermined);
    let reconciler = reconciler(Policy::Strict, provider);
    let (request, calls) =
        recorded_request(vec![Capability::VideoCapture, Capability::AudioCapture]);

    let reconciliation = reconciler.handle_capability_request(request);

    assert_eq!(*calls.lock().unwrap(), vec![Resolution::Denied]);
    assert_eq!(
        reconciliation.prompt.unwrap().permissions(),
        [Permission::Camera]
    );
}

#[test]
fn strict_grants_the_full_original_request() {
    let provider = ScriptedPermissions::new()
        .with_status(Permission::RecordAudio, PermissionStatus::Granted)
        .with_status(Permission::Camera, PermissionStatus::Granted);
    let reconciler = reconciler(Policy::Strict, provider);
    let resources = vec![
        Capability::VideoCapture,
        Capability::ProtectedMediaId,
        Capability::AudioCapture,
        Capability::Other("vendor.resource.X".into()),
    ];
    let (request, calls) = recorded_request(resources.clone());

    let reconciliation = reconciler.handle_capability_request(request);

    assert_eq!(reconciliation.resolution, Resolution::Granted(resources.clone()));
    assert_eq!(*calls.lock().unwrap(), vec![Resolution::Granted(resources)]);
}

#[test]
fn strict_grants_an_empty_request() {
    let reconciler = reconciler(Policy::Strict, ScriptedPermissions::new());
    let (request, calls) = recorded_request(Vec::new());

    let reconciliation = reconciler.handle_capability_request(request);

    assert_eq!(*calls.lock().unwrap(), vec![Resolution::Granted(Vec::new())]);
    assert!(reconciliation.prompt.is_none());
    assert!(reconciler.provider().prompts().is_empty());
}

#[test]
fn strict_grants_capabilities_without_os_permission() {
    let reconciler = reconciler(Policy::Strict, ScriptedPermissions::new());
    let (request, calls) = recorded_request(vec![Capability::MidiSysex]);

    let reconciliation = reconciler.handle_capability_request(request);

    assert!(reconciliation.resolution.is_granted());
    assert_eq!(calls.lock().unwrap().len(), 1);
    assert!(reconciler.provider().prompts().is_empty());
}

#[test]
fn strict_reads_os_state_fresh_on_every_request() {
    let reconciler = reconciler(Policy::Strict, ScriptedPermissions::new());

    let (first, _) = recorded_request(vec![Capability::AudioCapture]);
    assert!(!reconciler.handle_capability_request(first).resolution.is_granted());

    reconciler
        .provider()
        .set_status(Permission::RecordAudio, PermissionStatus::Granted);

    let (second, _) = recorded_request(vec![Capability::AudioCapture]);
    assert!(reconciler.handle_capability_request(second).resolution.is_granted());
}

#[test]
fn lenient_checks_only_the_microphone() {
    let provider = ScriptedPermissions::new()
        .with_status(Permission::RecordAudio, PermissionStatus::Granted)
        .with_status(Permission::Camera, PermissionStatus::Denied);
    let reconciler = reconciler(Policy::LenientWithPrompt, provider);
    let (request, calls) =
        recorded_request(vec![Capability::AudioCapture, Capability::VideoCapture]);

    reconciler.handle_capability_request(request);

    assert_eq!(
        *calls.lock().unwrap(),
        vec![Resolution::Granted(vec![
            Capability::AudioCapture,
            Capability::VideoCapture
        ])]
    );
}

#[test]
fn lenient_prompts_for_the_configured_bundle() {
    let config = ReconcilerConfig::default()
        .with_policy(Policy::LenientWithPrompt)
        .with_prompt_bundle([Permission::RecordAudio, Permission::FineLocation]);
    let provider =
        ScriptedPermissions::new().with_status(Permission::RecordAudio, PermissionStatus::Denied);
    let reconciler = Reconciler::with_config(provider, RecordingNotifier::new(), config).unwrap();
    let (request, calls) = recorded_request(vec![Capability::VideoCapture]);

    let reconciliation = reconciler.handle_capability_request(request);

    assert_eq!(*calls.lock().unwrap(), vec![Resolution::Denied]);
    assert_eq!(
        reconciliation.prompt.unwrap().permissions(),
        [Permission::RecordAudio, Permission::FineLocation]
    );
}

#[test]
fn trusting_grants_regardless_of_os_state() {
    let provider = ScriptedPermissions::new()
        .with_status(Permission::RecordAudio, PermissionStatus::Denied)
        .with_status(Permission::Camera, PermissionStatus::Denied);
    let reconciler = reconciler(Policy::Trusting, provider);
    let (request, calls) =
        recorded_request(vec![Capability::AudioCapture, Capability::VideoCapture]);

    let reconciliation = reconciler.handle_capability_request(request);

    assert!(reconciliation.prompt.is_none());
    assert_eq!(
        *calls.lock().unwrap(),
        vec![Resolution::Granted(vec![
            Capability::AudioCapture,
            Capability::VideoCapture
        ])]
    );
    assert!(reconciler.provider().prompts().is_empty());
}

#[test]
fn every_policy_resolves_exactly_once() {
    let statuses = [
        PermissionStatus::Granted,
        PermissionStatus::Denied,
        PermissionStatus::NotDetermined,
    ];
    for policy in [Policy::Strict, Policy::LenientWithPrompt, Policy::Trusting] {
        for audio in statuses {
            for camera in statuses {
                let provider = ScriptedPermissions::new()
                    .with_status(Permission::RecordAudio, audio)
                    .with_status(Permission::Camera, camera);
                let reconciler = reconciler(policy, provider);
                let (request, calls) =
                    recorded_request(vec![Capability::AudioCapture, Capability::VideoCapture]);

                let reconciliation = reconciler.handle_capability_request(request);
                drop(reconciliation);

                let calls = calls.lock().unwrap();
                assert_eq!(calls.len(), 1, "{policy:?} {audio:?} {camera:?}");
            }
        }
    }
}

#[tokio::test]
async fn settled_prompt_does_not_retry_the_request() {
    let provider = ScriptedPermissions::new().answering(Permission::RecordAudio, true);
    let reconciler = reconciler(Policy::Strict, provider);
    let (request, calls) = recorded_request(vec![Capability::AudioCapture]);

    let reconciliation = reconciler.handle_capability_request(request);
    let summary = reconciler
        .settle_prompt(reconciliation.prompt.unwrap())
        .await
        .unwrap();

    assert_eq!(summary, PromptSummary::AllGranted);
    assert_eq!(*calls.lock().unwrap(), vec![Resolution::Denied]);

    // The content asks again and now succeeds.
    let (retry, calls) = recorded_request(vec![Capability::AudioCapture]);
    reconciler.handle_capability_request(retry);
    assert!(calls.lock().unwrap()[0].is_granted());
}
