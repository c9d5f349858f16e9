//! Permission reconciliation for web-view bridges.
//!
//! Embedded web content asks the web view for capabilities such as the
//! microphone or camera. Before the host hands one over it must hold the
//! matching OS permission, or the page's own `getUserMedia` call fails
//! with nothing to show for it. [`Reconciler`] makes that decision:
//!
//! ```no_run
//! use bridgekit_notification::LogNotifier;
//! use bridgekit_permission::ScriptedPermissions;
//! use bridgekit_reconciler::{Capability, CapabilityRequest, Reconciler};
//!
//! let reconciler = Reconciler::new(ScriptedPermissions::new(), LogNotifier);
//! let (request, answer) = CapabilityRequest::channel(vec![Capability::AudioCapture]);
//! let reconciliation = reconciler.handle_capability_request(request);
//! if let Some(prompt) = reconciliation.prompt {
//!     // Hand `prompt` to the host's executor, or `settle_prompt` it.
//!     drop(prompt);
//! }
//! # drop(answer);
//! ```
//!
//! At startup, [`Reconciler::request_missing_permissions`] prompts once for
//! every configured permission the app does not hold yet.

#![warn(missing_docs)]

#[cfg(target_os = "android")]
pub mod android;

mod capability;
mod config;
mod policy;
mod reconciler;
mod request;

pub use capability::Capability;
pub use config::{ConfigError, Messages, ReconcilerConfig};
pub use policy::Policy;
pub use reconciler::{PendingPrompt, PromptSummary, Reconciler, Reconciliation, StartupOutcome};
pub use request::{CapabilityRequest, Resolution, ResolutionSink, Responder};
