//! # Bridgekit
//!
//! Permission bridging for hybrid apps that host web content in an
//! embedded web view.
//!
//! When a page asks for the microphone or camera, the web view forwards
//! the request to the host. Bridgekit decides it against the OS
//! permissions the app actually holds, prompts for missing ones, and tells
//! the user what happened.
//!
//! ## Features
//!
//! - `permission`: OS permission identifiers, status and providers.
//! - `notification`: short user notices (toasts, desktop notifications).
//! - `reconciler`: the capability-request reconciler (default).
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! bridgekit = { version = "0.1", features = ["full"] }
//! ```
//!
//! ```rust
//! use bridgekit::notification::LogNotifier;
//! use bridgekit::permission::ScriptedPermissions;
//! use bridgekit::reconciler::{Reconciler, StartupOutcome};
//!
//! async fn startup() {
//!     let reconciler = Reconciler::new(ScriptedPermissions::new(), LogNotifier);
//!     if let Ok(StartupOutcome::Prompted(summary)) =
//!         reconciler.request_missing_permissions().await
//!     {
//!         println!("startup prompt: {summary:?}");
//!     }
//! }
//! ```

#[cfg(feature = "notification")]
pub use bridgekit_notification as notification;

#[cfg(feature = "permission")]
pub use bridgekit_permission as permission;

#[cfg(feature = "reconciler")]
pub use bridgekit_reconciler as reconciler;
