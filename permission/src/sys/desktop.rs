//! Desktop permission provider.
//!
//! Desktop operating systems have no runtime prompt for microphone, camera
//! or location inside an embedded web view: access is governed by device
//! files, sandbox portals or user groups outside the app. Everything reads
//! as granted.

use crate::{Permission, PermissionProvider, PermissionStatus, PromptFuture, PromptOutcome};

/// Permission provider for Linux, Windows and macOS hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopPermissions;

impl PermissionProvider for DesktopPermissions {
    fn check(&self, _permission: Permission) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn request_many(&self, permissions: &[Permission]) -> PromptFuture {
        let outcome: PromptOutcome = permissions.iter().map(|p| (*p, true)).collect();
        Box::pin(async move { Ok(outcome) })
    }
}
