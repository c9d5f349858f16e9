use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::{Permission, PermissionProvider, PermissionStatus, PromptFuture, PromptSlot};

#[derive(Default)]
struct State {
    statuses: HashMap<Permission, PermissionStatus>,
    answers: HashMap<Permission, bool>,
    prompts: Vec<Vec<Permission>>,
}

/// In-memory permission provider with scripted prompt answers.
///
/// Every permission starts as [`PermissionStatus::NotDetermined`]. When a
/// prompt is shown the scripted answer for each permission is applied
/// (unscripted permissions are refused) and written back into the status
/// table, the way a real OS would remember the user's choice.
///
/// By default prompts are answered immediately. A provider built with
/// [`ScriptedPermissions::holding_prompts`] keeps them pending until
/// [`ScriptedPermissions::release_pending`] is called.
pub struct ScriptedPermissions {
    state: Mutex<State>,
    slot: PromptSlot,
    hold: bool,
}

impl ScriptedPermissions {
    /// Create a provider with nothing granted and nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            slot: PromptSlot::new(),
            hold: false,
        }
    }

    /// Set the initial status of `permission`.
    #[must_use]
    pub fn with_status(self, permission: Permission, status: PermissionStatus) -> Self {
        self.set_status(permission, status);
        self
    }

    /// Script the user's answer for `permission`.
    #[must_use]
    pub fn answering(self, permission: Permission, granted: bool) -> Self {
        self.lock().answers.insert(permission, granted);
        self
    }

    /// Keep prompts pending until [`ScriptedPermissions::release_pending`].
    #[must_use]
    pub fn holding_prompts(mut self) -> Self {
        self.hold = true;
        self
    }

    /// Overwrite the status of `permission`.
    pub fn set_status(&self, permission: Permission, status: PermissionStatus) {
        self.lock().statuses.insert(permission, status);
    }

    /// Every prompt shown so far, oldest first.
    #[must_use]
    pub fn prompts(&self) -> Vec<Vec<Permission>> {
        self.lock().prompts.clone()
    }

    /// The slot holding the in-flight prompt.
    #[must_use]
    pub const fn slot(&self) -> &PromptSlot {
        &self.slot
    }

    /// Answer the held prompt with the scripted answers.
    ///
    /// Returns `false` if no prompt is pending.
    pub fn release_pending(&self) -> bool {
        let Some((code, permissions)) = self.slot.pending() else {
            return false;
        };
        let answers = self.apply_answers(&permissions);
        self.slot.deliver(code, answers)
    }

    fn apply_answers(&self, permissions: &[Permission]) -> Vec<(Permission, bool)> {
        let mut state = self.lock();
        permissions
            .iter()
            .map(|permission| {
                let granted = state.answers.get(permission).copied().unwrap_or(false);
                let status = if granted {
                    PermissionStatus::Granted
                } else {
                    PermissionStatus::Denied
                };
                state.statuses.insert(*permission, status);
                (*permission, granted)
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ScriptedPermissions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScriptedPermissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ScriptedPermissions")
            .field("statuses", &state.statuses)
            .field("prompts", &state.prompts)
            .field("hold", &self.hold)
            .finish_non_exhaustive()
    }
}

impl PermissionProvider for ScriptedPermissions {
    fn check(&self, permission: Permission) -> PermissionStatus {
        self.lock()
            .statuses
            .get(&permission)
            .copied()
            .unwrap_or(PermissionStatus::NotDetermined)
    }

    fn request_many(&self, permissions: &[Permission]) -> PromptFuture {
        debug!("scripted prompt for {permissions:?}");
        self.lock().prompts.push(permissions.to_vec());

        let (code, future) = self.slot.open(permissions);
        if !self.hold {
            let answers = self.apply_answers(permissions);
            self.slot.deliver(code, answers);
        }
        future
    }
}
