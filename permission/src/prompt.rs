use std::sync::{Mutex, PoisonError};

use futures::channel::oneshot;
use log::{debug, warn};

use crate::{Permission, PermissionError, PromptFuture, PromptOutcome};

/// First request code handed to the platform prompt.
const FIRST_REQUEST_CODE: i32 = 1001;
/// Android only routes the lower 16 bits of a request code back to the activity.
const MAX_REQUEST_CODE: i32 = 0xFFFF;

type Reply = Result<PromptOutcome, PermissionError>;

struct Pending {
    code: i32,
    permissions: Vec<Permission>,
    sender: oneshot::Sender<Reply>,
}

struct SlotState {
    next_code: i32,
    pending: Option<Pending>,
}

/// Holds the single in-flight OS permission prompt.
///
/// Platform backends open a prompt here, hand the returned request code to
/// the OS, and feed the OS callback back through [`PromptSlot::deliver`].
/// Opening a prompt while another is pending replaces it; the replaced
/// future resolves to [`PermissionError::Superseded`].
pub struct PromptSlot {
    state: Mutex<SlotState>,
}

impl PromptSlot {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                next_code: FIRST_REQUEST_CODE,
                pending: None,
            }),
        }
    }

    /// Register a new prompt for `permissions`.
    ///
    /// Returns the request code to pass to the platform and a future for
    /// the answers.
    pub fn open(&self, permissions: &[Permission]) -> (i32, PromptFuture) {
        let (sender, receiver) = oneshot::channel();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let code = state.next_code;
        state.next_code = if code >= MAX_REQUEST_CODE {
            FIRST_REQUEST_CODE
        } else {
            code + 1
        };

        let previous = state.pending.replace(Pending {
            code,
            permissions: permissions.to_vec(),
            sender,
        });
        drop(state);

        if let Some(previous) = previous {
            debug!("prompt {} superseded by prompt {code}", previous.code);
            let _ = previous.sender.send(Err(PermissionError::Superseded));
        }

        let future = async move { receiver.await.unwrap_or(Err(PermissionError::Superseded)) };
        (code, Box::pin(future))
    }

    /// Complete the pending prompt identified by `code`.
    ///
    /// Permissions that were asked for but are missing from `answers` count
    /// as refused. Returns `false` if `code` does not match the pending
    /// prompt.
    pub fn deliver<I>(&self, code: i32, answers: I) -> bool
    where
        I: IntoIterator<Item = (Permission, bool)>,
    {
        let Some(pending) = self.take(code) else {
            return false;
        };

        let mut outcome: PromptOutcome = pending
            .permissions
            .iter()
            .map(|permission| (*permission, false))
            .collect();
        for (permission, granted) in answers {
            outcome.record(permission, granted);
        }

        let _ = pending.sender.send(Ok(outcome));
        true
    }

    /// Fail the pending prompt identified by `code`.
    pub fn fail(&self, code: i32, error: PermissionError) -> bool {
        let Some(pending) = self.take(code) else {
            return false;
        };
        let _ = pending.sender.send(Err(error));
        true
    }

    /// The request code and permissions of the pending prompt, if any.
    #[must_use]
    pub fn pending(&self) -> Option<(i32, Vec<Permission>)> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .pending
            .as_ref()
            .map(|pending| (pending.code, pending.permissions.clone()))
    }

    fn take(&self, code: i32) -> Option<Pending> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.pending.take() {
            Some(pending) if pending.code == code => Some(pending),
            other => {
                state.pending = other;
                warn!("ignoring result for stale permission prompt {code}");
                None
            }
        }
    }
}

impl Default for PromptSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PromptSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSlot")
            .field("pending", &self.pending())
            .finish()
    }
}
