use serde::{Deserialize, Serialize};

/// How capability requests are checked against OS permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Grant only when every mapped OS permission is held.
    ///
    /// Otherwise deny, and prompt for the permissions the user has not yet
    /// answered. Permissions the OS reports as denied are never prompted
    /// again, so a refusal cannot turn into a prompt loop.
    #[default]
    Strict,
    /// Superseded. Check only the microphone permission; when missing,
    /// prompt for the configured bundle and deny.
    #[serde(rename = "lenient")]
    LenientWithPrompt,
    /// Superseded and unsafe. Grant everything without looking at OS state.
    ///
    /// Only correct when the startup prompt is known to have secured every
    /// permission; otherwise web content is handed a capability whose
    /// acquisition then fails silently inside the page.
    Trusting,
}

impl Policy {
    /// Returns `true` for the policies kept only for compatibility.
    #[must_use]
    pub const fn is_superseded(self) -> bool {
        !matches!(self, Self::Strict)
    }
}
