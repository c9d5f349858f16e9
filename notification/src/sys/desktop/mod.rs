use log::warn;
use notify_rust::{Notification as NrNotification, Timeout};

use crate::{Notice, NoticeLength, Notifier, NotifyError};

const SHORT_TIMEOUT_MS: u32 = 2_000;
const LONG_TIMEOUT_MS: u32 = 3_500;

/// Shows notices through the desktop notification center.
#[derive(Debug, Clone)]
pub struct SystemNotifier {
    app_name: String,
}

impl SystemNotifier {
    /// Create a notifier that posts under `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    fn show(&self, notice: &Notice) -> Result<(), NotifyError> {
        let timeout = match notice.display_length() {
            NoticeLength::Short => SHORT_TIMEOUT_MS,
            NoticeLength::Long => LONG_TIMEOUT_MS,
        };

        NrNotification::new()
            .summary(&self.app_name)
            .body(notice.text())
            .timeout(Timeout::Milliseconds(timeout))
            .show()
            .map(drop)
            .map_err(|e| NotifyError::Platform(e.to_string()))
    }
}

impl Notifier for SystemNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(err) = self.show(&notice) {
            warn!("failed to show notice {:?}: {err}", notice.text());
        }
    }
}
