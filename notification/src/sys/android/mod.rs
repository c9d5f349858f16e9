//! Android toast notices using JNI.

use jni::objects::{GlobalRef, JObject, JValue};
use jni::sys::jint;
use jni::{JNIEnv, JavaVM};
use log::warn;

use crate::{Notice, NoticeLength, Notifier, NotifyError};

/// `Toast.LENGTH_SHORT`.
const LENGTH_SHORT: jint = 0;
/// `Toast.LENGTH_LONG`.
const LENGTH_LONG: jint = 1;

fn platform(err: impl std::fmt::Display) -> NotifyError {
    NotifyError::Platform(err.to_string())
}

/// Shows notices as `android.widget.Toast`s.
///
/// Toasts must be shown from the UI thread, which is where the reconciler
/// runs.
pub struct ToastNotifier {
    vm: JavaVM,
    context: GlobalRef,
}

impl ToastNotifier {
    /// Bind a notifier to `context`, usually the host activity.
    ///
    /// # Errors
    /// Returns [`NotifyError::Platform`] if the VM or a global reference
    /// cannot be obtained.
    pub fn new(env: &JNIEnv, context: &JObject) -> Result<Self, NotifyError> {
        Ok(Self {
            vm: env.get_java_vm().map_err(platform)?,
            context: env.new_global_ref(context).map_err(platform)?,
        })
    }

    fn show(&self, notice: &Notice) -> Result<(), NotifyError> {
        let mut env = self.vm.attach_current_thread().map_err(platform)?;
        let text = env.new_string(notice.text()).map_err(platform)?;
        let length = match notice.display_length() {
            NoticeLength::Short => LENGTH_SHORT,
            NoticeLength::Long => LENGTH_LONG,
        };

        let toast = env
            .call_static_method(
                "android/widget/Toast",
                "makeText",
                "(Landroid/content/Context;Ljava/lang/CharSequence;I)Landroid/widget/Toast;",
                &[
                    JValue::Object(self.context.as_obj()),
                    JValue::Object(&text),
                    JValue::Int(length),
                ],
            )
            .map_err(platform)?
            .l()
            .map_err(platform)?;

        env.call_method(&toast, "show", "()V", &[])
            .map_err(platform)?;
        Ok(())
    }
}

impl std::fmt::Debug for ToastNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastNotifier").finish_non_exhaustive()
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(err) = self.show(&notice) {
            warn!("failed to show toast {:?}: {err}", notice.text());
        }
    }
}
