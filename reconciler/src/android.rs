//! Adapter for `android.webkit.PermissionRequest`.
//!
//! Call [`webview_request`] from the host's `WebChromeClient.onPermissionRequest`
//! and pass the result to [`Reconciler::handle_capability_request`](crate::Reconciler::handle_capability_request):
//!
//! ```ignore
//! #[no_mangle]
//! pub extern "system" fn Java_com_example_app_MainActivity_onWebPermissionRequest(
//!     mut env: JNIEnv,
//!     _this: JObject,
//!     request: JObject,
//! ) {
//!     match bridgekit_reconciler::android::webview_request(&mut env, &request) {
//!         Ok(request) => {
//!             reconciler().handle_capability_request(request);
//!         }
//!         Err(err) => log::warn!("{err}"),
//!     }
//! }
//! ```

use jni::objects::{GlobalRef, JObject, JObjectArray, JString, JValue};
use jni::{JNIEnv, JavaVM};
use log::{LevelFilter, warn};
use thiserror::Error;

use crate::{Capability, CapabilityRequest, Resolution, ResolutionSink, Responder};

const LOG_TAG: &str = "bridgekit";

/// Errors raised while adapting Java objects.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// A JNI call failed.
    #[error("jni error: {0}")]
    Jni(String),
}

fn jni_error(err: impl std::fmt::Display) -> BridgeError {
    BridgeError::Jni(err.to_string())
}

/// Route `log` output to logcat. Safe to call more than once.
pub fn install_logger(level: LevelFilter) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag(LOG_TAG),
    );
}

/// Wrap a web view permission request.
///
/// # Errors
/// Returns [`BridgeError::Jni`] if the requested resources cannot be read.
/// The Java request is then left for the caller to answer.
pub fn webview_request(
    env: &mut JNIEnv,
    request: &JObject,
) -> Result<CapabilityRequest, BridgeError> {
    let resources = env
        .call_method(request, "getResources", "()[Ljava/lang/String;", &[])
        .map_err(jni_error)?
        .l()
        .map_err(jni_error)?;
    let resources = JObjectArray::from(resources);

    let count = env.get_array_length(&resources).map_err(jni_error)?;
    let mut capabilities = Vec::new();
    for index in 0..count {
        let element = env
            .get_object_array_element(&resources, index)
            .map_err(jni_error)?;
        let resource: String = env
            .get_string(&JString::from(element))
            .map_err(jni_error)?
            .into();
        capabilities.push(Capability::from_resource(&resource));
    }

    let sink = WebViewSink {
        vm: env.get_java_vm().map_err(jni_error)?,
        request: env.new_global_ref(request).map_err(jni_error)?,
    };
    Ok(CapabilityRequest::new(capabilities, Responder::new(sink)))
}

struct WebViewSink {
    vm: JavaVM,
    request: GlobalRef,
}

impl WebViewSink {
    fn answer(&self, resolution: &Resolution) -> Result<(), BridgeError> {
        let mut env = self.vm.attach_current_thread().map_err(jni_error)?;
        match resolution {
            Resolution::Granted(capabilities) => {
                let length = i32::try_from(capabilities.len()).map_err(jni_error)?;
                let array = env
                    .new_object_array(length, "java/lang/String", JObject::null())
                    .map_err(jni_error)?;
                for (index, capability) in (0..length).zip(capabilities) {
                    let resource = env.new_string(capability.resource()).map_err(jni_error)?;
                    env.set_object_array_element(&array, index, resource)
                        .map_err(jni_error)?;
                }
                env.call_method(
                    self.request.as_obj(),
                    "grant",
                    "([Ljava/lang/String;)V",
                    &[JValue::Object(&array)],
                )
                .map_err(jni_error)?;
            }
            Resolution::Denied => {
                env.call_method(self.request.as_obj(), "deny", "()V", &[])
                    .map_err(jni_error)?;
            }
        }
        Ok(())
    }
}

impl ResolutionSink for WebViewSink {
    fn resolve(self: Box<Self>, resolution: Resolution) {
        if let Err(err) = self.answer(&resolution) {
            warn!("failed to answer web view permission request: {err}");
        }
    }
}
