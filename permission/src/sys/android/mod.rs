//! Android permission provider using JNI.
//!
//! Reads grants with `Activity.checkSelfPermission` and prompts with
//! `Activity.requestPermissions`. The activity must forward its
//! `onRequestPermissionsResult` callback to
//! [`AndroidPermissions::deliver_request_result`].

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use jni::objects::{GlobalRef, JIntArray, JObject, JObjectArray, JString, JValue};
use jni::sys::jint;
use jni::{JNIEnv, JavaVM};
use log::{info, warn};

use crate::{
    Permission, PermissionError, PermissionProvider, PermissionStatus, PromptFuture, PromptSlot,
};

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: jint = 0;

fn platform(err: impl std::fmt::Display) -> PermissionError {
    PermissionError::Platform(err.to_string())
}

/// Permission provider bound to one host activity.
pub struct AndroidPermissions {
    vm: JavaVM,
    activity: GlobalRef,
    slot: PromptSlot,
    answered: Mutex<HashSet<Permission>>,
}

impl AndroidPermissions {
    /// Bind a provider to `activity`.
    ///
    /// # Errors
    /// Returns [`PermissionError::Platform`] if the VM or a global reference
    /// to the activity cannot be obtained.
    pub fn new(env: &JNIEnv, activity: &JObject) -> Result<Self, PermissionError> {
        Ok(Self {
            vm: env.get_java_vm().map_err(platform)?,
            activity: env.new_global_ref(activity).map_err(platform)?,
            slot: PromptSlot::new(),
            answered: Mutex::new(HashSet::new()),
        })
    }

    /// Forward `Activity.onRequestPermissionsResult` into the pending prompt.
    ///
    /// Returns `Ok(false)` when `request_code` belongs to no pending prompt
    /// (another component's request, or a superseded one).
    ///
    /// # Errors
    /// Returns [`PermissionError::Platform`] if the Java arrays cannot be read.
    pub fn deliver_request_result(
        &self,
        env: &mut JNIEnv,
        request_code: jint,
        permissions: &JObjectArray,
        grant_results: &JIntArray,
    ) -> Result<bool, PermissionError> {
        let count = env.get_array_length(permissions).map_err(platform)?;
        let result_count = env.get_array_length(grant_results).map_err(platform)?;

        let mut grants = vec![0; usize::try_from(result_count).map_err(platform)?];
        env.get_int_array_region(grant_results, 0, &mut grants)
            .map_err(platform)?;

        let mut answers = Vec::new();
        for index in 0..count {
            let element = env
                .get_object_array_element(permissions, index)
                .map_err(platform)?;
            let identifier: String = env
                .get_string(&JString::from(element))
                .map_err(platform)?
                .into();

            let Some(permission) = Permission::from_identifier(&identifier) else {
                continue;
            };
            let granted = usize::try_from(index)
                .ok()
                .and_then(|i| grants.get(i))
                .is_some_and(|result| *result == PERMISSION_GRANTED);
            answers.push((permission, granted));
        }

        self.answered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(answers.iter().map(|(permission, _)| *permission));

        info!("permission prompt {request_code} answered: {answers:?}");
        Ok(self.slot.deliver(request_code, answers))
    }

    fn query(&self, permission: Permission) -> Result<PermissionStatus, PermissionError> {
        let mut env = self.vm.attach_current_thread().map_err(platform)?;
        let name = env.new_string(permission.identifier()).map_err(platform)?;

        let result = env
            .call_method(
                self.activity.as_obj(),
                "checkSelfPermission",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&name)],
            )
            .map_err(platform)?
            .i()
            .map_err(platform)?;

        let granted = result == PERMISSION_GRANTED;
        let answered = !granted
            && self
                .answered
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(&permission);

        // A rationale is only offered after a refusal.
        let rationale = !granted
            && !answered
            && env
                .call_method(
                    self.activity.as_obj(),
                    "shouldShowRequestPermissionRationale",
                    "(Ljava/lang/String;)Z",
                    &[JValue::Object(&name)],
                )
                .map_err(platform)?
                .z()
                .map_err(platform)?;

        Ok(PermissionStatus::from_android_check(
            granted, answered, rationale,
        ))
    }

    fn show_prompt(&self, code: jint, permissions: &[Permission]) -> Result<(), PermissionError> {
        let mut env = self.vm.attach_current_thread().map_err(platform)?;
        let length = i32::try_from(permissions.len()).map_err(platform)?;

        let array = env
            .new_object_array(length, "java/lang/String", JObject::null())
            .map_err(platform)?;
        for (index, permission) in (0..length).zip(permissions) {
            let name = env.new_string(permission.identifier()).map_err(platform)?;
            env.set_object_array_element(&array, index, name)
                .map_err(platform)?;
        }

        env.call_method(
            self.activity.as_obj(),
            "requestPermissions",
            "([Ljava/lang/String;I)V",
            &[JValue::Object(&array), JValue::Int(code)],
        )
        .map_err(platform)?;
        Ok(())
    }
}

impl std::fmt::Debug for AndroidPermissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidPermissions")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl PermissionProvider for AndroidPermissions {
    fn check(&self, permission: Permission) -> PermissionStatus {
        self.query(permission).unwrap_or_else(|err| {
            warn!("checkSelfPermission({permission}) failed: {err}");
            PermissionStatus::NotDetermined
        })
    }

    fn request_many(&self, permissions: &[Permission]) -> PromptFuture {
        let (code, future) = self.slot.open(permissions);
        info!("requesting {permissions:?} with code {code}");
        if let Err(err) = self.show_prompt(code, permissions) {
            warn!("requestPermissions failed: {err}");
            self.slot.fail(code, err);
        }
        future
    }
}
