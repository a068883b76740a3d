// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform services via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method invokes the corresponding
// Android API through JNI calls into the ART runtime.
//
// ## Architecture notes
//
// Every read here completes synchronously via JNI (ContentResolver,
// TelephonyManager, WifiManager, NetworkInterface enumeration).
//
// The one asynchronous operation is `request_permission`: it dispatches
// `Activity.requestPermissions` and returns. The grant/deny outcome lands
// in the host Activity's `onRequestPermissionsResult` override, which must
// forward it to `DeviceIdentifierProvider::on_permission_result` — see the
// host-integration glue for the Java/Kotlin side.

#![cfg(target_os = "android")]

use jni::JNIEnv;
use jni::objects::{JByteArray, JObject, JString, JValue};
use jni::sys::jsize;

use signet_core::error::{Result, SignetError};

use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// `Context.TELEPHONY_SERVICE`.
const TELEPHONY_SERVICE: &str = "phone";

/// `Context.WIFI_SERVICE`.
const WIFI_SERVICE: &str = "wifi";

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: i32 = 0;

/// Capability level that introduced runtime permissions (Android M).
const RUNTIME_PERMISSION_LEVEL: u32 = 23;

/// Obtain a [`JNIEnv`] handle from the global Android context.
///
/// Calls `ndk_context::android_context()` to retrieve the `JavaVM*` pointer
/// set by `android_main` or `ANativeActivity_onCreate`, then attaches the
/// current thread if it is not already attached.
fn jni_env() -> Result<JNIEnv<'static>> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| SignetError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    vm.attach_current_thread()
        .map_err(|e| SignetError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// Obtain the current Android `Activity` as a [`JObject`].
///
/// The pointer comes from `ndk_context::android_context().context()` which
/// is the `jobject` for the `NativeActivity` (or whichever `Activity` hosts
/// the native code).
fn activity() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(SignetError::Bridge(
            "Android context is null — native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Convenience: map any `jni::errors::Error` into `SignetError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> SignetError {
    SignetError::Bridge(format!("{context}: {e}"))
}

/// Convert a possibly-null Java string object into `Option<String>`.
fn optional_string(env: &mut JNIEnv<'_>, obj: JObject<'_>) -> Result<Option<String>> {
    if obj.is_null() {
        return Ok(None);
    }
    let s: String = env
        .get_string(&JString::from(obj))
        .map_err(|e| jni_err("get_string", e))?
        .into();
    Ok(Some(s))
}

/// `activity.getApplicationContext()` — system services are looked up on
/// the application context, matching the host framework's own usage.
fn application_context<'a>(env: &mut JNIEnv<'a>, activity: &JObject<'_>) -> Result<JObject<'a>> {
    env.call_method(
        activity,
        "getApplicationContext",
        "()Landroid/content/Context;",
        &[],
    )
    .map_err(|e| jni_err("getApplicationContext", e))?
    .l()
    .map_err(|e| jni_err("getApplicationContext->l", e))
}

/// `context.getSystemService(name)`, with a null check.
fn system_service<'a>(
    env: &mut JNIEnv<'a>,
    context: &JObject<'_>,
    name: &str,
) -> Result<JObject<'a>> {
    let j_name: JString = env
        .new_string(name)
        .map_err(|e| jni_err("new_string(service_name)", e))?;

    let service: JObject = env
        .call_method(
            context,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&j_name)],
        )
        .map_err(|e| jni_err("getSystemService", e))?
        .l()
        .map_err(|e| jni_err("getSystemService->l", e))?;

    if service.is_null() {
        return Err(SignetError::Bridge(format!(
            "system service unavailable: {name}"
        )));
    }
    Ok(service)
}

// ---------------------------------------------------------------------------
// Services struct
// ---------------------------------------------------------------------------

/// Android implementation of the Signet platform services.
///
/// All methods go through JNI to call the Android SDK. The struct is
/// zero-sized; all state lives on the Java side.
pub struct AndroidServices;

impl AndroidServices {
    /// Create the Android services handle.
    ///
    /// This does **not** touch JNI — the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self
    }

    /// Shared body for the three telephony string getters. They differ
    /// only in the `TelephonyManager` method name.
    fn telephony_string(&self, method: &str) -> Result<Option<String>> {
        let mut env = jni_env()?;
        let activity = activity()?;
        let context = application_context(&mut env, &activity)?;
        let manager = system_service(&mut env, &context, TELEPHONY_SERVICE)?;

        let value: JObject = env
            .call_method(&manager, method, "()Ljava/lang/String;", &[])
            .map_err(|e| jni_err(method, e))?
            .l()
            .map_err(|e| jni_err(&format!("{method}->l"), e))?;

        optional_string(&mut env, value)
    }
}

impl PlatformServices for AndroidServices {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// SecureSettings — Settings.Secure.ANDROID_ID
// ---------------------------------------------------------------------------

impl SecureSettings for AndroidServices {
    /// Read `Settings.Secure.getString(resolver, "android_id")`.
    ///
    /// A null from the settings store (not observed on real devices) is
    /// surfaced as an empty string — the identifier is promised to exist,
    /// just not to be non-empty.
    fn device_identifier(&self) -> Result<String> {
        let mut env = jni_env()?;
        let activity = activity()?;
        let context = application_context(&mut env, &activity)?;

        tracing::debug!("Android: reading secure-settings identifier");

        let resolver: JObject = env
            .call_method(
                &context,
                "getContentResolver",
                "()Landroid/content/ContentResolver;",
                &[],
            )
            .map_err(|e| jni_err("getContentResolver", e))?
            .l()
            .map_err(|e| jni_err("getContentResolver->l", e))?;

        let j_key: JString = env
            .new_string("android_id")
            .map_err(|e| jni_err("new_string(android_id)", e))?;

        let value: JObject = env
            .call_static_method(
                "android/provider/Settings$Secure",
                "getString",
                "(Landroid/content/ContentResolver;Ljava/lang/String;)Ljava/lang/String;",
                &[JValue::Object(&resolver), JValue::Object(&j_key)],
            )
            .map_err(|e| jni_err("Settings.Secure.getString", e))?
            .l()
            .map_err(|e| jni_err("Settings.Secure.getString->l", e))?;

        Ok(optional_string(&mut env, value)?.unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Telephony — android.telephony.TelephonyManager
// ---------------------------------------------------------------------------

impl Telephony for AndroidServices {
    /// `TelephonyManager.getDeviceId()` — requires the telephony-read
    /// permission; the SDK throws without it, which surfaces here as a
    /// bridge error.
    fn device_id(&self) -> Result<Option<String>> {
        self.telephony_string("getDeviceId")
    }

    /// `TelephonyManager.getSubscriberId()`.
    fn subscriber_id(&self) -> Result<Option<String>> {
        self.telephony_string("getSubscriberId")
    }

    /// `TelephonyManager.getSimSerialNumber()`.
    fn sim_serial_number(&self) -> Result<Option<String>> {
        self.telephony_string("getSimSerialNumber")
    }
}

// ---------------------------------------------------------------------------
// WifiInfo — android.net.wifi.WifiManager
// ---------------------------------------------------------------------------

impl WifiInfo for AndroidServices {
    /// `WifiManager.getConnectionInfo().getMacAddress()`.
    ///
    /// From capability level 23 the platform reports a constant placeholder
    /// here; callers on modern devices should prefer the interface
    /// enumeration path.
    fn connection_mac(&self) -> Result<Option<String>> {
        let mut env = jni_env()?;
        let activity = activity()?;
        let context = application_context(&mut env, &activity)?;
        let manager = system_service(&mut env, &context, WIFI_SERVICE)?;

        let info: JObject = env
            .call_method(
                &manager,
                "getConnectionInfo",
                "()Landroid/net/wifi/WifiInfo;",
                &[],
            )
            .map_err(|e| jni_err("getConnectionInfo", e))?
            .l()
            .map_err(|e| jni_err("getConnectionInfo->l", e))?;

        if info.is_null() {
            return Ok(None);
        }

        let mac: JObject = env
            .call_method(&info, "getMacAddress", "()Ljava/lang/String;", &[])
            .map_err(|e| jni_err("getMacAddress", e))?
            .l()
            .map_err(|e| jni_err("getMacAddress->l", e))?;

        optional_string(&mut env, mac)
    }
}

// ---------------------------------------------------------------------------
// NetworkInterfaces — java.net.NetworkInterface
// ---------------------------------------------------------------------------

impl NetworkInterfaces for AndroidServices {
    /// Walk `NetworkInterface.getNetworkInterfaces()` and collect each
    /// interface's name and hardware address.
    ///
    /// A null hardware address (the platform withholds it for loopback and
    /// for apps without the right privileges) is reported as `None`, not
    /// skipped — the caller decides what an address-less match means.
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        let mut env = jni_env()?;

        let enumeration: JObject = env
            .call_static_method(
                "java/net/NetworkInterface",
                "getNetworkInterfaces",
                "()Ljava/util/Enumeration;",
                &[],
            )
            .map_err(|e| jni_err("getNetworkInterfaces", e))?
            .l()
            .map_err(|e| jni_err("getNetworkInterfaces->l", e))?;

        if enumeration.is_null() {
            return Err(SignetError::Bridge(
                "NetworkInterface.getNetworkInterfaces returned null".into(),
            ));
        }

        let mut interfaces = Vec::new();

        loop {
            let has_more = env
                .call_method(&enumeration, "hasMoreElements", "()Z", &[])
                .map_err(|e| jni_err("hasMoreElements", e))?
                .z()
                .map_err(|e| jni_err("hasMoreElements->z", e))?;

            if !has_more {
                break;
            }

            let nif: JObject = env
                .call_method(&enumeration, "nextElement", "()Ljava/lang/Object;", &[])
                .map_err(|e| jni_err("nextElement", e))?
                .l()
                .map_err(|e| jni_err("nextElement->l", e))?;

            let j_name: JObject = env
                .call_method(&nif, "getName", "()Ljava/lang/String;", &[])
                .map_err(|e| jni_err("NetworkInterface.getName", e))?
                .l()
                .map_err(|e| jni_err("getName->l", e))?;

            let name = optional_string(&mut env, j_name)?.unwrap_or_default();

            let j_addr: JObject = env
                .call_method(&nif, "getHardwareAddress", "()[B", &[])
                .map_err(|e| jni_err("getHardwareAddress", e))?
                .l()
                .map_err(|e| jni_err("getHardwareAddress->l", e))?;

            let hardware_address = if j_addr.is_null() {
                None
            } else {
                Some(
                    env.convert_byte_array(JByteArray::from(j_addr))
                        .map_err(|e| jni_err("convert_byte_array(hardware_address)", e))?,
                )
            };

            interfaces.push(InterfaceInfo {
                name,
                hardware_address,
            });
        }

        tracing::debug!(count = interfaces.len(), "Android: enumerated network interfaces");
        Ok(interfaces)
    }
}

// ---------------------------------------------------------------------------
// RuntimePermissions — Context.checkSelfPermission / Activity.requestPermissions
// ---------------------------------------------------------------------------

impl RuntimePermissions for AndroidServices {
    /// Whether `permission` is currently granted.
    ///
    /// Below capability level 23 permissions are install-time grants, so
    /// the check is trivially true. A JNI failure is treated as
    /// not-granted — the caller then takes the request path, which reports
    /// its own error.
    fn has_permission(&self, permission: &str) -> bool {
        if self.sdk_version() < RUNTIME_PERMISSION_LEVEL {
            return true;
        }

        let check = || -> Result<bool> {
            let mut env = jni_env()?;
            let activity = activity()?;

            let j_perm: JString = env
                .new_string(permission)
                .map_err(|e| jni_err("new_string(permission)", e))?;

            let status = env
                .call_method(
                    &activity,
                    "checkSelfPermission",
                    "(Ljava/lang/String;)I",
                    &[JValue::Object(&j_perm)],
                )
                .map_err(|e| jni_err("checkSelfPermission", e))?
                .i()
                .map_err(|e| jni_err("checkSelfPermission->i", e))?;

            Ok(status == PERMISSION_GRANTED)
        };

        match check() {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!(permission, error = %e, "Android: permission check failed");
                false
            }
        }
    }

    /// Dispatch `Activity.requestPermissions(new String[]{permission},
    /// requestCode)` and return.
    ///
    /// The prompt outcome arrives through the Activity's
    /// `onRequestPermissionsResult`, which the host must forward to the
    /// provider.
    fn request_permission(&self, request_code: i32, permission: &str) -> Result<()> {
        let mut env = jni_env()?;
        let activity = activity()?;

        tracing::info!(permission, request_code, "Android: requesting runtime permission");

        let j_perm: JString = env
            .new_string(permission)
            .map_err(|e| jni_err("new_string(permission)", e))?;

        let string_class = env
            .find_class("java/lang/String")
            .map_err(|e| jni_err("find_class(String)", e))?;

        let perm_array = env
            .new_object_array(1 as jsize, &string_class, &JObject::null())
            .map_err(|e| jni_err("new_object_array(permissions)", e))?;

        env.set_object_array_element(&perm_array, 0, j_perm)
            .map_err(|e| jni_err("set_object_array_element", e))?;

        env.call_method(
            &activity,
            "requestPermissions",
            "([Ljava/lang/String;I)V",
            &[JValue::Object(&perm_array), JValue::Int(request_code)],
        )
        .map_err(|e| jni_err("requestPermissions", e))?;

        tracing::info!(request_code, "Android: permission prompt dispatched — awaiting result callback");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Capabilities — android.os.Build.VERSION
// ---------------------------------------------------------------------------

impl Capabilities for AndroidServices {
    /// `Build.VERSION.SDK_INT`.
    ///
    /// A JNI failure maps to 0, which routes capability-gated callers onto
    /// the most conservative (legacy) path.
    fn sdk_version(&self) -> u32 {
        let read = || -> Result<i32> {
            let mut env = jni_env()?;
            env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
                .i()
                .map_err(|e| jni_err("SDK_INT->i", e))
        };

        match read() {
            Ok(level) if level >= 0 => level as u32,
            Ok(_) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "Android: SDK version query failed");
                0
            }
        }
    }
}
