// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native identifier sources.
//
// Each trait covers one OS service. The provider only ever talks to the
// umbrella `PlatformServices` object, so tests can swap in an in-memory
// fake without touching JNI.

use signet_core::error::Result;

/// Unified bridge that groups all native identifier sources.
pub trait PlatformServices:
    SecureSettings + Telephony + WifiInfo + NetworkInterfaces + RuntimePermissions + Capabilities
{
    /// Human-readable platform name (e.g. "Android 14").
    fn platform_name(&self) -> &str;
}

/// Stable per-device identifier from the OS secure-settings store.
pub trait SecureSettings {
    /// Read the secure-settings device identifier.
    ///
    /// The platform guarantees a value; it may be empty on some devices
    /// and is passed through unvalidated.
    fn device_identifier(&self) -> Result<String>;
}

/// Telephony identifiers from the radio/SIM stack.
///
/// All three reads require the telephony-read runtime permission; calling
/// them without it is a bridge error on Android (the SDK throws). `None`
/// models a platform null — a tablet without radio hardware or a device
/// without a SIM reports no value rather than an error.
pub trait Telephony {
    /// Hardware device identity (IMEI).
    fn device_id(&self) -> Result<Option<String>>;

    /// SIM subscriber identity (IMSI).
    fn subscriber_id(&self) -> Result<Option<String>>;

    /// Physical SIM serial number (ICCID).
    fn sim_serial_number(&self) -> Result<Option<String>>;
}

/// Wi-Fi connection information.
pub trait WifiInfo {
    /// MAC address as reported by the current Wi-Fi connection info, if
    /// any. Capability levels that redact it report a placeholder or null.
    fn connection_mac(&self) -> Result<Option<String>>;
}

/// Network-interface enumeration facility.
pub trait NetworkInterfaces {
    /// Enumerate the device's network interfaces.
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>>;
}

/// Runtime-permission check and prompt.
pub trait RuntimePermissions {
    /// Whether the given runtime permission is currently granted.
    fn has_permission(&self, permission: &str) -> bool;

    /// Prompt the user for a runtime permission.
    ///
    /// Fire-and-forget: the call returns once the prompt is dispatched.
    /// The grant/deny outcome arrives later through the host environment's
    /// own result callback, tagged with `request_code`.
    fn request_permission(&self, request_code: i32, permission: &str) -> Result<()>;
}

/// OS version/capability query.
pub trait Capabilities {
    /// Platform capability level (Android `Build.VERSION.SDK_INT`).
    fn sdk_version(&self) -> u32;
}

// ---------------------------------------------------------------------------
// Info structs
// ---------------------------------------------------------------------------

/// A network interface as reported by the platform enumeration facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// Interface name (e.g. "wlan0", "lo").
    pub name: String,
    /// Hardware (MAC) address bytes; `None` when the platform withholds
    /// them for this interface.
    pub hardware_address: Option<Vec<u8>>,
}
