// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MAC-address resolution.
//
// Two variant strategies selected by platform capability level: below
// level 23 the Wi-Fi connection info reports the MAC directly; from 23 on
// that value is redacted, so the address is read off the wlan interface in
// the enumeration instead.

use signet_bridge::traits::{InterfaceInfo, PlatformServices};
use signet_core::PluginConfig;
use tracing::debug;

/// Locally-administered placeholder reported when no real MAC can be read.
pub const SENTINEL_MAC: &str = "02:00:00:00:00:00";

/// Capability level from which the connection-info MAC is redacted.
const MODERN_MAC_LEVEL: u32 = 23;

/// Resolve the device MAC address, selecting the variant by capability
/// level.
///
/// This never fails: a bridge error from either platform read maps to
/// [`SENTINEL_MAC`]. The fallback is the contract — callers always receive
/// a value, real or placeholder.
pub fn resolve_mac(platform: &dyn PlatformServices, config: &PluginConfig) -> String {
    if platform.sdk_version() >= MODERN_MAC_LEVEL {
        match platform.interfaces() {
            Ok(interfaces) => interface_mac(&interfaces, &config.wlan_interface),
            Err(e) => {
                debug!(error = %e, "interface enumeration failed, using sentinel MAC");
                SENTINEL_MAC.to_string()
            }
        }
    } else {
        match platform.connection_mac() {
            Ok(reported) => legacy_mac(reported),
            Err(e) => {
                debug!(error = %e, "Wi-Fi connection info unavailable, using sentinel MAC");
                SENTINEL_MAC.to_string()
            }
        }
    }
}

/// Legacy variant: the MAC as reported by the Wi-Fi connection info.
/// Missing or empty values map to the sentinel.
pub(crate) fn legacy_mac(reported: Option<String>) -> String {
    match reported {
        Some(mac) if !mac.is_empty() => mac,
        _ => SENTINEL_MAC.to_string(),
    }
}

/// Modern variant: hardware address of the first interface whose name
/// matches `wanted` case-insensitively.
///
/// A matching interface that withholds its hardware address yields an
/// empty string; no matching interface yields the sentinel. Iteration
/// stops at the first match — later duplicates are never consulted.
pub(crate) fn interface_mac(interfaces: &[InterfaceInfo], wanted: &str) -> String {
    for nif in interfaces {
        if !nif.name.eq_ignore_ascii_case(wanted) {
            continue;
        }
        return match &nif.hardware_address {
            None => String::new(),
            Some(bytes) => bytes
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(":"),
        };
    }
    SENTINEL_MAC.to_string()
}
