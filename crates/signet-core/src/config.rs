// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plugin configuration.

use serde::{Deserialize, Serialize};

/// Behaviour settings for the identifier provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Issue the telephony-read permission prompt during initialization
    /// when the permission is missing. Hosts that manage permissions
    /// themselves can turn this off and prompt on their own schedule.
    pub auto_request_permission: bool,
    /// Interface name consulted by the interface-enumeration MAC path.
    pub wlan_interface: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            auto_request_permission: true,
            wlan_interface: "wlan0".into(),
        }
    }
}
