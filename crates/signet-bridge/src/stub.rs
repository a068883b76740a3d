// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub services for desktop/CI builds where native mobile APIs are
// unavailable.
//
// Every platform read returns `PlatformUnavailable` — the real
// implementation lives in the `android` module.

use signet_core::error::{Result, SignetError};

use crate::traits::*;

/// No-op services returned on non-mobile platforms.
pub struct StubServices;

impl PlatformServices for StubServices {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl SecureSettings for StubServices {
    fn device_identifier(&self) -> Result<String> {
        tracing::warn!("SecureSettings::device_identifier called on stub services");
        Err(SignetError::PlatformUnavailable)
    }
}

impl Telephony for StubServices {
    fn device_id(&self) -> Result<Option<String>> {
        tracing::warn!("Telephony::device_id called on stub services");
        Err(SignetError::PlatformUnavailable)
    }

    fn subscriber_id(&self) -> Result<Option<String>> {
        Err(SignetError::PlatformUnavailable)
    }

    fn sim_serial_number(&self) -> Result<Option<String>> {
        Err(SignetError::PlatformUnavailable)
    }
}

impl WifiInfo for StubServices {
    fn connection_mac(&self) -> Result<Option<String>> {
        Err(SignetError::PlatformUnavailable)
    }
}

impl NetworkInterfaces for StubServices {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        Err(SignetError::PlatformUnavailable)
    }
}

impl RuntimePermissions for StubServices {
    fn has_permission(&self, _permission: &str) -> bool {
        false
    }

    fn request_permission(&self, _request_code: i32, _permission: &str) -> Result<()> {
        tracing::warn!("RuntimePermissions::request_permission called on stub services");
        Err(SignetError::PlatformUnavailable)
    }
}

impl Capabilities for StubServices {
    fn sdk_version(&self) -> u32 {
        0
    }
}
