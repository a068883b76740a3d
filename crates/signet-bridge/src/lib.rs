// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signet — Native platform service abstractions.
//
// This module defines the trait seam between the identifier provider and
// the operating-system services it reads from: the secure-settings store,
// the telephony service, the Wi-Fi connection info, the network-interface
// enumeration facility, and the runtime-permission machinery. Android is
// reached through JNI; every other target gets a stub so desktop/CI builds
// still compile.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

/// Retrieves the platform services implementation for the target operating
/// system.
///
/// RETURNS: A boxed trait object (`dyn PlatformServices`) that abstracts
/// away the underlying native SDK details.
pub fn platform_services() -> Box<dyn traits::PlatformServices> {
    #[cfg(target_os = "android")]
    {
        // Android: Uses `jni-rs` to invoke methods on the JVM/ART.
        Box::new(android::AndroidServices::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: Uses a stub implementation to allow non-native builds.
        Box::new(stub::StubServices)
    }
}
