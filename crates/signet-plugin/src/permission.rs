// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime-permission state machine.
//
// The permission request is fire-and-forget: `initialize` dispatches the
// prompt and returns immediately. The outcome arrives later — possibly
// never, if the user dismisses the prompt — through
// `DeviceIdentifierProvider::on_permission_result`, the state machine's
// only transition function.

/// Telephony-read permission gating the IMEI/IMSI/ICCID group.
pub const READ_PHONE_STATE: &str = "android.permission.READ_PHONE_STATE";

/// Request code attached to the telephony permission prompt.
pub const PHONE_STATE_CODE: i32 = 1;

/// Resolution of a runtime-permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    Denied,
}

/// Whether the telephony-read prompt has resolved yet.
///
/// `Unresolved` covers both "never prompted" and "prompted, no answer
/// yet". Denial is a steady state, not an error: the telephony fields
/// simply stay empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unresolved,
    Resolved(PermissionOutcome),
}

impl PermissionState {
    /// Whether the permission has resolved to granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Resolved(PermissionOutcome::Granted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_is_not_granted() {
        assert!(!PermissionState::default().is_granted());
        assert!(!PermissionState::Resolved(PermissionOutcome::Denied).is_granted());
        assert!(PermissionState::Resolved(PermissionOutcome::Granted).is_granted());
    }
}
