// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signet — Device identifier provider plugin.
//
// Exposes five device identifiers (secure-settings ID, IMEI, IMSI, ICCID,
// MAC) to a hybrid-app script runtime. The host environment constructs a
// `DeviceIdentifierProvider` over the platform services, calls
// `initialize`, routes the `getUID` action through `execute`, and forwards
// the OS permission-prompt outcome to `on_permission_result`.

pub mod callback;
pub mod mac;
pub mod permission;
pub mod provider;

pub use callback::{CallbackChannel, PluginResult, ResultStatus};
pub use permission::{PermissionOutcome, PermissionState};
pub use provider::{ACTION_GET_UID, DeviceIdentifierProvider, DispatchOutcome};
