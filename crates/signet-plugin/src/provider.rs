// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device identifier provider.
//
// Reads five identifiers from the platform layer at initialization,
// answers the `getUID` action with the cached set, and refreshes the
// telephony group once the runtime permission resolves.
//
// All three entry points run to completion on the host's dispatch thread;
// nothing here blocks on the permission prompt. State is owned by the
// provider instance — two providers never share identifier fields.

use serde_json::Value;
use tracing::{debug, warn};

use signet_bridge::traits::PlatformServices;
use signet_core::PluginConfig;
use signet_core::error::Result;
use signet_core::types::IdentifierSet;

use crate::callback::{CallbackChannel, PluginResult};
use crate::mac::resolve_mac;
use crate::permission::{PHONE_STATE_CODE, PermissionOutcome, PermissionState, READ_PHONE_STATE};

/// Query action recognized by [`DeviceIdentifierProvider::execute`].
pub const ACTION_GET_UID: &str = "getUID";

/// Whether a dispatched action was recognized.
///
/// The host routes `NotHandled` actions to other plugins, so returning it
/// must leave the provider untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DispatchOutcome {
    Handled,
    NotHandled,
}

/// Provider for the five device identifiers.
pub struct DeviceIdentifierProvider {
    platform: Box<dyn PlatformServices>,
    config: PluginConfig,
    identifiers: IdentifierSet,
    permission: PermissionState,
    /// Channel captured by the last recognized query, kept open for the
    /// post-permission redelivery.
    callback: Option<Box<dyn CallbackChannel>>,
}

impl DeviceIdentifierProvider {
    /// Create a provider over the given platform services.
    ///
    /// Cheap — no platform call happens until [`initialize`].
    ///
    /// [`initialize`]: Self::initialize
    pub fn new(platform: Box<dyn PlatformServices>) -> Self {
        Self::with_config(platform, PluginConfig::default())
    }

    pub fn with_config(platform: Box<dyn PlatformServices>, config: PluginConfig) -> Self {
        Self {
            platform,
            config,
            identifiers: IdentifierSet::default(),
            permission: PermissionState::Unresolved,
            callback: None,
        }
    }

    /// Read the identifier fields from the platform layer.
    ///
    /// Non-gated fields (`uuid`, `mac`) are read unconditionally. The
    /// telephony group is read only when the permission is already
    /// granted; otherwise the three fields stay empty and a permission
    /// prompt is dispatched (fire-and-forget — the outcome arrives later
    /// through [`on_permission_result`], or never).
    ///
    /// [`on_permission_result`]: Self::on_permission_result
    pub fn initialize(&mut self) -> Result<()> {
        debug!(
            platform = self.platform.platform_name(),
            "initializing device identifier provider"
        );

        self.identifiers.uuid = self.platform.device_identifier()?;

        if self.platform.has_permission(READ_PHONE_STATE) {
            self.permission = PermissionState::Resolved(PermissionOutcome::Granted);
            self.read_telephony_group()?;
        } else {
            self.identifiers.imei = String::new();
            self.identifiers.imsi = String::new();
            self.identifiers.iccid = String::new();
            if self.config.auto_request_permission {
                self.platform
                    .request_permission(PHONE_STATE_CODE, READ_PHONE_STATE)?;
            }
        }

        self.identifiers.mac = resolve_mac(self.platform.as_ref(), &self.config);

        Ok(())
    }

    /// Dispatch an action from the script runtime.
    ///
    /// `getUID` answers with the current cached identifiers — possibly
    /// empty telephony fields while the permission prompt is unresolved —
    /// and keeps the channel open for a later redelivery. Anything else is
    /// `NotHandled` with zero side effects.
    pub fn execute(
        &mut self,
        action: &str,
        _args: &Value,
        channel: Box<dyn CallbackChannel>,
    ) -> DispatchOutcome {
        match action {
            ACTION_GET_UID => {
                debug!(action, "answering identifier query");
                channel.send(PluginResult::ok(self.identifiers.to_response()).keep_open());
                self.callback = Some(channel);
                DispatchOutcome::Handled
            }
            _ => {
                debug!(action, "action not handled");
                DispatchOutcome::NotHandled
            }
        }
    }

    /// Host-delivered resolution of the permission prompt.
    ///
    /// For a grant, the telephony group is re-read and the full identifier
    /// set is redelivered over the channel captured by the last query; if
    /// no query was ever made there is no channel, which is a no-op rather
    /// than an error. For a denial, the fields stay empty and nothing is
    /// delivered. Repeated deliveries are tolerated: re-running the group
    /// read against unchanged platform state reproduces the same fields.
    pub fn on_permission_result(
        &mut self,
        request_code: i32,
        permissions: &[String],
        grants: &[PermissionOutcome],
    ) {
        debug!(request_code, ?permissions, "permission prompt resolved");

        for (name, grant) in permissions.iter().zip(grants) {
            if name != READ_PHONE_STATE {
                continue;
            }

            match grant {
                PermissionOutcome::Granted => {
                    self.permission = PermissionState::Resolved(PermissionOutcome::Granted);

                    if let Err(e) = self.read_telephony_group() {
                        warn!(error = %e, "telephony re-read failed after grant");
                        continue;
                    }

                    match &self.callback {
                        Some(channel) => {
                            channel.send(PluginResult::ok(self.identifiers.to_response()));
                        }
                        None => {
                            // No query yet — nothing to deliver to.
                            debug!("permission granted before any query; skipping delivery");
                        }
                    }
                }
                PermissionOutcome::Denied => {
                    warn!(
                        permission = READ_PHONE_STATE,
                        "runtime permission denied — telephony fields stay empty"
                    );
                    self.permission = PermissionState::Resolved(PermissionOutcome::Denied);
                }
            }
        }
    }

    /// Current cached identifiers.
    pub fn identifiers(&self) -> &IdentifierSet {
        &self.identifiers
    }

    /// Current permission state.
    pub fn permission_state(&self) -> PermissionState {
        self.permission
    }

    /// Read the IMEI/IMSI/ICCID group.
    ///
    /// The three fields are read into locals first and assigned together,
    /// so a failing read never leaves a partially-updated group. Platform
    /// nulls (no SIM, no radio hardware) are normalized to empty strings.
    fn read_telephony_group(&mut self) -> Result<()> {
        let imei = self.platform.device_id()?.unwrap_or_default();
        let imsi = self.platform.subscriber_id()?.unwrap_or_default();
        let iccid = self.platform.sim_serial_number()?.unwrap_or_default();

        self.identifiers.imei = imei;
        self.identifiers.imsi = imsi;
        self.identifiers.iccid = iccid;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use signet_bridge::traits::*;
    use signet_core::error::SignetError;

    use super::*;
    use crate::callback::ResultStatus;
    use crate::mac::SENTINEL_MAC;

    const UUID: &str = "9774d56d682e549c";
    const IMEI: &str = "356938035643809";
    const IMSI: &str = "310260000000111";
    const ICCID: &str = "8991101200003204510";

    // -- Fake platform ------------------------------------------------------

    struct FakeState {
        device_identifier: String,
        imei: Option<String>,
        imsi: Option<String>,
        iccid: Option<String>,
        connection_mac: Option<String>,
        interfaces: Vec<InterfaceInfo>,
        fail_enumeration: bool,
        granted: bool,
        sdk: u32,
        requests: Vec<(i32, String)>,
    }

    /// Scriptable in-memory platform; clones share state so tests can
    /// inspect recorded permission requests after handing the provider its
    /// own copy.
    #[derive(Clone)]
    struct FakePlatform {
        state: Rc<RefCell<FakeState>>,
    }

    impl FakePlatform {
        fn new(granted: bool) -> Self {
            Self {
                state: Rc::new(RefCell::new(FakeState {
                    device_identifier: UUID.into(),
                    imei: Some(IMEI.into()),
                    imsi: Some(IMSI.into()),
                    iccid: Some(ICCID.into()),
                    connection_mac: None,
                    interfaces: vec![
                        InterfaceInfo {
                            name: "lo".into(),
                            hardware_address: None,
                        },
                        InterfaceInfo {
                            name: "wlan0".into(),
                            hardware_address: Some(vec![0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
                        },
                    ],
                    fail_enumeration: false,
                    granted,
                    sdk: 26,
                    requests: Vec::new(),
                })),
            }
        }

        fn requests(&self) -> Vec<(i32, String)> {
            self.state.borrow().requests.clone()
        }
    }

    impl PlatformServices for FakePlatform {
        fn platform_name(&self) -> &str {
            "Fake"
        }
    }

    impl SecureSettings for FakePlatform {
        fn device_identifier(&self) -> signet_core::error::Result<String> {
            Ok(self.state.borrow().device_identifier.clone())
        }
    }

    impl Telephony for FakePlatform {
        fn device_id(&self) -> signet_core::error::Result<Option<String>> {
            Ok(self.state.borrow().imei.clone())
        }

        fn subscriber_id(&self) -> signet_core::error::Result<Option<String>> {
            Ok(self.state.borrow().imsi.clone())
        }

        fn sim_serial_number(&self) -> signet_core::error::Result<Option<String>> {
            Ok(self.state.borrow().iccid.clone())
        }
    }

    impl WifiInfo for FakePlatform {
        fn connection_mac(&self) -> signet_core::error::Result<Option<String>> {
            Ok(self.state.borrow().connection_mac.clone())
        }
    }

    impl NetworkInterfaces for FakePlatform {
        fn interfaces(&self) -> signet_core::error::Result<Vec<InterfaceInfo>> {
            if self.state.borrow().fail_enumeration {
                return Err(SignetError::Bridge("enumeration failed".into()));
            }
            Ok(self.state.borrow().interfaces.clone())
        }
    }

    impl RuntimePermissions for FakePlatform {
        fn has_permission(&self, _permission: &str) -> bool {
            self.state.borrow().granted
        }

        fn request_permission(
            &self,
            request_code: i32,
            permission: &str,
        ) -> signet_core::error::Result<()> {
            self.state
                .borrow_mut()
                .requests
                .push((request_code, permission.into()));
            Ok(())
        }
    }

    impl Capabilities for FakePlatform {
        fn sdk_version(&self) -> u32 {
            self.state.borrow().sdk
        }
    }

    // -- Recording channel --------------------------------------------------

    #[derive(Clone, Default)]
    struct RecordingChannel {
        sent: Rc<RefCell<Vec<PluginResult>>>,
    }

    impl RecordingChannel {
        fn deliveries(&self) -> Vec<PluginResult> {
            self.sent.borrow().clone()
        }
    }

    impl CallbackChannel for RecordingChannel {
        fn send(&self, result: PluginResult) {
            self.sent.borrow_mut().push(result);
        }
    }

    fn provider(fake: &FakePlatform) -> DeviceIdentifierProvider {
        DeviceIdentifierProvider::new(Box::new(fake.clone()))
    }

    // -- Initialization -----------------------------------------------------

    #[test]
    fn granted_init_populates_all_five_fields() {
        let fake = FakePlatform::new(true);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let ids = p.identifiers();
        assert_eq!(ids.uuid, UUID);
        assert_eq!(ids.imei, IMEI);
        assert_eq!(ids.imsi, IMSI);
        assert_eq!(ids.iccid, ICCID);
        assert_eq!(ids.mac, "02:00:00:00:00:01");
        assert!(p.permission_state().is_granted());
        // Already granted — no prompt issued.
        assert!(fake.requests().is_empty());
    }

    #[test]
    fn denied_init_leaves_telephony_empty_and_requests_permission() {
        let fake = FakePlatform::new(false);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let ids = p.identifiers();
        assert_eq!(ids.uuid, UUID);
        assert_eq!(ids.imei, "");
        assert_eq!(ids.imsi, "");
        assert_eq!(ids.iccid, "");
        assert_eq!(ids.mac, "02:00:00:00:00:01");
        assert_eq!(p.permission_state(), PermissionState::Unresolved);
        assert_eq!(
            fake.requests(),
            vec![(PHONE_STATE_CODE, READ_PHONE_STATE.to_string())]
        );
    }

    #[test]
    fn auto_request_can_be_disabled() {
        let fake = FakePlatform::new(false);
        let config = PluginConfig {
            auto_request_permission: false,
            ..Default::default()
        };
        let mut p = DeviceIdentifierProvider::with_config(Box::new(fake.clone()), config);
        p.initialize().unwrap();

        assert!(fake.requests().is_empty());
        assert_eq!(p.identifiers().imei, "");
    }

    #[test]
    fn null_telephony_values_normalize_to_empty_strings() {
        let fake = FakePlatform::new(true);
        fake.state.borrow_mut().imsi = None;
        fake.state.borrow_mut().iccid = None;
        let mut p = provider(&fake);
        p.initialize().unwrap();

        assert_eq!(p.identifiers().imei, IMEI);
        assert_eq!(p.identifiers().imsi, "");
        assert_eq!(p.identifiers().iccid, "");
    }

    // -- MAC selection through the provider ---------------------------------

    #[test]
    fn enumeration_error_yields_sentinel_mac() {
        let fake = FakePlatform::new(true);
        fake.state.borrow_mut().fail_enumeration = true;
        let mut p = provider(&fake);
        p.initialize().unwrap();

        assert_eq!(p.identifiers().mac, SENTINEL_MAC);
    }

    #[test]
    fn legacy_path_is_used_below_capability_level() {
        let fake = FakePlatform::new(true);
        {
            let mut state = fake.state.borrow_mut();
            state.sdk = 22;
            state.connection_mac = Some("a4:5e:60:01:02:03".into());
            // Enumeration would fail, proving it is never consulted here.
            state.fail_enumeration = true;
        }
        let mut p = provider(&fake);
        p.initialize().unwrap();

        assert_eq!(p.identifiers().mac, "a4:5e:60:01:02:03");
    }

    #[test]
    fn legacy_path_empty_mac_yields_sentinel() {
        let fake = FakePlatform::new(true);
        {
            let mut state = fake.state.borrow_mut();
            state.sdk = 22;
            state.connection_mac = Some(String::new());
        }
        let mut p = provider(&fake);
        p.initialize().unwrap();

        assert_eq!(p.identifiers().mac, SENTINEL_MAC);
    }

    // -- Dispatch -----------------------------------------------------------

    #[test]
    fn get_uid_is_handled_and_keeps_the_callback_open() {
        let fake = FakePlatform::new(true);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let channel = RecordingChannel::default();
        let outcome = p.execute(ACTION_GET_UID, &json!([]), Box::new(channel.clone()));

        assert_eq!(outcome, DispatchOutcome::Handled);
        let sent = channel.deliveries();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].status, ResultStatus::Ok);
        assert!(sent[0].keep_callback);
        assert_eq!(sent[0].payload["IMEI"], IMEI);
        assert_eq!(sent[0].payload["UUID"], UUID);
    }

    #[test]
    fn unrecognized_action_is_not_handled_and_has_no_side_effects() {
        let fake = FakePlatform::new(false);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let channel = RecordingChannel::default();
        let outcome = p.execute("getSerial", &json!([]), Box::new(channel.clone()));

        assert_eq!(outcome, DispatchOutcome::NotHandled);
        assert!(channel.deliveries().is_empty());

        // The channel was not retained either: a later grant has nowhere
        // to deliver, and must not panic.
        p.on_permission_result(
            PHONE_STATE_CODE,
            &[READ_PHONE_STATE.to_string()],
            &[PermissionOutcome::Granted],
        );
        assert!(channel.deliveries().is_empty());
    }

    #[test]
    fn repeated_queries_return_identical_responses() {
        let fake = FakePlatform::new(true);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let first = RecordingChannel::default();
        let second = RecordingChannel::default();
        let _ = p.execute(ACTION_GET_UID, &json!([]), Box::new(first.clone()));
        let _ = p.execute(ACTION_GET_UID, &json!([]), Box::new(second.clone()));

        assert_eq!(first.deliveries()[0].payload, second.deliveries()[0].payload);
    }

    // -- Permission resolution ----------------------------------------------

    #[test]
    fn grant_after_query_redelivers_on_the_stored_channel() {
        let fake = FakePlatform::new(false);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let channel = RecordingChannel::default();
        let _ = p.execute(ACTION_GET_UID, &json!([]), Box::new(channel.clone()));
        assert_eq!(channel.deliveries()[0].payload["IMEI"], "");

        p.on_permission_result(
            PHONE_STATE_CODE,
            &[READ_PHONE_STATE.to_string()],
            &[PermissionOutcome::Granted],
        );

        let sent = channel.deliveries();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].payload["IMEI"], IMEI);
        assert_eq!(sent[1].payload["IMSI"], IMSI);
        assert_eq!(sent[1].payload["ICCID"], ICCID);
        assert_eq!(sent[1].payload["UUID"], UUID);
        assert_eq!(sent[1].payload["MAC"], "02:00:00:00:00:01");
        // The redelivery is the plain success form.
        assert!(!sent[1].keep_callback);
        assert!(p.permission_state().is_granted());
    }

    #[test]
    fn grant_without_prior_query_updates_state_without_delivery() {
        let fake = FakePlatform::new(false);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        p.on_permission_result(
            PHONE_STATE_CODE,
            &[READ_PHONE_STATE.to_string()],
            &[PermissionOutcome::Granted],
        );

        assert!(p.permission_state().is_granted());
        assert_eq!(p.identifiers().imei, IMEI);
    }

    #[test]
    fn denial_leaves_state_empty_and_delivers_nothing() {
        let fake = FakePlatform::new(false);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let channel = RecordingChannel::default();
        let _ = p.execute(ACTION_GET_UID, &json!([]), Box::new(channel.clone()));

        p.on_permission_result(
            PHONE_STATE_CODE,
            &[READ_PHONE_STATE.to_string()],
            &[PermissionOutcome::Denied],
        );

        assert_eq!(
            p.permission_state(),
            PermissionState::Resolved(PermissionOutcome::Denied)
        );
        assert_eq!(p.identifiers().imei, "");
        assert_eq!(channel.deliveries().len(), 1);
    }

    #[test]
    fn unrelated_permission_names_are_ignored() {
        let fake = FakePlatform::new(false);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        p.on_permission_result(
            PHONE_STATE_CODE,
            &["android.permission.CAMERA".to_string()],
            &[PermissionOutcome::Granted],
        );

        assert_eq!(p.permission_state(), PermissionState::Unresolved);
        assert_eq!(p.identifiers().imei, "");
    }

    #[test]
    fn repeated_grant_results_are_idempotent() {
        let fake = FakePlatform::new(false);
        let mut p = provider(&fake);
        p.initialize().unwrap();

        let channel = RecordingChannel::default();
        let _ = p.execute(ACTION_GET_UID, &json!([]), Box::new(channel.clone()));

        let names = [READ_PHONE_STATE.to_string()];
        let grants = [PermissionOutcome::Granted];
        p.on_permission_result(PHONE_STATE_CODE, &names, &grants);
        let after_first = p.identifiers().clone();

        p.on_permission_result(PHONE_STATE_CODE, &names, &grants);

        assert_eq!(p.identifiers(), &after_first);
        let sent = channel.deliveries();
        // One delivery per resolution, both carrying identical payloads.
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].payload, sent[2].payload);
    }
}
