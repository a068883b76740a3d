// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Signet identifier bridge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The five device identifiers exposed to the script runtime.
///
/// Absent values are empty strings, never null — the response contract
/// promises a string under every key. The telephony group
/// (`imei`/`imsi`/`iccid`) is read and written together: either all three
/// carry platform values (permission granted) or all three are empty
/// (permission denied or not yet resolved).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierSet {
    /// Stable per-device secure-settings identifier. Not a standards
    /// UUID — whatever opaque string the settings store reports.
    pub uuid: String,
    /// Hardware telephony identity (IMEI).
    pub imei: String,
    /// SIM subscriber identity (IMSI).
    pub imsi: String,
    /// Physical SIM serial number (ICCID).
    pub iccid: String,
    /// Network MAC address, or the locally-administered sentinel when the
    /// platform withholds the real one.
    pub mac: String,
}

impl IdentifierSet {
    /// Pack the identifiers into the response object sent to the script
    /// runtime. The key set and casing are fixed API surface.
    pub fn to_response(&self) -> Value {
        serde_json::json!({
            "UUID": self.uuid,
            "IMEI": self.imei,
            "IMSI": self.imsi,
            "ICCID": self.iccid,
            "MAC": self.mac,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_fixed_uppercase_keys() {
        let ids = IdentifierSet {
            uuid: "9774d56d682e549c".into(),
            mac: "02:00:00:00:00:01".into(),
            ..Default::default()
        };
        let response = ids.to_response();

        assert_eq!(response["UUID"], "9774d56d682e549c");
        assert_eq!(response["MAC"], "02:00:00:00:00:01");
        // Unresolved telephony fields are empty strings, not null.
        assert_eq!(response["IMEI"], "");
        assert_eq!(response["IMSI"], "");
        assert_eq!(response["ICCID"], "");
    }
}
