// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback channel between the provider and the script runtime.
//
// The host hands the provider one channel per dispatched action. A channel
// can outlive its first delivery: the query response is sent with the
// keep-callback flag set, so the same channel receives a second delivery
// once the permission prompt resolves.

use serde_json::Value;

/// Delivery status of a [`PluginResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    Error,
}

/// A single delivery to the script runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginResult {
    pub status: ResultStatus,
    pub payload: Value,
    /// Keep the channel open for a later delivery over the same callback.
    pub keep_callback: bool,
}

impl PluginResult {
    /// Success-tagged result carrying the given payload.
    pub fn ok(payload: Value) -> Self {
        Self {
            status: ResultStatus::Ok,
            payload,
            keep_callback: false,
        }
    }

    /// Mark the callback as reusable — the channel stays open after this
    /// delivery.
    pub fn keep_open(mut self) -> Self {
        self.keep_callback = true;
        self
    }
}

/// Channel used to deliver results back to the script runtime.
///
/// Implemented by the host environment (webview glue). The provider only
/// ever sends; closing is the host's business.
pub trait CallbackChannel {
    fn send(&self, result: PluginResult);
}
