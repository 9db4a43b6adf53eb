// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Native command envelope and the transport collaborator trait.
//!
//! Commands to an Aeolux device are a mapping of native keys to values,
//! wrapped in the envelope the vendor cloud expects ([`ControlRequest`]).
//! Actually delivering the envelope is the job of a [`CommandSink`]
//! implementation: a WebSocket session, a test double, a queue - the
//! library does not care. Timeouts, cancellation and retries live on the
//! sink side.
//!
//! # Examples
//!
//! ```
//! use aeolux_lib::command::ControlRequest;
//! use serde_json::json;
//!
//! let request = ControlRequest::new("XXXYYYZZZ123", "lighton", json!(true));
//!
//! assert_eq!(request.device_sn(), "XXXYYYZZZ123");
//! assert_eq!(request.params().get("lighton"), Some(&json!(true)));
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::TransportError;

/// A native command envelope addressed to one device.
///
/// Serializes to the wire shape the vendor cloud expects:
///
/// ```json
/// {
///   "messageId": "a2f5...",
///   "devicesn": "XXXYYYZZZ123",
///   "method": "control",
///   "params": { "lighton": true },
///   "timestamp": 1700000000000
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ControlRequest {
    #[serde(rename = "messageId")]
    message_id: Uuid,
    #[serde(rename = "devicesn")]
    device_sn: String,
    method: &'static str,
    params: Map<String, Value>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
}

impl ControlRequest {
    /// Creates a request carrying a single native key/value pair.
    #[must_use]
    pub fn new(device_sn: impl Into<String>, key: &str, value: Value) -> Self {
        let mut params = Map::new();
        params.insert(key.to_string(), value);
        Self::with_params(device_sn, params)
    }

    /// Creates a request carrying an arbitrary params map.
    #[must_use]
    pub fn with_params(device_sn: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            device_sn: device_sn.into(),
            method: "control",
            params,
            timestamp: Utc::now(),
        }
    }

    /// Returns the unique message ID.
    #[must_use]
    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    /// Returns the serial number of the addressed device.
    #[must_use]
    pub fn device_sn(&self) -> &str {
        &self.device_sn
    }

    /// Returns the native key/value parameters.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Trait for transports that deliver command envelopes to the vendor cloud.
///
/// Implementations own the connection, authentication, timeout and retry
/// policy. Sending is fire-and-forget-with-result: a successful send means
/// the envelope was handed to the cloud, not that the device accepted the
/// value - confirmation arrives later as a server push.
#[allow(async_fn_in_trait)]
pub trait CommandSink {
    /// Delivers one command envelope.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the envelope could not be delivered.
    async fn send(&self, request: &ControlRequest) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_key_request() {
        let request = ControlRequest::new("SN123", "brightness", json!(70));

        assert_eq!(request.device_sn(), "SN123");
        assert_eq!(request.params().len(), 1);
        assert_eq!(request.params().get("brightness"), Some(&json!(70)));
    }

    #[test]
    fn serializes_to_wire_shape() {
        let request = ControlRequest::new("SN123", "lighton", json!(true));
        let wire = serde_json::to_value(&request).unwrap();

        assert_eq!(wire["devicesn"], json!("SN123"));
        assert_eq!(wire["method"], json!("control"));
        assert_eq!(wire["params"]["lighton"], json!(true));
        assert!(wire["messageId"].is_string());
        assert!(wire["timestamp"].is_i64());
    }

    #[test]
    fn message_ids_are_unique() {
        let a = ControlRequest::new("SN123", "poweron", json!(true));
        let b = ControlRequest::new("SN123", "poweron", json!(true));

        assert_ne!(a.message_id(), b.message_id());
    }

    #[test]
    fn with_params_carries_multiple_keys() {
        let mut params = Map::new();
        params.insert("lighton".to_string(), json!(true));
        params.insert("brightness".to_string(), json!(50));

        let request = ControlRequest::with_params("SN123", params);
        assert_eq!(request.params().len(), 2);
    }
}
