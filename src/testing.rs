// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test doubles shared by unit tests.

use parking_lot::Mutex;

use crate::command::{CommandSink, ControlRequest};
use crate::error::TransportError;

/// Test transport that records every envelope it is handed.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    sent: Mutex<Vec<ControlRequest>>,
}

impl RecordingSink {
    /// Returns a copy of everything sent so far.
    pub(crate) fn sent(&self) -> Vec<ControlRequest> {
        self.sent.lock().clone()
    }
}

impl CommandSink for RecordingSink {
    async fn send(&self, request: &ControlRequest) -> Result<(), TransportError> {
        self.sent.lock().push(request.clone());
        Ok(())
    }
}
