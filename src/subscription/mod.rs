// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event subscription support.
//!
//! Devices notify listeners of state changes through callbacks registered
//! in a [`CallbackRegistry`]. The registry distinguishes two granularities:
//! a coalesced per-push-event notification (for publishing entity state to
//! a host platform) and attribute-specific notifications (for reacting to
//! a single value).

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
