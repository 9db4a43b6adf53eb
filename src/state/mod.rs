// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! This module provides the types for tracking and updating Aeolux device
//! state. [`DeviceState`] holds the last-known native values of a device,
//! the [`Reconciler`] applies server-pushed deltas to it, and
//! [`StateChange`] represents the effective host-unit changes a delta
//! produced. [`EntitySnapshot`] is the derived host-facing view.
//!
//! # Examples
//!
//! ```
//! use aeolux_lib::Capabilities;
//! use aeolux_lib::state::{Reconciler, StateChange};
//! use serde_json::json;
//!
//! let mut reconciler = Reconciler::new(Capabilities::ceiling_fan());
//!
//! let delta = json!({"lighton": true}).as_object().cloned().unwrap();
//! let change = reconciler.apply_delta(&delta);
//!
//! assert_eq!(change, Some(StateChange::LightOn(true)));
//! ```

mod device_state;
mod reconciler;
mod state_change;

pub use device_state::DeviceState;
pub use reconciler::{EntitySnapshot, Reconciler};
pub use state_change::StateChange;
