// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing entity views.
//!
//! Entities are thin, feature-scoped views over a [`Device`](crate::Device)
//! that speak host units: a [`LightEntity`] for each light feature and a
//! [`FanEntity`] for the fan itself. They never cache state of their own -
//! every property read derives from the device's reconciled state.

mod fan;
mod light;

pub use fan::FanEntity;
pub use light::{LightEntity, TurnOnOptions};
