// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aeolux Lib - A Rust library to control Aeolux smart fans and fan lights.
//!
//! This library is the device-control core for Aeolux fans, ceiling fans
//! and air purifiers: it maps between host-platform units (brightness
//! 0-255, color temperature in Kelvin, fan speed percentages) and the
//! vendor's native command keys and integer ranges, and it reconciles
//! asynchronous server-pushed state updates with the locally cached device
//! state.
//!
//! # Supported Features
//!
//! - **Fan control**: Power, wind level, preset modes, oscillation
//! - **Light control**: On/off, brightness, color temperature, night lights
//! - **State sync**: Server-push reconciliation with coalesced change
//!   notifications
//! - **Capabilities**: Static per-model capability table and color-mode
//!   negotiation
//!
//! The network transport is deliberately not part of this crate: commands
//! leave through the [`CommandSink`] trait and confirmations come back via
//! [`Device::handle_server_update`], so any session layer (WebSocket,
//! test double, replay log) can drive it.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use aeolux_lib::{CommandSink, ControlRequest, Device, DeviceInfo, LightEntity, TurnOnOptions};
//! use aeolux_lib::error::TransportError;
//! use serde_json::json;
//!
//! // Transport is collaborator-owned; anything that delivers envelopes works.
//! struct NullSink;
//!
//! impl CommandSink for NullSink {
//!     async fn send(&self, _request: &ControlRequest) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> aeolux_lib::Result<()> {
//!     let device = Arc::new(Device::from_model(
//!         DeviceInfo::new("XXXYYYZZZ123", "Bedroom Fan", "HCF001S"),
//!         Arc::new(NullSink),
//!     )?);
//!
//!     let light = LightEntity::main(&device).expect("ceiling fans have a light");
//!     light
//!         .turn_on(TurnOnOptions::new().with_brightness(191))
//!         .await?;
//!
//!     // State follows the confirming server push, not the command:
//!     assert_eq!(light.is_on(), None);
//!     device.handle_server_update(&json!({"reported": {"lighton": true, "brightness": 75}}));
//!     assert_eq!(light.is_on(), Some(true));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Subscriptions
//!
//! Devices notify listeners when a push actually changed something; all
//! fields of one push coalesce into a single notification:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use aeolux_lib::{CommandSink, Device};
//! # fn example<S: CommandSink>(device: Arc<Device<S>>) {
//! device.on_state_changed(|change| {
//!     println!("device changed: {change:?}");
//! });
//!
//! device.on_brightness_changed(|value| {
//!     println!("brightness is now {value}");
//! });
//! # }
//! ```

pub mod capabilities;
pub mod command;
pub mod convert;
mod device;
pub mod entity;
pub mod error;
pub mod manager;
pub mod state;
pub mod subscription;

#[cfg(test)]
mod testing;

pub use capabilities::{
    Attribute, BrightnessCapability, Capabilities, ColorMode, ColorTempCapability,
    LightCapability, LightFeature,
};
pub use command::{CommandSink, ControlRequest};
pub use convert::{KelvinRange, NativeRange};
pub use device::{Device, DeviceInfo};
pub use entity::{FanEntity, LightEntity, TurnOnOptions};
pub use error::{DeviceError, Error, Result, TransportError, ValueError};
pub use manager::DeviceManager;
pub use state::{DeviceState, EntitySnapshot, Reconciler, StateChange};
pub use subscription::{CallbackRegistry, SubscriptionId};
