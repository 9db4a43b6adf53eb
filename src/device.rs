// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for Aeolux devices.
//!
//! A [`Device`] is the per-device session object: it owns the tracked
//! state (behind the reconciler), the subscription callbacks, and the
//! handle to the command transport. Commands go out through a
//! [`CommandSink`]; confirmations come back as server pushes through
//! [`Device::handle_server_update`].
//!
//! # State discipline
//!
//! Sending a command never writes local state. The device may reject or
//! alter a requested value, so cached state moves only when the cloud
//! pushes a confirming update (or a full report is applied via
//! [`Device::update_state`]). Until then the previous value stays
//! published.
//!
//! ```no_run
//! use std::sync::Arc;
//! use aeolux_lib::{CommandSink, Device, DeviceInfo};
//! use serde_json::json;
//!
//! # async fn example<S: CommandSink>(sink: Arc<S>) -> aeolux_lib::Result<()> {
//! let info = DeviceInfo::new("XXXYYYZZZ123", "Bedroom Fan", "HCF001S");
//! let device = Device::from_model(info, sink)?;
//!
//! device.set_power(true).await?;
//!
//! // Later, the cloud confirms:
//! device.handle_server_update(&json!({"reported": {"fanon": true}}));
//! assert_eq!(device.state().power_on(), Some(true));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value, json};

use crate::capabilities::{Capabilities, LightFeature};
use crate::command::{CommandSink, ControlRequest};
use crate::convert;
use crate::error::{DeviceError, Error, ValueError};
use crate::state::{DeviceState, EntitySnapshot, Reconciler, StateChange};
use crate::subscription::{CallbackRegistry, SubscriptionId};

/// Identity of a physical device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device serial number (unique per device).
    pub sn: String,
    /// User-visible device name.
    pub name: String,
    /// Vendor model identifier (e.g. `HCF001S`).
    pub model: String,
}

impl DeviceInfo {
    /// Creates a new device identity.
    #[must_use]
    pub fn new(sn: impl Into<String>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            sn: sn.into(),
            name: name.into(),
            model: model.into(),
        }
    }
}

/// An Aeolux device session.
///
/// The type parameter `S` is the transport that delivers command
/// envelopes; everything else (state, capabilities, subscriptions) lives
/// here.
#[derive(Debug)]
pub struct Device<S: CommandSink> {
    info: DeviceInfo,
    capabilities: Capabilities,
    sink: Arc<S>,
    reconciler: RwLock<Reconciler>,
    callbacks: CallbackRegistry,
}

impl<S: CommandSink> Device<S> {
    /// Creates a device with explicitly provided capabilities.
    #[must_use]
    pub fn new(info: DeviceInfo, capabilities: Capabilities, sink: Arc<S>) -> Self {
        Self {
            info,
            capabilities: capabilities.clone(),
            sink,
            reconciler: RwLock::new(Reconciler::new(capabilities)),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Creates a device by looking its model up in the capability table.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownModel`] if the model is not supported.
    pub fn from_model(info: DeviceInfo, sink: Arc<S>) -> Result<Self, Error> {
        let capabilities = Capabilities::for_model(&info.model)
            .ok_or_else(|| DeviceError::UnknownModel(info.model.clone()))?;
        Ok(Self::new(info, capabilities, sink))
    }

    /// Returns the device identity.
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Returns the device serial number.
    #[must_use]
    pub fn sn(&self) -> &str {
        &self.info.sn
    }

    /// Returns the device capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns a snapshot of the tracked native state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.reconciler.read().state().clone()
    }

    /// Returns the current host-facing view of the device.
    #[must_use]
    pub fn snapshot(&self) -> EntitySnapshot {
        self.reconciler.read().snapshot().clone()
    }

    // ========== Inbound updates ==========

    /// Handles one server push message.
    ///
    /// The delta is expected under the `reported` key; messages without it
    /// are ignored. All fields of the message coalesce into at most one
    /// listener notification.
    pub fn handle_server_update(&self, message: &Value) {
        let Some(delta) = message.get("reported").and_then(Value::as_object) else {
            tracing::debug!(sn = %self.info.sn, "Push message without reported object, ignoring");
            return;
        };
        self.apply(delta);
    }

    /// Applies a full state report, e.g. from an initial device query.
    ///
    /// The values are expected under the `state` key, each either a plain
    /// value or wrapped as `{"state": <value>}`.
    pub fn update_state(&self, report: &Value) {
        let Some(delta) = report.get("state").and_then(Value::as_object) else {
            tracing::debug!(sn = %self.info.sn, "State report without state object, ignoring");
            return;
        };
        self.apply(delta);
    }

    /// Resets all tracked state to unknown, e.g. after a reconnect.
    pub fn clear_state(&self) {
        self.reconciler.write().clear();
    }

    fn apply(&self, delta: &Map<String, Value>) {
        let change = self.reconciler.write().apply_delta(delta);
        // Dispatch after releasing the lock so callbacks may read state.
        if let Some(change) = change {
            tracing::debug!(sn = %self.info.sn, changes = change.change_count(), "Device state changed");
            self.callbacks.dispatch(&change);
        }
    }

    // ========== Outbound commands ==========

    /// Sends a single native key/value command to the device.
    ///
    /// This does not modify cached state; the update arrives as a
    /// confirming server push.
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails to deliver the envelope.
    pub async fn send_command(&self, key: &str, value: Value) -> Result<(), Error> {
        let request = ControlRequest::new(&self.info.sn, key, value);
        tracing::debug!(sn = %self.info.sn, key = %key, "Sending command");
        self.sink.send(&request).await.map_err(Error::Transport)
    }

    /// Turns the fan/device on or off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_power(&self, on: bool) -> Result<(), Error> {
        self.send_command(self.capabilities.power_key, json!(on))
            .await
    }

    /// Sets the native wind level.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] if the level is outside the
    /// model's speed range, or error if the command fails.
    pub async fn set_wind_level(&self, level: u16) -> Result<(), Error> {
        let range = self.capabilities.speed_range;
        if !range.contains(i64::from(level)) {
            return Err(Error::Value(ValueError::OutOfRange {
                min: range.min,
                max: range.max,
                actual: level,
            }));
        }
        self.send_command(self.capabilities.wind_level_key, json!(level))
            .await
    }

    /// Sets the preset mode by name.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidPresetMode`] if the name is not in the
    /// model's mode table, or error if the command fails.
    pub async fn set_preset_mode(&self, mode: &str) -> Result<(), Error> {
        let Some(native) = self.capabilities.preset_mode_value(mode) else {
            return Err(Error::Value(ValueError::InvalidPresetMode(
                mode.to_string(),
            )));
        };
        self.send_command(self.capabilities.preset_mode_key, json!(native))
            .await
    }

    /// Enables or disables horizontal oscillation.
    ///
    /// # Errors
    ///
    /// Returns error if the model does not oscillate or the command fails.
    pub async fn set_oscillating(&self, on: bool) -> Result<(), Error> {
        let Some(key) = self.capabilities.oscillation_key else {
            return Err(unsupported("oscillation"));
        };
        self.send_command(key, json!(on)).await
    }

    /// Turns a light feature on or off.
    ///
    /// # Errors
    ///
    /// Returns error if the model lacks the feature or the command fails.
    pub async fn set_light_power(&self, feature: LightFeature, on: bool) -> Result<(), Error> {
        let Some(light) = self.capabilities.light_capability(feature) else {
            return Err(unsupported("light"));
        };
        self.send_command(light.power_key, json!(on)).await
    }

    /// Sets a light feature's brightness from a host value (0-255).
    ///
    /// # Errors
    ///
    /// Returns error if the feature is missing or not dimmable, or if the
    /// command fails.
    pub async fn set_brightness(&self, feature: LightFeature, host: u8) -> Result<(), Error> {
        let Some(light) = self.capabilities.light_capability(feature) else {
            return Err(unsupported("light"));
        };
        let Some(brightness) = light.brightness else {
            return Err(unsupported("brightness"));
        };
        let native = convert::to_native_brightness(host, brightness.range);
        self.send_command(brightness.key, json!(native)).await
    }

    /// Sets a light feature's color temperature from a Kelvin value.
    ///
    /// # Errors
    ///
    /// Returns error if the feature is missing or has no color temperature
    /// control, or if the command fails.
    pub async fn set_color_temp(&self, feature: LightFeature, kelvin: u16) -> Result<(), Error> {
        let Some(light) = self.capabilities.light_capability(feature) else {
            return Err(unsupported("light"));
        };
        let Some(color_temp) = light.color_temp else {
            return Err(unsupported("color temperature"));
        };
        let native = convert::to_native_color_temp(kelvin, color_temp.kelvin, color_temp.range);
        self.send_command(color_temp.key, json!(native)).await
    }

    // ========== Subscriptions ==========

    /// Subscribes to coalesced state changes (one call per push event).
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    /// Subscribes to fan power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.on_power_changed(callback)
    }

    /// Subscribes to fan speed changes (0-100 percent).
    pub fn on_fan_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.callbacks.on_fan_speed_changed(callback)
    }

    /// Subscribes to preset mode changes.
    pub fn on_preset_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&'static str) + Send + Sync + 'static,
    {
        self.callbacks.on_preset_mode_changed(callback)
    }

    /// Subscribes to oscillation changes.
    pub fn on_oscillating_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.on_oscillating_changed(callback)
    }

    /// Subscribes to main light power changes.
    pub fn on_light_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.on_light_changed(callback)
    }

    /// Subscribes to brightness changes (0-255).
    pub fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.callbacks.on_brightness_changed(callback)
    }

    /// Subscribes to color temperature changes (Kelvin).
    pub fn on_color_temp_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u16) + Send + Sync + 'static,
    {
        self.callbacks.on_color_temp_changed(callback)
    }

    /// Subscribes to night light power changes.
    pub fn on_night_light_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.on_night_light_changed(callback)
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

fn unsupported(capability: &str) -> Error {
    Error::Device(DeviceError::UnsupportedCapability {
        capability: capability.to_string(),
    })
}
