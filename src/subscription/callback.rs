// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Internal registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a device's lifetime.
///
/// # Examples
///
/// ```ignore
/// let sub_id = device.on_light_changed(|on| { /* ... */ });
///
/// // Later, unsubscribe
/// device.unsubscribe(sub_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for boolean attribute callbacks (power, lights, oscillation).
type BoolCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Type alias for fan speed callbacks (0-100 percent).
type SpeedCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Type alias for preset mode callbacks.
type PresetModeCallback = Arc<dyn Fn(&'static str) + Send + Sync>;

/// Type alias for brightness callbacks (0-255).
type BrightnessCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Type alias for color temperature callbacks (Kelvin).
type ColorTempCallback = Arc<dyn Fn(u16) + Send + Sync>;

/// Type alias for coalesced state change callbacks.
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for managing device subscription callbacks.
///
/// This is an internal type used by devices to store and dispatch callbacks.
/// It uses thread-safe interior mutability via `parking_lot::RwLock` so the
/// registry can be shared across async tasks.
///
/// # Notification granularity
///
/// Generic `state_changed` callbacks receive exactly one call per push
/// event, with every attribute the event moved coalesced into a single
/// [`StateChange`] (a [`StateChange::Batch`] when more than one attribute
/// changed). Attribute-specific callbacks fire once per changed attribute.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Fan power change callbacks.
    power_callbacks: RwLock<HashMap<SubscriptionId, BoolCallback>>,
    /// Fan speed change callbacks.
    fan_speed_callbacks: RwLock<HashMap<SubscriptionId, SpeedCallback>>,
    /// Preset mode change callbacks.
    preset_mode_callbacks: RwLock<HashMap<SubscriptionId, PresetModeCallback>>,
    /// Oscillation change callbacks.
    oscillating_callbacks: RwLock<HashMap<SubscriptionId, BoolCallback>>,
    /// Main light power change callbacks.
    light_callbacks: RwLock<HashMap<SubscriptionId, BoolCallback>>,
    /// Brightness change callbacks.
    brightness_callbacks: RwLock<HashMap<SubscriptionId, BrightnessCallback>>,
    /// Color temperature change callbacks.
    color_temp_callbacks: RwLock<HashMap<SubscriptionId, ColorTempCallback>>,
    /// Night light power change callbacks.
    night_light_callbacks: RwLock<HashMap<SubscriptionId, BoolCallback>>,
    /// Coalesced state change callbacks (one call per push event).
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            power_callbacks: RwLock::new(HashMap::new()),
            fan_speed_callbacks: RwLock::new(HashMap::new()),
            preset_mode_callbacks: RwLock::new(HashMap::new()),
            oscillating_callbacks: RwLock::new(HashMap::new()),
            light_callbacks: RwLock::new(HashMap::new()),
            brightness_callbacks: RwLock::new(HashMap::new()),
            color_temp_callbacks: RwLock::new(HashMap::new()),
            night_light_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for fan power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for fan speed changes (0-100 percent).
    pub fn on_fan_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.fan_speed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for preset mode changes.
    pub fn on_preset_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&'static str) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.preset_mode_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for oscillation changes.
    pub fn on_oscillating_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.oscillating_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for main light power changes.
    pub fn on_light_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.light_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for brightness changes (0-255).
    pub fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.brightness_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for color temperature changes (Kelvin).
    pub fn on_color_temp_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u16) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.color_temp_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for night light power changes.
    pub fn on_night_light_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.night_light_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for coalesced state changes.
    ///
    /// The callback is called exactly once per push event that changed
    /// anything, receiving all of the event's changes at once. This is the
    /// hook for publishing entity state to a host platform.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.power_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.fan_speed_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.preset_mode_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.oscillating_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.light_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.brightness_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.color_temp_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.night_light_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.state_changed_callbacks.write().remove(&id).is_some() {
            return true;
        }
        false
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.power_callbacks.write().clear();
        self.fan_speed_callbacks.write().clear();
        self.preset_mode_callbacks.write().clear();
        self.oscillating_callbacks.write().clear();
        self.light_callbacks.write().clear();
        self.brightness_callbacks.write().clear();
        self.color_temp_callbacks.write().clear();
        self.night_light_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a push event's coalesced change to registered callbacks.
    ///
    /// Generic `state_changed` callbacks receive the change once, exactly
    /// as produced by the reconciler. Attribute-specific callbacks receive
    /// one call per changed attribute, unrolling a batch.
    pub fn dispatch(&self, change: &StateChange) {
        {
            let callbacks = self.state_changed_callbacks.read();
            for callback in callbacks.values() {
                callback(change);
            }
        }
        self.dispatch_specific(change);
    }

    /// Dispatches to attribute-specific callbacks, recursing into batches.
    fn dispatch_specific(&self, change: &StateChange) {
        match change {
            StateChange::Power(on) => {
                let callbacks = self.power_callbacks.read();
                for callback in callbacks.values() {
                    callback(*on);
                }
            }
            StateChange::FanSpeed(percent) => {
                let callbacks = self.fan_speed_callbacks.read();
                for callback in callbacks.values() {
                    callback(*percent);
                }
            }
            StateChange::PresetMode(mode) => {
                let callbacks = self.preset_mode_callbacks.read();
                for callback in callbacks.values() {
                    callback(*mode);
                }
            }
            StateChange::Oscillating(on) => {
                let callbacks = self.oscillating_callbacks.read();
                for callback in callbacks.values() {
                    callback(*on);
                }
            }
            StateChange::LightOn(on) => {
                let callbacks = self.light_callbacks.read();
                for callback in callbacks.values() {
                    callback(*on);
                }
            }
            StateChange::Brightness(value) => {
                let callbacks = self.brightness_callbacks.read();
                for callback in callbacks.values() {
                    callback(*value);
                }
            }
            StateChange::ColorTempKelvin(kelvin) => {
                let callbacks = self.color_temp_callbacks.read();
                for callback in callbacks.values() {
                    callback(*kelvin);
                }
            }
            StateChange::NightLightOn(on) => {
                let callbacks = self.night_light_callbacks.read();
                for callback in callbacks.values() {
                    callback(*on);
                }
            }
            StateChange::Batch(changes) => {
                for nested in changes {
                    self.dispatch_specific(nested);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.power_callbacks.read().len()
            + self.fan_speed_callbacks.read().len()
            + self.preset_mode_callbacks.read().len()
            + self.oscillating_callbacks.read().len()
            + self.light_callbacks.read().len()
            + self.brightness_callbacks.read().len()
            + self.color_temp_callbacks.read().len()
            + self.night_light_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
