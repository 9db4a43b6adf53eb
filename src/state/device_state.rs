// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

/// Last-known native state of an Aeolux device.
///
/// Every field is optional because an attribute's value is unknown until
/// the device first reports it. Values are stored exactly as the device
/// sent them (native units); conversion to host units happens in
/// [`convert`](crate::convert) when a snapshot is derived.
///
/// The state is mutated only by the
/// [`Reconciler`](crate::state::Reconciler) when a server update arrives —
/// never by the command path, which waits for the confirming report
/// instead.
///
/// # Examples
///
/// ```
/// use aeolux_lib::state::DeviceState;
///
/// let mut state = DeviceState::new();
/// assert!(state.light_on().is_none());
///
/// state.set_light_on(true);
/// assert_eq!(state.light_on(), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    /// Fan/device power.
    power_on: Option<bool>,
    /// Wind level in native speed steps.
    wind_level: Option<i64>,
    /// Preset mode as the native mode number.
    preset_mode: Option<i64>,
    /// Horizontal oscillation.
    oscillating: Option<bool>,
    /// Main light power.
    light_on: Option<bool>,
    /// Main light brightness in native units.
    brightness: Option<i64>,
    /// Main light color temperature as a native percentage.
    color_temp: Option<i64>,
    /// Night/panel light power.
    night_light_on: Option<bool>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the fan power state.
    #[must_use]
    pub fn power_on(&self) -> Option<bool> {
        self.power_on
    }

    /// Sets the fan power state.
    pub fn set_power_on(&mut self, on: bool) {
        self.power_on = Some(on);
    }

    /// Gets the native wind level.
    #[must_use]
    pub fn wind_level(&self) -> Option<i64> {
        self.wind_level
    }

    /// Sets the native wind level.
    pub fn set_wind_level(&mut self, level: i64) {
        self.wind_level = Some(level);
    }

    /// Gets the native preset mode number.
    #[must_use]
    pub fn preset_mode(&self) -> Option<i64> {
        self.preset_mode
    }

    /// Sets the native preset mode number.
    pub fn set_preset_mode(&mut self, mode: i64) {
        self.preset_mode = Some(mode);
    }

    /// Gets the oscillation state.
    #[must_use]
    pub fn oscillating(&self) -> Option<bool> {
        self.oscillating
    }

    /// Sets the oscillation state.
    pub fn set_oscillating(&mut self, on: bool) {
        self.oscillating = Some(on);
    }

    /// Gets the main light power state.
    #[must_use]
    pub fn light_on(&self) -> Option<bool> {
        self.light_on
    }

    /// Sets the main light power state.
    pub fn set_light_on(&mut self, on: bool) {
        self.light_on = Some(on);
    }

    /// Gets the main light brightness in native units.
    #[must_use]
    pub fn brightness(&self) -> Option<i64> {
        self.brightness
    }

    /// Sets the main light brightness in native units.
    pub fn set_brightness(&mut self, value: i64) {
        self.brightness = Some(value);
    }

    /// Gets the main light color temperature as a native percentage.
    #[must_use]
    pub fn color_temp(&self) -> Option<i64> {
        self.color_temp
    }

    /// Sets the main light color temperature as a native percentage.
    pub fn set_color_temp(&mut self, value: i64) {
        self.color_temp = Some(value);
    }

    /// Gets the night light power state.
    #[must_use]
    pub fn night_light_on(&self) -> Option<bool> {
        self.night_light_on
    }

    /// Sets the night light power state.
    pub fn set_night_light_on(&mut self, on: bool) {
        self.night_light_on = Some(on);
    }

    /// Clears all state, resetting every attribute to unknown.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = DeviceState::new();
        assert!(state.power_on().is_none());
        assert!(state.wind_level().is_none());
        assert!(state.preset_mode().is_none());
        assert!(state.oscillating().is_none());
        assert!(state.light_on().is_none());
        assert!(state.brightness().is_none());
        assert!(state.color_temp().is_none());
        assert!(state.night_light_on().is_none());
    }

    #[test]
    fn setters_store_values() {
        let mut state = DeviceState::new();

        state.set_power_on(true);
        state.set_wind_level(5);
        state.set_preset_mode(2);
        state.set_light_on(false);
        state.set_brightness(80);
        state.set_color_temp(40);

        assert_eq!(state.power_on(), Some(true));
        assert_eq!(state.wind_level(), Some(5));
        assert_eq!(state.preset_mode(), Some(2));
        assert_eq!(state.light_on(), Some(false));
        assert_eq!(state.brightness(), Some(80));
        assert_eq!(state.color_temp(), Some(40));
    }

    #[test]
    fn clear_resets_state() {
        let mut state = DeviceState::new();
        state.set_power_on(true);
        state.set_brightness(50);

        state.clear();

        assert!(state.power_on().is_none());
        assert!(state.brightness().is_none());
    }
}
