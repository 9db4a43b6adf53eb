// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation of server-pushed state deltas.
//!
//! The vendor cloud pushes partial updates: a mapping of native keys to
//! raw JSON values covering only the attributes that moved. The
//! [`Reconciler`] applies such a delta to the tracked [`DeviceState`],
//! validating each value's type against the capability table, and decides
//! whether the device's host-facing state effectively changed.
//!
//! Two rules shape the behavior:
//!
//! - A malformed or unknown field never disturbs existing state: the key
//!   is skipped and the previous value stays cached. An attribute only
//!   moves from unknown to known on a valid update and never regresses.
//! - All fields of one push event coalesce into at most one
//!   [`StateChange`] notification, and only when some attribute's
//!   host-unit value actually differs from the previously published view.

use serde_json::{Map, Value};

use crate::capabilities::{Attribute, Capabilities};
use crate::convert;

use super::{DeviceState, StateChange};

/// Host-facing view of a device, derived from [`DeviceState`].
///
/// A snapshot is always a pure function of the native state and the
/// capability table; it is never written directly, so it cannot silently
/// diverge from what the device reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySnapshot {
    /// Fan/device power.
    pub power_on: Option<bool>,
    /// Fan speed as a 0-100 percentage.
    pub fan_percent: Option<u8>,
    /// Preset mode name.
    pub preset_mode: Option<&'static str>,
    /// Horizontal oscillation.
    pub oscillating: Option<bool>,
    /// Main light power.
    pub light_on: Option<bool>,
    /// Main light brightness (0-255).
    pub brightness: Option<u8>,
    /// Main light color temperature in Kelvin.
    pub color_temp_kelvin: Option<u16>,
    /// Night light power.
    pub night_light_on: Option<bool>,
}

impl EntitySnapshot {
    /// Derives the host-facing view from native state and capabilities.
    #[must_use]
    pub fn from_state(state: &DeviceState, capabilities: &Capabilities) -> Self {
        let light = capabilities.light.as_ref();
        Self {
            power_on: state.power_on(),
            fan_percent: convert::to_host_percentage(state.wind_level(), capabilities.speed_range),
            preset_mode: state
                .preset_mode()
                .and_then(|native| capabilities.preset_mode_name(native)),
            oscillating: state.oscillating(),
            light_on: state.light_on(),
            brightness: light
                .and_then(|l| l.brightness)
                .and_then(|b| convert::to_host_brightness(state.brightness(), b.range)),
            color_temp_kelvin: light
                .and_then(|l| l.color_temp)
                .and_then(|c| convert::to_host_color_temp(state.color_temp(), c.range, c.kelvin)),
            night_light_on: state.night_light_on(),
        }
    }

    /// Lists the attributes whose value in `next` differs from this
    /// snapshot, as host-unit changes.
    ///
    /// Attributes that are unknown in `next` are never reported.
    fn changes_to(&self, next: &Self) -> Vec<StateChange> {
        let mut changes = Vec::new();
        if next.power_on != self.power_on
            && let Some(v) = next.power_on
        {
            changes.push(StateChange::Power(v));
        }
        if next.fan_percent != self.fan_percent
            && let Some(v) = next.fan_percent
        {
            changes.push(StateChange::FanSpeed(v));
        }
        if next.preset_mode != self.preset_mode
            && let Some(v) = next.preset_mode
        {
            changes.push(StateChange::PresetMode(v));
        }
        if next.oscillating != self.oscillating
            && let Some(v) = next.oscillating
        {
            changes.push(StateChange::Oscillating(v));
        }
        if next.light_on != self.light_on
            && let Some(v) = next.light_on
        {
            changes.push(StateChange::LightOn(v));
        }
        if next.brightness != self.brightness
            && let Some(v) = next.brightness
        {
            changes.push(StateChange::Brightness(v));
        }
        if next.color_temp_kelvin != self.color_temp_kelvin
            && let Some(v) = next.color_temp_kelvin
        {
            changes.push(StateChange::ColorTempKelvin(v));
        }
        if next.night_light_on != self.night_light_on
            && let Some(v) = next.night_light_on
        {
            changes.push(StateChange::NightLightOn(v));
        }
        changes
    }
}

/// Unwraps the vendor's nested value envelope.
///
/// Full state reports wrap each value as `{"state": <value>, ...}` while
/// incremental pushes carry the value directly; both forms are accepted.
fn raw_value(value: &Value) -> &Value {
    value.get("state").unwrap_or(value)
}

/// Applies server-pushed deltas to a device's tracked state.
///
/// The reconciler is the only mutator of [`DeviceState`]. It keeps the
/// previously published [`EntitySnapshot`] so that a push which changes no
/// effective host-unit value produces no notification.
#[derive(Debug, Clone)]
pub struct Reconciler {
    capabilities: Capabilities,
    state: DeviceState,
    published: EntitySnapshot,
}

impl Reconciler {
    /// Creates a reconciler for a device with the given capabilities.
    #[must_use]
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            state: DeviceState::new(),
            published: EntitySnapshot::default(),
        }
    }

    /// Returns the capability table this reconciler validates against.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns the tracked native state.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Returns the last published host-facing view.
    #[must_use]
    pub fn snapshot(&self) -> &EntitySnapshot {
        &self.published
    }

    /// Resets all tracked state to unknown.
    pub fn clear(&mut self) {
        self.state.clear();
        self.published = EntitySnapshot::default();
    }

    /// Applies one push event's delta and reports the effective change.
    ///
    /// Every known key with a type-correct value is stored; malformed
    /// values are skipped with a warning and the cached value retained.
    /// Returns `None` when nothing host-visible changed, otherwise a
    /// single [`StateChange`] coalescing every attribute the delta moved.
    pub fn apply_delta(&mut self, delta: &Map<String, Value>) -> Option<StateChange> {
        for (key, value) in delta {
            let Some(attribute) = self.capabilities.attribute_for_key(key) else {
                tracing::trace!(key = %key, "Ignoring untracked state key");
                continue;
            };
            let raw = raw_value(value);
            if attribute.is_boolean() {
                let Some(v) = raw.as_bool() else {
                    tracing::warn!(key = %key, value = %raw, "Expected boolean, skipping field");
                    continue;
                };
                self.store_bool(attribute, v);
            } else {
                let Some(v) = raw.as_i64() else {
                    tracing::warn!(key = %key, value = %raw, "Expected integer, skipping field");
                    continue;
                };
                self.store_number(attribute, v);
            }
        }

        let next = EntitySnapshot::from_state(&self.state, &self.capabilities);
        let mut changes = self.published.changes_to(&next);
        self.published = next;
        match changes.len() {
            0 => None,
            1 => changes.pop(),
            _ => Some(StateChange::Batch(changes)),
        }
    }

    fn store_bool(&mut self, attribute: Attribute, value: bool) {
        match attribute {
            Attribute::Power => self.state.set_power_on(value),
            Attribute::Oscillating => self.state.set_oscillating(value),
            Attribute::LightOn => self.state.set_light_on(value),
            Attribute::NightLightOn => self.state.set_night_light_on(value),
            _ => {}
        }
    }

    fn store_number(&mut self, attribute: Attribute, value: i64) {
        match attribute {
            Attribute::WindLevel => self.state.set_wind_level(value),
            Attribute::PresetMode => self.state.set_preset_mode(value),
            Attribute::Brightness => self.state.set_brightness(value),
            Attribute::ColorTemp => self.state.set_color_temp(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{BrightnessCapability, LightCapability};
    use crate::convert::NativeRange;
    use serde_json::json;

    fn delta(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("delta must be an object")
    }

    #[test]
    fn first_update_moves_attributes_from_unknown() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());

        let change = rec.apply_delta(&delta(json!({"lighton": true})));

        assert_eq!(change, Some(StateChange::LightOn(true)));
        assert_eq!(rec.state().light_on(), Some(true));
        assert_eq!(rec.snapshot().light_on, Some(true));
    }

    #[test]
    fn repeated_value_emits_no_notification() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());

        assert!(rec.apply_delta(&delta(json!({"lighton": true}))).is_some());
        // Same value again: no change, no notification
        assert!(rec.apply_delta(&delta(json!({"lighton": true}))).is_none());
    }

    #[test]
    fn malformed_field_is_skipped_and_previous_value_retained() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());
        rec.apply_delta(&delta(json!({"lighton": true, "brightness": 60})));

        let change = rec.apply_delta(&delta(json!({"lighton": false, "brightness": "bad"})));

        assert_eq!(change, Some(StateChange::LightOn(false)));
        assert_eq!(rec.state().brightness(), Some(60));
    }

    #[test]
    fn type_mismatch_on_boolean_is_skipped() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());
        rec.apply_delta(&delta(json!({"lighton": true})));

        assert!(rec.apply_delta(&delta(json!({"lighton": 1}))).is_none());
        assert_eq!(rec.state().light_on(), Some(true));
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());

        let change = rec.apply_delta(&delta(json!({"voiceon": true, "childlockon": false})));

        assert!(change.is_none());
        assert_eq!(rec.state(), &DeviceState::new());
    }

    #[test]
    fn multiple_attributes_coalesce_into_one_batch() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());

        let change = rec
            .apply_delta(&delta(json!({
                "lighton": true,
                "brightness": 100,
                "colortemp": 50
            })))
            .expect("three attributes changed");

        assert_eq!(change.change_count(), 3);
        assert!(change.is_batch());
    }

    #[test]
    fn single_attribute_change_is_not_wrapped_in_batch() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());
        rec.apply_delta(&delta(json!({"lighton": true, "brightness": 100})));

        let change = rec.apply_delta(&delta(json!({"brightness": 1}))).unwrap();
        assert_eq!(change, StateChange::Brightness(0));
    }

    #[test]
    fn nested_state_envelope_is_unwrapped() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());

        let change = rec.apply_delta(&delta(json!({
            "lighton": {"state": true, "timestamp": 1_700_000_000}
        })));

        assert_eq!(change, Some(StateChange::LightOn(true)));
    }

    #[test]
    fn native_move_with_same_host_value_emits_nothing() {
        // A wide native range where adjacent native steps collapse onto
        // the same 0-255 host value.
        let mut caps = Capabilities::ceiling_fan();
        caps.light = Some(LightCapability {
            power_key: "lighton",
            brightness: Some(BrightnessCapability {
                key: "brightness",
                range: NativeRange::new(1, 1000),
            }),
            color_temp: None,
        });
        let mut rec = Reconciler::new(caps);

        assert!(rec.apply_delta(&delta(json!({"brightness": 101}))).is_some());
        let change = rec.apply_delta(&delta(json!({"brightness": 102})));

        assert!(change.is_none(), "host value did not move: {change:?}");
        // The native value itself is still tracked
        assert_eq!(rec.state().brightness(), Some(102));
    }

    #[test]
    fn fan_attributes_convert_to_host_units() {
        let mut rec = Reconciler::new(Capabilities::tower_fan());

        let change = rec
            .apply_delta(&delta(json!({
                "poweron": true,
                "windlevel": 12,
                "windtype": 4,
                "shakehorizon": true
            })))
            .expect("all fan attributes changed");

        assert_eq!(change.change_count(), 4);
        let snapshot = rec.snapshot();
        assert_eq!(snapshot.power_on, Some(true));
        assert_eq!(snapshot.fan_percent, Some(100));
        assert_eq!(snapshot.preset_mode, Some("auto"));
        assert_eq!(snapshot.oscillating, Some(true));
    }

    #[test]
    fn unknown_preset_number_maps_to_no_mode() {
        let mut rec = Reconciler::new(Capabilities::tower_fan());
        rec.apply_delta(&delta(json!({"windtype": 2})));
        assert_eq!(rec.snapshot().preset_mode, Some("natural"));

        rec.apply_delta(&delta(json!({"windtype": 9})));
        assert_eq!(rec.snapshot().preset_mode, None);
        // Native value is still what the device reported
        assert_eq!(rec.state().preset_mode(), Some(9));
    }

    #[test]
    fn clear_resets_state_and_snapshot() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());
        rec.apply_delta(&delta(json!({"lighton": true, "brightness": 50})));

        rec.clear();

        assert_eq!(rec.state(), &DeviceState::new());
        assert_eq!(rec.snapshot(), &EntitySnapshot::default());
        // After a clear, the same values notify again
        assert!(rec.apply_delta(&delta(json!({"lighton": true}))).is_some());
    }

    #[test]
    fn snapshot_is_pure_function_of_state() {
        let mut rec = Reconciler::new(Capabilities::ceiling_fan());
        rec.apply_delta(&delta(json!({"brightness": 100, "colortemp": 0})));

        let derived = EntitySnapshot::from_state(rec.state(), rec.capabilities());
        assert_eq!(&derived, rec.snapshot());
        assert_eq!(derived.brightness, Some(255));
        assert_eq!(derived.color_temp_kelvin, Some(2700));
    }
}
