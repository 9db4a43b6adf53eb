// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] describes one effective change to a device's
//! host-facing state, in host units. The reconciler produces at most one
//! `StateChange` per server push; when several attributes move in the same
//! push, they are coalesced into a single [`StateChange::Batch`] so that
//! listeners are notified exactly once per push event.
//!
//! # Examples
//!
//! ```
//! use aeolux_lib::state::StateChange;
//!
//! let change = StateChange::batch(vec![
//!     StateChange::LightOn(true),
//!     StateChange::Brightness(128),
//! ]);
//! assert_eq!(change.change_count(), 2);
//! ```

/// Represents an effective change in a device's host-facing state.
///
/// Values are in host units: brightness 0-255, color temperature in
/// Kelvin, fan speed as a 0-100 percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// Fan/device power changed.
    Power(bool),

    /// Fan speed changed (0-100 percent).
    FanSpeed(u8),

    /// Preset mode changed.
    PresetMode(&'static str),

    /// Oscillation changed.
    Oscillating(bool),

    /// Main light power changed.
    LightOn(bool),

    /// Main light brightness changed (0-255).
    Brightness(u8),

    /// Main light color temperature changed (Kelvin).
    ColorTempKelvin(u16),

    /// Night light power changed.
    NightLightOn(bool),

    /// Multiple attributes changed in the same push event.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns `true` if this is a light-related change.
    #[must_use]
    pub fn is_light(&self) -> bool {
        matches!(
            self,
            Self::LightOn(_)
                | Self::Brightness(_)
                | Self::ColorTempKelvin(_)
                | Self::NightLightOn(_)
        )
    }

    /// Returns `true` if this is a fan-related change.
    #[must_use]
    pub fn is_fan(&self) -> bool {
        matches!(
            self,
            Self::Power(_) | Self::FanSpeed(_) | Self::PresetMode(_) | Self::Oscillating(_)
        )
    }

    /// Returns `true` if this is a batch of changes.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Returns the number of individual changes.
    ///
    /// For batch changes, returns the total count of nested changes.
    #[must_use]
    pub fn change_count(&self) -> usize {
        match self {
            Self::Batch(changes) => changes.iter().map(Self::change_count).sum(),
            _ => 1,
        }
    }
}
