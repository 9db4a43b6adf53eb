// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing fan view over a device.
//!
//! A [`FanEntity`] exposes the fan side of a device in host units: speed
//! as a 0-100 percentage plus preset modes and oscillation.

use std::sync::Arc;

use crate::command::CommandSink;
use crate::convert::{self, NativeRange};
use crate::device::Device;
use crate::error::{Error, ValueError};

/// The fan of a device, seen in host units.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use aeolux_lib::{CommandSink, Device, FanEntity};
///
/// # async fn example<S: CommandSink>(device: Arc<Device<S>>) -> aeolux_lib::Result<()> {
/// let fan = FanEntity::new(&device);
///
/// fan.turn_on(Some(50)).await?;
/// fan.set_preset_mode("sleep").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FanEntity<S: CommandSink> {
    device: Arc<Device<S>>,
}

impl<S: CommandSink> FanEntity<S> {
    /// Creates a fan view over a device.
    #[must_use]
    pub fn new(device: &Arc<Device<S>>) -> Self {
        Self {
            device: Arc::clone(device),
        }
    }

    /// Returns whether the fan is on, if known.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.device.snapshot().power_on
    }

    /// Returns the fan speed as a percentage (0-100), if known.
    #[must_use]
    pub fn percentage(&self) -> Option<u8> {
        self.device.snapshot().fan_percent
    }

    /// Returns the current preset mode, if known.
    #[must_use]
    pub fn preset_mode(&self) -> Option<&'static str> {
        self.device.snapshot().preset_mode
    }

    /// Returns the preset modes the model supports.
    #[must_use]
    pub fn preset_modes(&self) -> &'static [&'static str] {
        self.device.capabilities().preset_modes
    }

    /// Returns whether the fan is oscillating, if known and supported.
    #[must_use]
    pub fn oscillating(&self) -> Option<bool> {
        if !self.device.capabilities().supports_oscillation() {
            return None;
        }
        self.device.snapshot().oscillating
    }

    /// Returns the native speed range of the model.
    #[must_use]
    pub fn speed_range(&self) -> NativeRange {
        self.device.capabilities().speed_range
    }

    /// Turns the fan on, optionally at a target percentage.
    ///
    /// # Errors
    ///
    /// Returns error if the percentage is invalid or a command fails.
    pub async fn turn_on(&self, percentage: Option<u8>) -> Result<(), Error> {
        self.device.set_power(true).await?;
        if let Some(percent) = percentage
            && percent > 0
        {
            self.send_percentage(percent).await?;
        }
        Ok(())
    }

    /// Turns the fan off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails to send.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.device.set_power(false).await
    }

    /// Sets the fan speed as a percentage (0-100).
    ///
    /// A percentage of 0 turns the fan off instead of sending a wind
    /// level, matching host platform conventions.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] for percentages above 100, or
    /// error if the command fails.
    pub async fn set_percentage(&self, percent: u8) -> Result<(), Error> {
        if percent == 0 {
            return self.turn_off().await;
        }
        self.send_percentage(percent).await
    }

    /// Sets the preset mode by name.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidPresetMode`] for unknown names, or
    /// error if the command fails.
    pub async fn set_preset_mode(&self, mode: &str) -> Result<(), Error> {
        self.device.set_preset_mode(mode).await
    }

    /// Enables or disables oscillation.
    ///
    /// # Errors
    ///
    /// Returns error if the model does not oscillate or the command fails.
    pub async fn set_oscillating(&self, on: bool) -> Result<(), Error> {
        self.device.set_oscillating(on).await
    }

    async fn send_percentage(&self, percent: u8) -> Result<(), Error> {
        if percent > 100 {
            return Err(Error::Value(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(percent),
            }));
        }
        let level = convert::to_native_level(percent, self.device.capabilities().speed_range);
        self.device.set_wind_level(level).await
    }
}
