// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing light view over a device.
//!
//! A [`LightEntity`] binds to one light feature of a device (the main fan
//! light or the night/panel light) and exposes it in host units:
//! brightness 0-255 and color temperature in Kelvin. It is the layer a
//! platform integration hangs its light entity on.

use std::sync::Arc;

use crate::capabilities::{ColorMode, LightCapability, LightFeature};
use crate::command::CommandSink;
use crate::device::Device;
use crate::error::Error;

/// Optional targets for a turn-on request.
///
/// Brightness and color temperature may be supplied together; they are
/// applied independently, each as its own native command.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOnOptions {
    /// Target brightness (0-255).
    pub brightness: Option<u8>,
    /// Target color temperature in Kelvin.
    pub color_temp_kelvin: Option<u16>,
}

impl TurnOnOptions {
    /// Creates empty options (turn on only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a target brightness (0-255).
    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Sets a target color temperature in Kelvin.
    #[must_use]
    pub const fn with_color_temp_kelvin(mut self, kelvin: u16) -> Self {
        self.color_temp_kelvin = Some(kelvin);
        self
    }
}

/// A light feature of a device, seen in host units.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use aeolux_lib::{CommandSink, Device, LightEntity, TurnOnOptions};
///
/// # async fn example<S: CommandSink>(device: Arc<Device<S>>) -> aeolux_lib::Result<()> {
/// let light = LightEntity::main(&device).expect("model has a main light");
///
/// light
///     .turn_on(TurnOnOptions::new().with_brightness(191).with_color_temp_kelvin(4000))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LightEntity<S: CommandSink> {
    device: Arc<Device<S>>,
    feature: LightFeature,
    capability: LightCapability,
}

impl<S: CommandSink> LightEntity<S> {
    /// Creates a view over the device's main light.
    ///
    /// Returns `None` if the model has no main light.
    #[must_use]
    pub fn main(device: &Arc<Device<S>>) -> Option<Self> {
        Self::for_feature(device, LightFeature::Main)
    }

    /// Creates a view over the device's night/panel light.
    ///
    /// Returns `None` if the model has no night light.
    #[must_use]
    pub fn night_light(device: &Arc<Device<S>>) -> Option<Self> {
        Self::for_feature(device, LightFeature::NightLight)
    }

    /// Creates a view over the given light feature, if the model has it.
    #[must_use]
    pub fn for_feature(device: &Arc<Device<S>>, feature: LightFeature) -> Option<Self> {
        let capability = *device.capabilities().light_capability(feature)?;
        Some(Self {
            device: Arc::clone(device),
            feature,
            capability,
        })
    }

    /// Returns which light feature this entity is bound to.
    #[must_use]
    pub fn feature(&self) -> LightFeature {
        self.feature
    }

    /// Returns the current presentation mode.
    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.capability.color_mode()
    }

    /// Returns the reported mode set: exactly the most capable mode.
    #[must_use]
    pub fn supported_color_modes(&self) -> [ColorMode; 1] {
        self.capability.supported_color_modes()
    }

    /// Returns whether the light is on, if known.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        let snapshot = self.device.snapshot();
        match self.feature {
            LightFeature::Main => snapshot.light_on,
            LightFeature::NightLight => snapshot.night_light_on,
        }
    }

    /// Returns the brightness (0-255), if known and supported.
    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        if !self.capability.supports_brightness() {
            return None;
        }
        match self.feature {
            LightFeature::Main => self.device.snapshot().brightness,
            LightFeature::NightLight => None,
        }
    }

    /// Returns the color temperature in Kelvin, if known and supported.
    #[must_use]
    pub fn color_temp_kelvin(&self) -> Option<u16> {
        if !self.capability.supports_color_temp() {
            return None;
        }
        match self.feature {
            LightFeature::Main => self.device.snapshot().color_temp_kelvin,
            LightFeature::NightLight => None,
        }
    }

    /// Returns the warmest supported color temperature, if any.
    #[must_use]
    pub fn min_color_temp_kelvin(&self) -> Option<u16> {
        self.capability.color_temp.map(|c| c.kelvin.min)
    }

    /// Returns the coolest supported color temperature, if any.
    #[must_use]
    pub fn max_color_temp_kelvin(&self) -> Option<u16> {
        self.capability.color_temp.map(|c| c.kelvin.max)
    }

    /// Turns the light on, optionally targeting brightness and color
    /// temperature.
    ///
    /// Targets the light does not support are ignored; the on/off portion
    /// of the request still applies. Cached state is not touched here - it
    /// follows from the confirming server push.
    ///
    /// # Errors
    ///
    /// Returns error if a command fails to send.
    pub async fn turn_on(&self, options: TurnOnOptions) -> Result<(), Error> {
        self.device.set_light_power(self.feature, true).await?;

        if let Some(brightness) = options.brightness {
            if self.capability.supports_brightness() {
                self.device.set_brightness(self.feature, brightness).await?;
            } else {
                tracing::debug!(
                    sn = %self.device.sn(),
                    "Light does not support brightness, ignoring target"
                );
            }
        }

        if let Some(kelvin) = options.color_temp_kelvin {
            if self.capability.supports_color_temp() {
                self.device.set_color_temp(self.feature, kelvin).await?;
            } else {
                tracing::debug!(
                    sn = %self.device.sn(),
                    "Light does not support color temperature, ignoring target"
                );
            }
        }

        Ok(())
    }

    /// Turns the light off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails to send.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.device.set_light_power(self.feature, false).await
    }
}
