// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capability descriptors.
//!
//! This module provides the statically declared capability tables for
//! supported Aeolux device models. A [`Capabilities`] value describes
//! which native command keys a model understands and which value ranges
//! those keys accept; it is fixed per model and consulted at entity
//! construction time instead of probing the device at runtime.
//!
//! # Manual configuration
//!
//! Models not in the built-in table can be described by constructing
//! [`Capabilities`] directly; all fields are public.

use crate::convert::{KelvinRange, NativeRange};

/// A tracked device attribute, addressed by its native command key.
///
/// Used by the reconciler to decide how to interpret the raw value a
/// server push carries for a given key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Fan/device power relay.
    Power,
    /// Fan wind level (native speed step).
    WindLevel,
    /// Fan preset mode (native mode number).
    PresetMode,
    /// Horizontal oscillation.
    Oscillating,
    /// Main light power.
    LightOn,
    /// Main light brightness (native units).
    Brightness,
    /// Main light color temperature (native percentage).
    ColorTemp,
    /// Night/panel light power.
    NightLightOn,
}

impl Attribute {
    /// Returns `true` if the attribute carries a boolean raw value.
    ///
    /// All other attributes carry integer raw values.
    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(
            self,
            Self::Power | Self::Oscillating | Self::LightOn | Self::NightLightOn
        )
    }
}

/// Which light feature of a device an entity is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightFeature {
    /// The main light (typically a fan light with brightness/color control).
    Main,
    /// The night/panel light (typically on/off only).
    NightLight,
}

/// Presentation mode of a light feature.
///
/// The host platform expects a light to report exactly one mode: a richer
/// mode strictly subsumes the simpler ones (color temperature implies
/// brightness implies on/off), so the reported set is never a union of
/// finer- and coarser-grained modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// The light can only be turned on or off.
    OnOff,
    /// The light can be dimmed.
    Brightness,
    /// The light can be dimmed and its color temperature adjusted.
    ColorTemp,
}

/// Brightness control configuration for a light feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessCapability {
    /// Native command key for brightness.
    pub key: &'static str,
    /// Native value range the device accepts.
    pub range: NativeRange,
}

/// Color temperature control configuration for a light feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTempCapability {
    /// Native command key for color temperature.
    pub key: &'static str,
    /// Native percentage range the device accepts.
    pub range: NativeRange,
    /// Host-side Kelvin bounds the native range maps onto.
    pub kelvin: KelvinRange,
}

/// Capabilities of a single light feature.
///
/// # Examples
///
/// ```
/// use aeolux_lib::capabilities::{Capabilities, ColorMode};
///
/// let caps = Capabilities::ceiling_fan();
/// let light = caps.light.as_ref().unwrap();
///
/// // Color temperature subsumes brightness subsumes on/off
/// assert_eq!(light.supported_color_modes(), [ColorMode::ColorTemp]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightCapability {
    /// Native command key for light power.
    pub power_key: &'static str,
    /// Brightness control, if the light is dimmable.
    pub brightness: Option<BrightnessCapability>,
    /// Color temperature control, if the light supports it.
    pub color_temp: Option<ColorTempCapability>,
}

impl LightCapability {
    /// Creates an on/off-only light feature.
    #[must_use]
    pub const fn on_off(power_key: &'static str) -> Self {
        Self {
            power_key,
            brightness: None,
            color_temp: None,
        }
    }

    /// Returns `true` if the light is dimmable.
    #[must_use]
    pub const fn supports_brightness(&self) -> bool {
        self.brightness.is_some()
    }

    /// Returns `true` if the light supports color temperature control.
    #[must_use]
    pub const fn supports_color_temp(&self) -> bool {
        self.color_temp.is_some()
    }

    /// Returns the single presentation mode for this light.
    ///
    /// Precedence: color temperature > brightness > on/off.
    #[must_use]
    pub const fn color_mode(&self) -> ColorMode {
        if self.color_temp.is_some() {
            ColorMode::ColorTemp
        } else if self.brightness.is_some() {
            ColorMode::Brightness
        } else {
            ColorMode::OnOff
        }
    }

    /// Returns the reported mode set: exactly the most capable mode.
    #[must_use]
    pub const fn supported_color_modes(&self) -> [ColorMode; 1] {
        [self.color_mode()]
    }
}

/// Capabilities of an Aeolux device model.
///
/// Describes the native command keys, value ranges and optional features
/// of one model. Use the model presets or [`Capabilities::for_model`] for
/// the built-in table.
///
/// # Examples
///
/// ```
/// use aeolux_lib::Capabilities;
///
/// let caps = Capabilities::for_model("HCF001S").unwrap();
/// assert!(caps.light.is_some());
/// assert_eq!(caps.speed_range.min, 1);
/// assert_eq!(caps.speed_range.max, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Native command key for fan/device power.
    pub power_key: &'static str,
    /// Native command key for the wind level.
    pub wind_level_key: &'static str,
    /// Native wind level range.
    pub speed_range: NativeRange,
    /// Native command key for the preset mode.
    pub preset_mode_key: &'static str,
    /// Preset mode names, in native order (native value is index + 1).
    pub preset_modes: &'static [&'static str],
    /// Native command key for oscillation, if supported.
    pub oscillation_key: Option<&'static str>,
    /// Main light feature, if present.
    pub light: Option<LightCapability>,
    /// Night/panel light feature, if present.
    pub night_light: Option<LightCapability>,
}

impl Capabilities {
    /// Creates capabilities for a ceiling fan with an integrated CCT light
    /// (models `HCF001S` and compatible).
    #[must_use]
    pub const fn ceiling_fan() -> Self {
        Self {
            power_key: "fanon",
            wind_level_key: "windlevel",
            speed_range: NativeRange::new(1, 12),
            preset_mode_key: "mode",
            preset_modes: &["normal", "natural", "sleep", "reverse"],
            oscillation_key: None,
            light: Some(LightCapability {
                power_key: "lighton",
                brightness: Some(BrightnessCapability {
                    key: "brightness",
                    range: NativeRange::new(1, 100),
                }),
                color_temp: Some(ColorTempCapability {
                    key: "colortemp",
                    range: NativeRange::new(0, 100),
                    kelvin: KelvinRange::new(2700, 6500),
                }),
            }),
            night_light: None,
        }
    }

    /// Creates capabilities for a tower fan (models `HTF005S`, `HTF010S`
    /// and compatible).
    #[must_use]
    pub const fn tower_fan() -> Self {
        Self {
            power_key: "poweron",
            wind_level_key: "windlevel",
            speed_range: NativeRange::new(1, 12),
            preset_mode_key: "windtype",
            preset_modes: &["normal", "natural", "sleep", "auto"],
            oscillation_key: Some("shakehorizon"),
            light: None,
            night_light: None,
        }
    }

    /// Creates capabilities for an air purifier with a panel light
    /// (model `HAP003S` and compatible).
    #[must_use]
    pub const fn air_purifier() -> Self {
        Self {
            power_key: "poweron",
            wind_level_key: "windlevel",
            speed_range: NativeRange::new(1, 4),
            preset_mode_key: "mode",
            preset_modes: &["auto", "sleep", "manual"],
            oscillation_key: None,
            light: None,
            night_light: Some(LightCapability::on_off("ledpotkepton")),
        }
    }

    /// Looks up the capabilities for a model identifier.
    ///
    /// Returns `None` for models not in the supported table.
    #[must_use]
    pub fn for_model(model: &str) -> Option<Self> {
        match model {
            "HCF001S" => Some(Self::ceiling_fan()),
            "HTF005S" | "HTF010S" => Some(Self::tower_fan()),
            "HAP003S" => Some(Self::air_purifier()),
            _ => None,
        }
    }

    /// Returns `true` if the model supports horizontal oscillation.
    #[must_use]
    pub const fn supports_oscillation(&self) -> bool {
        self.oscillation_key.is_some()
    }

    /// Returns the capability descriptor for a light feature, if the model
    /// has that feature.
    #[must_use]
    pub const fn light_capability(&self, feature: LightFeature) -> Option<&LightCapability> {
        match feature {
            LightFeature::Main => self.light.as_ref(),
            LightFeature::NightLight => self.night_light.as_ref(),
        }
    }

    /// Resolves a native command key to the attribute it addresses.
    ///
    /// Returns `None` for keys this model does not track; the reconciler
    /// ignores those.
    #[must_use]
    pub fn attribute_for_key(&self, key: &str) -> Option<Attribute> {
        if key == self.power_key {
            return Some(Attribute::Power);
        }
        if key == self.wind_level_key {
            return Some(Attribute::WindLevel);
        }
        if key == self.preset_mode_key {
            return Some(Attribute::PresetMode);
        }
        if self.oscillation_key == Some(key) {
            return Some(Attribute::Oscillating);
        }
        if let Some(light) = &self.light {
            if key == light.power_key {
                return Some(Attribute::LightOn);
            }
            if light.brightness.as_ref().is_some_and(|b| b.key == key) {
                return Some(Attribute::Brightness);
            }
            if light.color_temp.as_ref().is_some_and(|c| c.key == key) {
                return Some(Attribute::ColorTemp);
            }
        }
        if self
            .night_light
            .as_ref()
            .is_some_and(|n| n.power_key == key)
        {
            return Some(Attribute::NightLightOn);
        }
        None
    }

    /// Returns the preset mode name for a native mode value.
    ///
    /// Native mode values are 1-based indices into the mode table; unknown
    /// values return `None`.
    #[must_use]
    pub fn preset_mode_name(&self, native: i64) -> Option<&'static str> {
        let index = usize::try_from(native.checked_sub(1)?).ok()?;
        self.preset_modes.get(index).copied()
    }

    /// Returns the native mode value for a preset mode name.
    #[must_use]
    pub fn preset_mode_value(&self, name: &str) -> Option<u16> {
        self.preset_modes
            .iter()
            .position(|m| *m == name)
            .and_then(|i| u16::try_from(i + 1).ok())
    }
}
