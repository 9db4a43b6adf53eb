// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Multi-device registry and push-message routing.
//!
//! A [`DeviceManager`] owns the devices of one account session and routes
//! each incoming push message to the device it addresses, by serial
//! number. Messages for unknown devices are dropped with a log entry; one
//! push message produces at most one notification on the addressed device.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::command::CommandSink;
use crate::device::{Device, DeviceInfo};
use crate::error::Error;

/// Registry of devices sharing one command transport.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use aeolux_lib::{CommandSink, DeviceInfo, DeviceManager};
/// use serde_json::json;
///
/// # fn example<S: CommandSink>(sink: Arc<S>) -> aeolux_lib::Result<()> {
/// let manager = DeviceManager::new(sink);
/// manager.register(DeviceInfo::new("SN1", "Bedroom Fan", "HCF001S"))?;
///
/// // Route a push message from the cloud session
/// manager.handle_message(&json!({
///     "devicesn": "SN1",
///     "reported": {"lighton": true}
/// }));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceManager<S: CommandSink> {
    sink: Arc<S>,
    devices: RwLock<HashMap<String, Arc<Device<S>>>>,
}

impl<S: CommandSink> DeviceManager<S> {
    /// Creates an empty manager over a shared command transport.
    #[must_use]
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            sink,
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a device by looking its model up in the capability table.
    ///
    /// Replaces any previously registered device with the same serial
    /// number.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownModel`](crate::error::DeviceError)
    /// if the model is not supported.
    pub fn register(&self, info: DeviceInfo) -> Result<Arc<Device<S>>, Error> {
        let device = Arc::new(Device::from_model(info, self.sink.clone())?);
        tracing::debug!(sn = %device.sn(), model = %device.info().model, "Registering device");
        self.devices
            .write()
            .insert(device.sn().to_string(), device.clone());
        Ok(device)
    }

    /// Adds an already constructed device to the registry.
    pub fn insert(&self, device: Arc<Device<S>>) {
        self.devices
            .write()
            .insert(device.sn().to_string(), device);
    }

    /// Removes a device by serial number.
    ///
    /// Returns the removed device, if it was registered.
    pub fn remove(&self, sn: &str) -> Option<Arc<Device<S>>> {
        self.devices.write().remove(sn)
    }

    /// Looks up a device by serial number.
    #[must_use]
    pub fn device(&self, sn: &str) -> Option<Arc<Device<S>>> {
        self.devices.read().get(sn).cloned()
    }

    /// Returns all registered devices.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<Device<S>>> {
        self.devices.read().values().cloned().collect()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if no devices are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Routes one push message to the device it addresses.
    ///
    /// The target is identified by the message's `devicesn` field.
    /// Messages without it, or for serial numbers that are not
    /// registered, are dropped.
    pub fn handle_message(&self, message: &Value) {
        let Some(sn) = message.get("devicesn").and_then(Value::as_str) else {
            tracing::debug!("Push message without devicesn, ignoring");
            return;
        };
        let Some(device) = self.device(sn) else {
            tracing::debug!(sn = %sn, "Push message for unregistered device, ignoring");
            return;
        };
        device.handle_server_update(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use serde_json::json;

    fn manager() -> DeviceManager<RecordingSink> {
        DeviceManager::new(Arc::new(RecordingSink::default()))
    }

    #[test]
    fn register_and_lookup() {
        let manager = manager();
        assert!(manager.is_empty());

        manager
            .register(DeviceInfo::new("SN1", "Fan", "HCF001S"))
            .unwrap();
        manager
            .register(DeviceInfo::new("SN2", "Tower", "HTF005S"))
            .unwrap();

        assert_eq!(manager.len(), 2);
        assert!(manager.device("SN1").is_some());
        assert!(manager.device("SN3").is_none());
    }

    #[test]
    fn register_unknown_model_fails() {
        let manager = manager();
        let result = manager.register(DeviceInfo::new("SN1", "Mystery", "XYZ999"));
        assert!(result.is_err());
        assert!(manager.is_empty());
    }

    #[test]
    fn messages_route_by_serial_number() {
        let manager = manager();
        let fan = manager
            .register(DeviceInfo::new("SN1", "Fan", "HCF001S"))
            .unwrap();
        let tower = manager
            .register(DeviceInfo::new("SN2", "Tower", "HTF005S"))
            .unwrap();

        manager.handle_message(&json!({
            "devicesn": "SN1",
            "reported": {"lighton": true}
        }));

        assert_eq!(fan.state().light_on(), Some(true));
        assert_eq!(tower.state().power_on(), None);
    }

    #[test]
    fn unaddressed_messages_are_dropped() {
        let manager = manager();
        let fan = manager
            .register(DeviceInfo::new("SN1", "Fan", "HCF001S"))
            .unwrap();

        manager.handle_message(&json!({"reported": {"lighton": true}}));
        manager.handle_message(&json!({
            "devicesn": "SN-UNKNOWN",
            "reported": {"lighton": true}
        }));

        assert_eq!(fan.state().light_on(), None);
    }

    #[test]
    fn remove_unregisters_device() {
        let manager = manager();
        manager
            .register(DeviceInfo::new("SN1", "Fan", "HCF001S"))
            .unwrap();

        assert!(manager.remove("SN1").is_some());
        assert!(manager.remove("SN1").is_none());
        assert!(manager.is_empty());
    }
}
