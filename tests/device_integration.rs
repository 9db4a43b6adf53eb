// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests for the command/push round trip.
//!
//! These tests drive a device the way a platform integration would: issue
//! commands through a recorded transport, then feed back the confirming
//! server pushes and observe the published state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use serde_json::json;

use aeolux_lib::error::TransportError;
use aeolux_lib::{
    CommandSink, ControlRequest, Device, DeviceInfo, DeviceManager, FanEntity, LightEntity,
    StateChange, TurnOnOptions,
};

/// Transport double that records envelopes instead of delivering them.
#[derive(Debug, Default)]
struct RecordingSink {
    sent: Mutex<Vec<ControlRequest>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<ControlRequest> {
        self.sent.lock().clone()
    }
}

impl CommandSink for RecordingSink {
    async fn send(&self, request: &ControlRequest) -> Result<(), TransportError> {
        self.sent.lock().push(request.clone());
        Ok(())
    }
}

fn ceiling_fan() -> (Arc<RecordingSink>, Arc<Device<RecordingSink>>) {
    let sink = Arc::new(RecordingSink::default());
    let info = DeviceInfo::new("SN-INT-1", "Bedroom Fan", "HCF001S");
    let device = Arc::new(Device::from_model(info, sink.clone()).unwrap());
    (sink, device)
}

#[tokio::test]
async fn light_command_round_trip() {
    let (sink, device) = ceiling_fan();
    let light = LightEntity::main(&device).unwrap();

    let notifications = Arc::new(AtomicU32::new(0));
    let n = notifications.clone();
    device.on_state_changed(move |_| {
        n.fetch_add(1, Ordering::SeqCst);
    });

    // Host requests full brightness and warm white in one call
    light
        .turn_on(
            TurnOnOptions::new()
                .with_brightness(255)
                .with_color_temp_kelvin(2700),
        )
        .await
        .unwrap();

    // Three independent native commands went out
    let sent = sink.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|r| r.device_sn() == "SN-INT-1"));
    assert_eq!(sent[0].params().get("lighton"), Some(&json!(true)));
    assert_eq!(sent[1].params().get("brightness"), Some(&json!(100)));
    assert_eq!(sent[2].params().get("colortemp"), Some(&json!(0)));

    // Nothing published yet: the device may still reject the command
    assert_eq!(light.is_on(), None);
    assert_eq!(notifications.load(Ordering::SeqCst), 0);

    // The cloud confirms everything in one push: one notification
    device.handle_server_update(&json!({
        "reported": {"lighton": true, "brightness": 100, "colortemp": 0}
    }));
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
    assert_eq!(light.is_on(), Some(true));
    assert_eq!(light.brightness(), Some(255));
    assert_eq!(light.color_temp_kelvin(), Some(2700));
}

#[tokio::test]
async fn device_altering_a_requested_value_wins() {
    let (_, device) = ceiling_fan();
    let light = LightEntity::main(&device).unwrap();

    light
        .turn_on(TurnOnOptions::new().with_brightness(255))
        .await
        .unwrap();

    // The device clamps the brightness to 80 on its side
    device.handle_server_update(&json!({"reported": {"lighton": true, "brightness": 80}}));

    let back = light.brightness().unwrap();
    assert_eq!(back, 203, "published value reflects the device, not the request");
}

#[tokio::test]
async fn pushes_coalesce_but_distinct_events_notify_separately() {
    let (_, device) = ceiling_fan();

    let changes = Arc::new(Mutex::new(Vec::<StateChange>::new()));
    let c = changes.clone();
    device.on_state_changed(move |change| {
        c.lock().push(change.clone());
    });

    device.handle_server_update(&json!({"reported": {"fanon": true, "windlevel": 6}}));
    device.handle_server_update(&json!({"reported": {"windlevel": 12}}));

    let seen = changes.lock();
    assert_eq!(seen.len(), 2, "one notification per push event");
    assert_eq!(seen[0].change_count(), 2);
    assert_eq!(seen[1], StateChange::FanSpeed(100));
}

#[tokio::test]
async fn fan_and_light_share_one_device_state() {
    let (sink, device) = ceiling_fan();
    let fan = FanEntity::new(&device);
    let light = LightEntity::main(&device).unwrap();

    fan.turn_on(Some(50)).await.unwrap();
    light.turn_off().await.unwrap();

    let sent = sink.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].params().get("fanon"), Some(&json!(true)));
    assert_eq!(sent[1].params().get("windlevel"), Some(&json!(7)));
    assert_eq!(sent[2].params().get("lighton"), Some(&json!(false)));

    device.handle_server_update(&json!({
        "reported": {"fanon": true, "windlevel": 7, "lighton": false}
    }));
    assert_eq!(fan.is_on(), Some(true));
    assert_eq!(fan.percentage(), Some(55));
    assert_eq!(light.is_on(), Some(false));
}

#[tokio::test]
async fn manager_routes_pushes_across_devices() {
    let sink = Arc::new(RecordingSink::default());
    let manager = DeviceManager::new(sink);

    let fan = manager
        .register(DeviceInfo::new("SN-A", "Bedroom Fan", "HCF001S"))
        .unwrap();
    let purifier = manager
        .register(DeviceInfo::new("SN-B", "Purifier", "HAP003S"))
        .unwrap();

    manager.handle_message(&json!({
        "devicesn": "SN-B",
        "reported": {"ledpotkepton": true, "poweron": true}
    }));
    manager.handle_message(&json!({
        "devicesn": "SN-A",
        "reported": {"lighton": true}
    }));
    manager.handle_message(&json!({
        "devicesn": "SN-MISSING",
        "reported": {"lighton": true}
    }));

    assert_eq!(fan.state().light_on(), Some(true));
    assert_eq!(fan.state().power_on(), None);
    assert_eq!(purifier.state().night_light_on(), Some(true));
    assert_eq!(purifier.state().power_on(), Some(true));
}

#[tokio::test]
async fn malformed_push_fields_never_break_the_session() {
    let (_, device) = ceiling_fan();
    let light = LightEntity::main(&device).unwrap();

    device.handle_server_update(&json!({
        "reported": {"lighton": true, "brightness": 60, "colortemp": 50}
    }));

    // A later push with garbage in two fields still applies the good one
    device.handle_server_update(&json!({
        "reported": {"lighton": "on", "brightness": [60], "colortemp": 100}
    }));

    assert_eq!(light.is_on(), Some(true));
    assert_eq!(device.state().brightness(), Some(60));
    assert_eq!(light.color_temp_kelvin(), Some(6500));
}
