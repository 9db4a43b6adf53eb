// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Aeolux library.
//!
//! This module provides the error hierarchy for failures across the library:
//! value validation, transport communication, and device operations.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when interacting
/// with Aeolux devices.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while communicating with the vendor cloud.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to send a value the device model
/// cannot represent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A preset mode name is not supported by the device model.
    #[error("invalid preset mode: {0}")]
    InvalidPresetMode(String),
}

/// Errors related to command transport.
///
/// The transport itself (push session, authentication, retry policy) is
/// owned by the [`CommandSink`](crate::command::CommandSink) implementation;
/// these variants are what implementations surface back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the vendor cloud failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Command timed out.
    #[error("command timed out after {0} ms")]
    Timeout(u64),

    /// The push session is not established.
    #[error("not connected")]
    NotConnected,

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device does not support the requested capability.
    #[error("device does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: String,
    },

    /// The device model is not in the supported model table.
    #[error("unknown device model: {0}")]
    UnknownModel(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
