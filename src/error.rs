// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the error type [`SpongeError`], which is returned
//! by every fallible function of this crate.

use thiserror::Error;

/// [`SpongeError`] defines the errors that can occur while configuring a sponge,
/// running a collision search, or forging colliding messages.
///
/// Possible entries:
/// - `InvalidParameters` is thrown if the rate, capacity, or output length
///   do not describe a valid sponge instance
/// - `InvalidState` is thrown if bytes can not be interpreted as a Keccak state
/// - `InvalidConfig` is thrown if a collision search can not be set up
/// - `NotACollision` is thrown if the forger is handed two messages which
///   do not collide in the capacity part of their state
/// - `UnalignedMessage` is thrown if a message does not end on a block boundary
/// - `ForgeryMismatch` is thrown if two forged messages do not hash to the same digest
///
/// # Examples
/// ```
/// use keccak_collision::{construction::sponge::Sponge, error::SpongeError};
///
/// let res = Sponge::new(801, 799, 0x06);
///
/// assert!(matches!(res, Err(SpongeError::InvalidParameters(_))));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpongeError {
    /// rate, capacity, or output length are invalid
    #[error("invalid sponge parameters. {0}")]
    InvalidParameters(String),
    /// bytes do not describe a Keccak state
    #[error("invalid state. {0}")]
    InvalidState(String),
    /// the collision search is misconfigured
    #[error("invalid search configuration. {0}")]
    InvalidConfig(String),
    /// the witnesses handed to the forger do not collide
    #[error("the given messages do not collide. {0}")]
    NotACollision(String),
    /// a message does not end on a block boundary
    #[error("the message is not aligned to the rate. {0}")]
    UnalignedMessage(String),
    /// forged messages hash to different digests
    #[error("the forged messages do not collide. {0}")]
    ForgeryMismatch(String),
}
