// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module turns a collision on the capacity into a collision of the full hash.
//!
//! If the final states `s_1, s_2` of two messages share their capacity part,
//! they only differ in the rate part, which the next absorbed block controls.
//! Appending `x` to the first and `x ^ s_1 ^ s_2` to the second message
//! results in the same state after the next block and hence in the same digest
//! for every output length.
//!
//! The main references are listed in the following:
//! - \[1\] Bertoni, Guido and Daemen, Joan and Peeters, Michaël and Van Assche, Gilles (2011).
//! Cryptographic sponge functions, Section 5.
//! <https://keccak.team/files/CSF-0.1.pdf>

use super::collision::Collision;
use crate::{
    construction::hash::{HashInto, ReducedKeccak},
    error::SpongeError,
    utils::bytes::{xor, xor_in_place},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Two distinct messages with the same digest under a [`ReducedKeccak`].
///
/// Attributes:
/// - `message_1`: the first message of the collision followed by `suffix_1`
/// - `message_2`: the second message of the collision followed by `suffix_2`
/// - `suffix_1`: the block appended to the first message
/// - `suffix_2`: the block appended to the second message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgedCollision {
    #[serde(with = "hex::serde")]
    pub message_1: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub message_2: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub suffix_1: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub suffix_2: Vec<u8>,
}

impl ForgedCollision {
    /// Hashes both forged messages and compares their digests.
    ///
    /// Parameters:
    /// - `hash`: the hash the collision was forged for
    ///
    /// Returns the common digest or a [`SpongeError`] if the digests differ.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::attack::collision::{ChainSearch, CollisionSearch};
    /// use keccak_collision::attack::forge::forge_suffixes;
    /// use keccak_collision::construction::hash::ReducedKeccak;
    ///
    /// let hash = ReducedKeccak::with_rate_output(16).unwrap();
    /// let collision = CollisionSearch::new(hash, ChainSearch::default()).run().unwrap();
    /// let forged = forge_suffixes(&collision, &hash, 0x37).unwrap();
    ///
    /// let digest = forged.verify(&hash.with_output_bits(256).unwrap()).unwrap();
    ///
    /// assert_eq!("5b83eea931ad1b5c", hex::encode(&digest[..8]));
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`ForgeryMismatch`](SpongeError::ForgeryMismatch)
    /// if both messages are equal or their digests differ.
    pub fn verify(&self, hash: &ReducedKeccak) -> Result<Vec<u8>, SpongeError> {
        if self.message_1 == self.message_2 {
            return Err(SpongeError::ForgeryMismatch(
                "The forged messages are equal.".to_string(),
            ));
        }
        let digest_1 = hash.hash(&self.message_1).digest;
        let digest_2 = hash.hash(&self.message_2).digest;
        if digest_1 != digest_2 {
            return Err(SpongeError::ForgeryMismatch(format!(
                "The forged messages hash to {} and {}.",
                hex::encode(&digest_1),
                hex::encode(&digest_2)
            )));
        }

        debug!(
            output_bits = hash.output_bits(),
            digest = %hex::encode(&digest_1),
            "verified forged collision"
        );
        Ok(digest_1)
    }
}

/// Extends both messages of a capacity collision by one block each,
/// such that the extended messages have the same digest.
///
/// Parameters:
/// - `collision`: two distinct messages whose final states share the capacity part
/// - `hash`: the hash the collision was found for
/// - `marker`: the first byte of `suffix_1`, whose remaining bytes are zero
///
/// Returns the [`ForgedCollision`] with `suffix_2 = suffix_1 ^ s_1 ^ s_2` on the rate part
/// of the final states `s_1, s_2` or a [`SpongeError`] if `collision` can not be extended.
///
/// # Examples
/// ```
/// use keccak_collision::attack::collision::{CollisionSearch, CycleDetection};
/// use keccak_collision::attack::forge::forge_suffixes;
/// use keccak_collision::construction::hash::ReducedKeccak;
///
/// let hash = ReducedKeccak::with_rate_output(16).unwrap();
/// let collision = CollisionSearch::new(hash, CycleDetection::default()).run().unwrap();
///
/// let forged = forge_suffixes(&collision, &hash, 0x37).unwrap();
///
/// assert_ne!(forged.message_1, forged.message_2);
/// assert!(forged.verify(&hash).is_ok());
/// ```
///
/// # Errors and Failures
/// - Returns a [`SpongeError`] of type [`NotACollision`](SpongeError::NotACollision)
/// if both messages are equal or their final states differ on the capacity part.
/// - Returns a [`SpongeError`] of type [`UnalignedMessage`](SpongeError::UnalignedMessage)
/// if the length of one of the messages is not a multiple of the rate.
pub fn forge_suffixes(
    collision: &Collision,
    hash: &ReducedKeccak,
    marker: u8,
) -> Result<ForgedCollision, SpongeError> {
    let (first, second) = (&collision.first, &collision.second);
    let rate_bytes = hash.rate_bytes();
    let capacity_bytes = hash.capacity_bytes();

    if first.message == second.message {
        return Err(SpongeError::NotACollision(
            "Both messages of the collision are equal.".to_string(),
        ));
    }
    if first.final_state.tail(capacity_bytes) != second.final_state.tail(capacity_bytes) {
        return Err(SpongeError::NotACollision(format!(
            "The final states differ on the last {capacity_bytes} bytes."
        )));
    }
    for message in [&first.message, &second.message] {
        if message.len() % rate_bytes != 0 {
            return Err(SpongeError::UnalignedMessage(format!(
                "A message of {} bytes does not end at a block boundary of {rate_bytes} bytes.",
                message.len()
            )));
        }
    }

    let mut suffix_1 = vec![0u8; rate_bytes];
    suffix_1[0] = marker;
    let mut suffix_2 = xor(&suffix_1, &first.final_state.to_bytes()[..rate_bytes]);
    xor_in_place(&mut suffix_2, &second.final_state.to_bytes()[..rate_bytes]);

    info!(
        marker,
        suffix_2 = %hex::encode(&suffix_2),
        "forged suffixes"
    );
    Ok(ForgedCollision {
        message_1: [first.message.as_slice(), &suffix_1].concat(),
        message_2: [second.message.as_slice(), &suffix_2].concat(),
        suffix_1,
        suffix_2,
    })
}
