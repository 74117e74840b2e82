// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the sponge construction over Keccak-f\[1600\]
//! with a configurable rate, capacity, and domain separation suffix.
//!
//! The main references are listed in the following:
//! - \[1\] Bertoni, Guido and Daemen, Joan and Peeters, Michaël and Van Assche, Gilles (2011).
//! Cryptographic sponge functions.
//! <https://keccak.team/files/CSF-0.1.pdf>

use crate::{
    error::SpongeError,
    primitive::state::{KeccakState, STATE_BITS},
};
use serde::{Deserialize, Serialize};

/// Parameters of a sponge as they are read from a configuration,
/// before they have been validated by [`Sponge::new`].
///
/// Attributes:
/// - `rate`: the rate in bits, a positive multiple of `8`
/// - `capacity`: the capacity in bits, such that `rate + capacity = 1600`
/// - `suffix`: the delimited domain separation suffix
///
/// # Examples
/// ```
/// use keccak_collision::construction::sponge::{Sponge, SpongeParameters};
///
/// let parameters = SpongeParameters {
///     rate: 1088,
///     capacity: 512,
///     suffix: 0x06,
/// };
///
/// let sponge = Sponge::try_from(parameters).unwrap();
///
/// assert_eq!(64, sponge.capacity_bytes());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpongeParameters {
    pub rate: usize,
    pub capacity: usize,
    pub suffix: u8,
}

/// A sponge over Keccak-f\[1600\], defined by its rate, its capacity,
/// and the suffix that is appended to every message for domain separation.
///
/// Attributes:
/// - `rate`: the number of bits absorbed and squeezed per permutation call
/// - `capacity`: the number of bits that are never output directly
/// - `suffix`: the delimited domain separation suffix, e.g. `0x06` for SHA-3
///
/// # Examples
/// ```
/// use keccak_collision::construction::sponge::Sponge;
///
/// // SHA3-256
/// let sponge = Sponge::new(1088, 512, 0x06).unwrap();
/// let output = sponge.absorb_squeeze(b"abc", 32);
///
/// assert_eq!(
///     "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532",
///     output.hex_digest()
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpongeParameters", into = "SpongeParameters")]
pub struct Sponge {
    rate: usize,
    capacity: usize,
    suffix: u8,
}

/// The result of a single sponge evaluation.
///
/// Attributes:
/// - `digest`: the squeezed output
/// - `final_state`: the state that is handed to the final permutation, i.e. the
///   state after absorbing the message and XORing the padding into it.
///   Every squeezed byte is a function of this state only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpongeOutput {
    #[serde(with = "hex::serde")]
    pub digest: Vec<u8>,
    pub final_state: KeccakState,
}

impl SpongeOutput {
    /// Returns the digest as a lowercase hex string.
    pub fn hex_digest(&self) -> String {
        hex::encode(&self.digest)
    }
}

impl Sponge {
    /// Instantiates a new sponge.
    ///
    /// Parameters:
    /// - `rate`: the rate in bits
    /// - `capacity`: the capacity in bits
    /// - `suffix`: the delimited suffix used for domain separation
    ///
    /// Returns a new [`Sponge`] or a [`SpongeError`] if the parameters
    /// do not split the 1600 bit state.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::construction::sponge::Sponge;
    ///
    /// assert!(Sponge::new(1568, 32, 0x06).is_ok());
    /// assert!(Sponge::new(1600, 1, 0x06).is_err());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidParameters`](SpongeError::InvalidParameters)
    /// if `rate + capacity != 1600`, if `rate` is not a multiple of `8`, or if `rate == 0`.
    pub fn new(rate: usize, capacity: usize, suffix: u8) -> Result<Self, SpongeError> {
        if rate.checked_add(capacity) != Some(STATE_BITS) {
            return Err(SpongeError::InvalidParameters(format!(
                "rate and capacity have to sum up to {STATE_BITS}, but they were chosen as {rate} and {capacity}."
            )));
        }
        if rate % 8 != 0 {
            return Err(SpongeError::InvalidParameters(format!(
                "The rate has to be a multiple of 8, but it was chosen as {rate}."
            )));
        }
        if rate == 0 {
            return Err(SpongeError::InvalidParameters(String::from(
                "The rate has to be positive, otherwise nothing can be absorbed or squeezed.",
            )));
        }

        Ok(Self {
            rate,
            capacity,
            suffix,
        })
    }

    /// Returns the rate in bits.
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Returns the capacity in bits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the domain separation suffix.
    pub fn suffix(&self) -> u8 {
        self.suffix
    }

    /// Returns the number of bytes absorbed per block.
    pub fn rate_bytes(&self) -> usize {
        self.rate / 8
    }

    /// Returns the number of bytes of the state that are never output.
    pub fn capacity_bytes(&self) -> usize {
        self.capacity / 8
    }

    /// Absorbs `message` and squeezes `output_len` bytes.
    ///
    /// Parameters:
    /// - `message`: the message to be absorbed
    /// - `output_len`: the number of bytes to be squeezed
    ///
    /// Returns the squeezed digest together with the state the
    /// final permutation was applied to.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::construction::sponge::Sponge;
    ///
    /// let sponge = Sponge::new(1568, 32, 0x06).unwrap();
    /// let output = sponge.absorb_squeeze(b"", 8);
    ///
    /// assert_eq!(8, output.digest.len());
    /// // nothing has been permuted before the padding
    /// assert_eq!(vec![0, 0, 0, 0], output.final_state.tail(4));
    /// ```
    pub fn absorb_squeeze(&self, message: &[u8], output_len: usize) -> SpongeOutput {
        let rate_bytes = self.rate_bytes();
        let mut state = KeccakState::default();

        let mut blocks = message.chunks_exact(rate_bytes);
        for block in &mut blocks {
            state.xor_bytes(0, block);
            state.permute();
        }
        let leftover = blocks.remainder();
        state.xor_bytes(0, leftover);

        state.xor_byte(leftover.len(), self.suffix);
        // the suffix's last bit would land beyond the rate
        if self.suffix & 0x80 != 0 && leftover.len() == rate_bytes - 1 {
            state.permute();
        }
        state.xor_byte(rate_bytes - 1, 0x80);
        let final_state = state;
        state.permute();

        let mut digest = Vec::with_capacity(output_len);
        loop {
            let block_len = rate_bytes.min(output_len - digest.len());
            digest.extend_from_slice(&state.to_bytes()[..block_len]);
            if digest.len() == output_len {
                break;
            }
            state.permute();
        }

        SpongeOutput {
            digest,
            final_state,
        }
    }
}

/// Evaluates the Keccak sponge with the given parameters.
///
/// Parameters:
/// - `rate`: the rate in bits
/// - `capacity`: the capacity in bits
/// - `message`: the message to be absorbed
/// - `suffix`: the delimited suffix used for domain separation
/// - `output_len`: the number of bytes to be squeezed
///
/// Returns a [`SpongeOutput`] containing the digest and the final state,
/// or a [`SpongeError`] if the parameters are invalid.
///
/// # Examples
/// ```
/// use keccak_collision::construction::sponge::keccak;
///
/// // SHA3-256 of the empty string
/// let output = keccak(1088, 512, b"", 0x06, 32).unwrap();
///
/// assert_eq!(
///     "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a",
///     output.hex_digest()
/// );
/// ```
///
/// # Errors and Failures
/// - Returns a [`SpongeError`] of type [`InvalidParameters`](SpongeError::InvalidParameters)
/// if `rate + capacity != 1600`, if `rate` is not a multiple of `8`, or if `rate == 0`.
pub fn keccak(
    rate: usize,
    capacity: usize,
    message: &[u8],
    suffix: u8,
    output_len: usize,
) -> Result<SpongeOutput, SpongeError> {
    Ok(Sponge::new(rate, capacity, suffix)?.absorb_squeeze(message, output_len))
}

impl TryFrom<SpongeParameters> for Sponge {
    type Error = SpongeError;

    fn try_from(params: SpongeParameters) -> Result<Self, Self::Error> {
        Sponge::new(params.rate, params.capacity, params.suffix)
    }
}

impl From<Sponge> for SpongeParameters {
    fn from(sponge: Sponge) -> Self {
        Self {
            rate: sponge.rate,
            capacity: sponge.capacity,
            suffix: sponge.suffix,
        }
    }
}

#[cfg(test)]
mod test_new {
    use super::{keccak, Sponge, SpongeParameters};
    use crate::error::SpongeError;

    /// Ensures that invalid splits of the state are rejected.
    #[test]
    fn invalid_parameters() {
        let invalid = [
            (0, 0),
            (801, 799),
            (1600, 1),
            (0, 1600),
            (1601, 0),
            (1596, 4),
            (800, 801),
            (usize::MAX, 1601),
        ];

        for (rate, capacity) in invalid {
            assert!(
                matches!(
                    Sponge::new(rate, capacity, 0x06),
                    Err(SpongeError::InvalidParameters(_))
                ),
                "({rate}, {capacity}) was accepted"
            );
            assert!(keccak(rate, capacity, b"message", 0x06, 32).is_err());
        }
    }

    /// Ensures that valid splits are accepted and reported correctly.
    #[test]
    fn valid_parameters() {
        for capacity in [0, 16, 24, 32, 40, 56, 512, 1592] {
            let sponge = Sponge::new(1600 - capacity, capacity, 0x06).unwrap();

            assert_eq!(1600 - capacity, sponge.rate());
            assert_eq!(capacity / 8, sponge.capacity_bytes());
            assert_eq!(200, sponge.rate_bytes() + sponge.capacity_bytes());
        }
    }

    /// Ensures that parameters are validated on conversion and restored unchanged.
    #[test]
    fn parameters() {
        let valid = SpongeParameters {
            rate: 1584,
            capacity: 16,
            suffix: 0x1f,
        };
        let invalid = SpongeParameters {
            rate: 1584,
            capacity: 24,
            suffix: 0x06,
        };

        let restored = SpongeParameters::from(Sponge::try_from(valid).unwrap());

        assert_eq!((1584, 16, 0x1f), (restored.rate, restored.capacity, restored.suffix));
        assert!(matches!(
            Sponge::try_from(invalid),
            Err(SpongeError::InvalidParameters(_))
        ));
    }

    /// Ensures that deserialization validates the parameters.
    #[test]
    fn deserialize() {
        let sponge: Sponge =
            serde_json::from_str(r#"{"rate": 1088, "capacity": 512, "suffix": 6}"#).unwrap();
        let invalid = serde_json::from_str::<Sponge>(r#"{"rate": 801, "capacity": 799, "suffix": 6}"#);

        assert_eq!(Sponge::new(1088, 512, 0x06).unwrap(), sponge);
        assert!(invalid.is_err());
    }
}
