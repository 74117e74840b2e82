// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the reduced-capacity Keccak hash [`ReducedKeccak`].
//!
//! The hash fixes the suffix to the SHA-3 suffix `0x06` and lets the capacity
//! be chosen freely. With a capacity of only a few bytes, a collision in the
//! capacity part of the state can be found in practice, which demonstrates
//! that the collision resistance of a sponge is bounded by `capacity / 2`
//! bits and not by the length of its output.

use super::HashInto;
use crate::{
    construction::sponge::{Sponge, SpongeOutput},
    error::SpongeError,
    primitive::state::STATE_BITS,
};
use serde::{Deserialize, Serialize};

/// The delimited suffix of SHA-3, which is used by [`ReducedKeccak`].
pub const KECCAK_SUFFIX: u8 = 0x06;

/// Parameters of a [`ReducedKeccak`] before they have been validated.
/// This is the serialized form of a [`ReducedKeccak`].
///
/// Attributes:
/// - `capacity`: the capacity in bits, a multiple of `8` below `1600`
/// - `output_bits`: the length of the digest in bits, a multiple of `8`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReducedKeccakParameters {
    pub capacity: usize,
    pub output_bits: usize,
}

/// Hash object that fixes the capacity and the output length of a Keccak sponge.
/// The rate is `1600 - capacity` and the suffix is [`KECCAK_SUFFIX`].
///
/// Attributes:
/// - `sponge`: the underlying sponge with rate `1600 - capacity`
/// - `output_bits`: the number of bits squeezed per evaluation
///
/// # Examples
/// ```
/// use keccak_collision::construction::hash::{HashInto, ReducedKeccak};
/// use keccak_collision::construction::sponge::SpongeOutput;
///
/// let hasher = ReducedKeccak::new(32, 256).unwrap();
/// let output: SpongeOutput = hasher.hash(b"Hello World!");
///
/// assert_eq!(32, output.digest.len());
/// assert_eq!(4, hasher.capacity_bytes());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReducedKeccakParameters", into = "ReducedKeccakParameters")]
pub struct ReducedKeccak {
    sponge: Sponge,
    output_bits: usize,
}

impl ReducedKeccak {
    /// Instantiates a reduced Keccak hash.
    ///
    /// Parameters:
    /// - `capacity`: the capacity in bits, the rate is `1600 - capacity`
    /// - `output_bits`: the length of the digest in bits
    ///
    /// Returns a new [`ReducedKeccak`] or a [`SpongeError`] if the
    /// parameters are invalid.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::construction::hash::ReducedKeccak;
    ///
    /// assert!(ReducedKeccak::new(56, 1600).is_ok());
    /// assert!(ReducedKeccak::new(57, 1600).is_err());
    /// assert!(ReducedKeccak::new(56, 1599).is_err());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidParameters`](SpongeError::InvalidParameters)
    /// if `capacity` is not a multiple of `8` or not smaller than `1600`,
    /// or if `output_bits` is not a multiple of `8`.
    pub fn new(capacity: usize, output_bits: usize) -> Result<Self, SpongeError> {
        if capacity >= STATE_BITS {
            return Err(SpongeError::InvalidParameters(format!(
                "The capacity has to be smaller than {STATE_BITS}, but it was chosen as {capacity}."
            )));
        }
        if output_bits % 8 != 0 {
            return Err(SpongeError::InvalidParameters(format!(
                "The output length has to be a multiple of 8, but it was chosen as {output_bits}."
            )));
        }
        let sponge = Sponge::new(STATE_BITS - capacity, capacity, KECCAK_SUFFIX)?;

        Ok(Self {
            sponge,
            output_bits,
        })
    }

    /// Instantiates a reduced Keccak hash, whose output is exactly one block,
    /// i.e. `output_bits = 1600 - capacity`.
    /// Iterating such a hash on its own digests only ever absorbs full blocks.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::construction::hash::ReducedKeccak;
    ///
    /// let hasher = ReducedKeccak::with_rate_output(16).unwrap();
    ///
    /// assert_eq!(1584, hasher.output_bits());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidParameters`](SpongeError::InvalidParameters)
    /// if `capacity` is not a multiple of `8` or not smaller than `1600`.
    pub fn with_rate_output(capacity: usize) -> Result<Self, SpongeError> {
        Self::new(capacity, STATE_BITS.saturating_sub(capacity))
    }

    /// Returns the underlying sponge.
    pub fn sponge(&self) -> &Sponge {
        &self.sponge
    }

    /// Returns the capacity in bits.
    pub fn capacity(&self) -> usize {
        self.sponge.capacity()
    }

    /// Returns the rate in bits.
    pub fn rate(&self) -> usize {
        self.sponge.rate()
    }

    /// Returns the number of bytes of the state that are never output.
    pub fn capacity_bytes(&self) -> usize {
        self.sponge.capacity_bytes()
    }

    /// Returns the number of bytes absorbed per block.
    pub fn rate_bytes(&self) -> usize {
        self.sponge.rate_bytes()
    }

    /// Returns the length of the digest in bits.
    pub fn output_bits(&self) -> usize {
        self.output_bits
    }

    /// Returns a hash object with the same capacity, but another output length.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidParameters`](SpongeError::InvalidParameters)
    /// if `output_bits` is not a multiple of `8`.
    pub fn with_output_bits(&self, output_bits: usize) -> Result<Self, SpongeError> {
        Self::new(self.capacity(), output_bits)
    }
}

impl HashInto<SpongeOutput> for ReducedKeccak {
    /// Hashes a given byte string with the fixed capacity and output length.
    ///
    /// Parameters:
    /// - `m`: specifies the message to be hashed
    ///
    /// Returns the digest and the state the final permutation was applied to.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::construction::hash::{HashInto, ReducedKeccak};
    ///
    /// let hasher = ReducedKeccak::new(16, 64).unwrap();
    /// let output = hasher.hash(b"");
    ///
    /// assert_eq!("7620a9cbc5f2f772", output.hex_digest());
    /// ```
    fn hash(&self, m: &[u8]) -> SpongeOutput {
        self.sponge.absorb_squeeze(m, self.output_bits / 8)
    }
}

/// Hashes `message` with a reduced Keccak of the given capacity.
///
/// Parameters:
/// - `message`: specifies the message to be hashed
/// - `capacity`: the capacity in bits, the rate is `1600 - capacity`
/// - `output_bits`: the length of the digest in bits
///
/// Returns the digest and the state the final permutation was applied to,
/// or a [`SpongeError`] if the parameters are invalid.
///
/// # Examples
/// ```
/// use keccak_collision::construction::hash::reduced_hash;
///
/// let output = reduced_hash(b"", 16, 64).unwrap();
///
/// assert_eq!("7620a9cbc5f2f772", output.hex_digest());
/// ```
///
/// # Errors and Failures
/// - Returns a [`SpongeError`] of type [`InvalidParameters`](SpongeError::InvalidParameters)
/// if `capacity` is not a multiple of `8` or not smaller than `1600`,
/// or if `output_bits` is not a multiple of `8`.
pub fn reduced_hash(
    message: &[u8],
    capacity: usize,
    output_bits: usize,
) -> Result<SpongeOutput, SpongeError> {
    Ok(ReducedKeccak::new(capacity, output_bits)?.hash(message))
}

impl TryFrom<ReducedKeccakParameters> for ReducedKeccak {
    type Error = SpongeError;

    fn try_from(params: ReducedKeccakParameters) -> Result<Self, Self::Error> {
        ReducedKeccak::new(params.capacity, params.output_bits)
    }
}

impl From<ReducedKeccak> for ReducedKeccakParameters {
    fn from(hash: ReducedKeccak) -> Self {
        Self {
            capacity: hash.capacity(),
            output_bits: hash.output_bits,
        }
    }
}

#[cfg(test)]
mod test_known_answer {
    use super::{reduced_hash, HashInto, ReducedKeccak};

    const MESSAGE_1: &str = concat!(
        "bbebd040ecf16c12c26770052cb4ad9aab3df7b7be2e8bd37fef020a23ef622310e37a33ca5b588f",
        "41653308ea0c612d1e2c65ac62844ed1e9a4b161b6232fb418cec3ddaf7492c55375613c117b0548",
        "e20183d79709a8fe1171f5ba77018ab6c7c94db4b6923747ae4541575086670dde861eb10c31e97a",
        "fff4a14036c650e4189a0e4cb48186f9656984975c766e727cc0bf962caa4216377adf65e7336314",
        "554050843f39f4695a298b42ebcd1b9ac205ec4f753f8d439d4dc6c398a486fc3a37000000000000",
        "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
        "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
        "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
        "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000000000000000000000000000000",
    );

    const MESSAGE_2: &str = concat!(
        "feedcfb6a69a4cfe57046de84811108ed8a1f7022f346284dd285a1f9ef56570c27b6e0e5ee72ecd",
        "be2f2668c5bee88d07343774c43ddd1b3d94e8c2a3c3dcd5063cd4724f226cb8b4100e3129e45012",
        "9c5b3034d1b51f8b7a0839834ccd23e4612c34d8d578c2b503de4555395505c7c0b9a9d538f8b6d8",
        "d40c0324fe7d8e3c91c0662a344ac08b963d61202349e1da28445c5f983b3c79c7f44333c96fc7d8",
        "fb75609aff57696b5fd516c8880ff96b9af480a685ba52db3ed1477b031bd4bc46b1254b3f3f732c",
        "9f91771e47b40be6ef5b7c18e232d9868ee2ecdfc412a960df22a82281bcdeca18f921a20f6b2036",
        "fbe51d0eafd5c494ff42a9a4416e59ea66025c2d29c303c4afc649e0c5e01f3e92782187b3570dac",
        "f0960f74ce1f4ed57947865a9e21cc56158b4fb48b974a7bbf4605ccf7e61e3abc57a5b12d65d7d2",
        "9e16bb76d70da3009c0d66705bff0f31f50e5d949083eea0b6dad837e49f2f8cd9781d1d8067d483",
        "ffe27288787211afb66ba97ca864ab5459a13fab71560e47670700000000000000",
    );

    /// Ensures that the two fixed messages collide for capacity `56`
    /// and a 1600 bit output.
    #[test]
    fn fixed_collision() {
        let message_1 = hex::decode(MESSAGE_1).unwrap();
        let message_2 = hex::decode(MESSAGE_2).unwrap();
        let hasher = ReducedKeccak::new(56, 1600).unwrap();

        let hash_1 = hasher.hash(&message_1);
        let hash_2 = hasher.hash(&message_2);

        assert_ne!(message_1, message_2);
        assert_eq!(393, message_1.len());
        assert_eq!(hash_1.digest, hash_2.digest);
        assert_eq!(hash_1.final_state, hash_2.final_state);
        assert!(hash_1.hex_digest().starts_with("be2e0b39b9db44bfa6505d688030281e"));
    }

    /// Ensures that the fixed messages collide for other output lengths as well.
    #[test]
    fn fixed_collision_other_lengths() {
        let message_1 = hex::decode(MESSAGE_1).unwrap();
        let message_2 = hex::decode(MESSAGE_2).unwrap();

        for output_bits in [8, 256, 1544, 4096] {
            assert_eq!(
                reduced_hash(&message_1, 56, output_bits).unwrap().digest,
                reduced_hash(&message_2, 56, output_bits).unwrap().digest
            );
        }
    }

    /// Ensures that the fixed messages do not collide for another capacity.
    #[test]
    fn no_collision_other_capacity() {
        let message_1 = hex::decode(MESSAGE_1).unwrap();
        let message_2 = hex::decode(MESSAGE_2).unwrap();

        assert_ne!(
            reduced_hash(&message_1, 64, 1600).unwrap().digest,
            reduced_hash(&message_2, 64, 1600).unwrap().digest
        );
    }
}

#[cfg(test)]
mod test_new {
    use super::{ReducedKeccak, ReducedKeccakParameters};
    use crate::error::SpongeError;

    /// Ensures that invalid capacities and output lengths are rejected.
    #[test]
    fn invalid_parameters() {
        assert!(ReducedKeccak::new(1600, 256).is_err());
        assert!(ReducedKeccak::new(1601, 256).is_err());
        assert!(ReducedKeccak::new(12, 256).is_err());
        assert!(ReducedKeccak::new(16, 255).is_err());
        assert!(ReducedKeccak::with_rate_output(1600).is_err());
    }

    /// Ensures that rate and capacity are derived from each other.
    #[test]
    fn rate_and_capacity() {
        let hasher = ReducedKeccak::with_rate_output(40).unwrap();

        assert_eq!(1560, hasher.rate());
        assert_eq!(195, hasher.rate_bytes());
        assert_eq!(5, hasher.capacity_bytes());
        assert_eq!(1560, hasher.output_bits());
        assert_eq!(0x06, hasher.sponge().suffix());
    }

    /// Ensures that parameters are validated on conversion and restored unchanged.
    #[test]
    fn parameters() {
        let valid = ReducedKeccakParameters {
            capacity: 16,
            output_bits: 1600,
        };
        let invalid = ReducedKeccakParameters {
            capacity: 16,
            output_bits: 12,
        };

        let restored = ReducedKeccakParameters::from(ReducedKeccak::try_from(valid).unwrap());

        assert_eq!((16, 1600), (restored.capacity, restored.output_bits));
        assert!(matches!(
            ReducedKeccak::try_from(invalid),
            Err(SpongeError::InvalidParameters(_))
        ));
    }

    /// Ensures that the hash object can be stored and restored.
    #[test]
    fn serialize() {
        let hasher = ReducedKeccak::new(24, 512).unwrap();

        let json = serde_json::to_string(&hasher).unwrap();
        let read: ReducedKeccak = serde_json::from_str(&json).unwrap();

        assert_eq!(r#"{"capacity":24,"output_bits":512}"#, json);
        assert_eq!(hasher, read);
        assert!(serde_json::from_str::<ReducedKeccak>(r#"{"capacity":23,"output_bits":512}"#).is_err());
    }
}
