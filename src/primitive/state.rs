// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the [`KeccakState`], the 1600 bit state on which the
//! Keccak-f\[1600\] permutation operates.

use crate::error::SpongeError;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The number of bytes of a Keccak-f\[1600\] state.
pub const STATE_BYTES: usize = 200;
/// The number of bits of a Keccak-f\[1600\] state.
pub const STATE_BITS: usize = 1600;
/// The number of 64 bit lanes of a Keccak-f\[1600\] state.
pub const LANES: usize = 25;

/// A Keccak-f\[1600\] state, i.e. a `5 x 5` matrix of 64 bit lanes.
///
/// Lane `(x, y)` is stored at index `x + 5 * y`, which corresponds to the
/// little-endian bytes `8 * (x + 5 * y)..8 * (x + 5 * y) + 8` of the
/// byte representation of the state.
///
/// Attributes:
/// - `lanes`: the 25 lanes of the state in column-major order
///
/// # Examples
/// ```
/// use keccak_collision::primitive::state::KeccakState;
///
/// let mut state = KeccakState::default();
/// state.xor_bytes(0, &[0x01, 0x02]);
///
/// assert_eq!(0x0201, state.lane(0, 0));
/// assert_eq!(0x01, state.to_bytes()[0]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeccakState {
    lanes: [u64; LANES],
}

impl KeccakState {
    /// Creates a state from its 25 lanes.
    pub fn from_lanes(lanes: [u64; LANES]) -> Self {
        Self { lanes }
    }

    /// Interprets 200 bytes as a state.
    ///
    /// Parameters:
    /// - `bytes`: the byte representation of the state
    ///
    /// Returns the [`KeccakState`] whose byte representation is `bytes`.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::primitive::state::KeccakState;
    ///
    /// let state = KeccakState::from_bytes(&[0xff; 200]);
    ///
    /// assert_eq!(u64::MAX, state.lane(4, 4));
    /// ```
    pub fn from_bytes(bytes: &[u8; STATE_BYTES]) -> Self {
        let mut lanes = [0u64; LANES];
        for (lane, chunk) in lanes.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *lane = u64::from_le_bytes(word);
        }
        Self { lanes }
    }

    /// Interprets a slice of bytes as a state.
    ///
    /// Parameters:
    /// - `bytes`: the byte representation of the state
    ///
    /// Returns the [`KeccakState`] whose byte representation is `bytes` or
    /// a [`SpongeError`] if `bytes` does not have length `200`.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::primitive::state::KeccakState;
    ///
    /// assert!(KeccakState::try_from_slice(&[0u8; 200]).is_ok());
    /// assert!(KeccakState::try_from_slice(&[0u8; 199]).is_err());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidState`](SpongeError::InvalidState)
    /// if `bytes.len() != 200`.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, SpongeError> {
        let bytes: &[u8; STATE_BYTES] = bytes.try_into().map_err(|_| {
            SpongeError::InvalidState(format!(
                "A state consists of {STATE_BYTES} bytes, but {} were provided.",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Parses a state from a hex string of 400 characters.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidState`](SpongeError::InvalidState)
    /// if `hex_str` is not valid hex or does not encode 200 bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self, SpongeError> {
        let bytes = hex::decode(hex_str).map_err(|e| SpongeError::InvalidState(e.to_string()))?;
        Self::try_from_slice(&bytes)
    }

    /// Returns the byte representation of the state.
    pub fn to_bytes(&self) -> [u8; STATE_BYTES] {
        let mut bytes = [0u8; STATE_BYTES];
        for (chunk, lane) in bytes.chunks_exact_mut(8).zip(self.lanes.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        bytes
    }

    /// Returns the lanes of the state.
    pub fn lanes(&self) -> &[u64; LANES] {
        &self.lanes
    }

    /// Returns a mutable reference to the lanes of the state.
    pub fn lanes_mut(&mut self) -> &mut [u64; LANES] {
        &mut self.lanes
    }

    /// Returns lane `(x, y)`.
    ///
    /// # Panics ...
    /// - if `x >= 5` or `y >= 5`.
    pub fn lane(&self, x: usize, y: usize) -> u64 {
        self.lanes[lane_index(x, y)]
    }

    /// Returns a mutable reference to lane `(x, y)`.
    ///
    /// # Panics ...
    /// - if `x >= 5` or `y >= 5`.
    pub fn lane_mut(&mut self, x: usize, y: usize) -> &mut u64 {
        &mut self.lanes[lane_index(x, y)]
    }

    /// XORs `bytes` into the byte representation of the state, starting at `offset`.
    ///
    /// Parameters:
    /// - `offset`: the first byte of the state that is modified
    /// - `bytes`: the bytes that are XORed into the state
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::primitive::state::KeccakState;
    ///
    /// let mut state = KeccakState::default();
    /// state.xor_bytes(7, &[0x80, 0x01]);
    ///
    /// assert_eq!(0x80 << 56, state.lane(0, 0));
    /// assert_eq!(0x01, state.lane(1, 0));
    /// ```
    ///
    /// # Panics ...
    /// - if `offset + bytes.len() > 200`.
    pub fn xor_bytes(&mut self, offset: usize, bytes: &[u8]) {
        assert!(
            offset + bytes.len() <= STATE_BYTES,
            "XORing {} bytes at offset {offset} exceeds the state.",
            bytes.len()
        );
        for (i, byte) in bytes.iter().enumerate() {
            let position = offset + i;
            self.lanes[position / 8] ^= u64::from(*byte) << (8 * (position % 8));
        }
    }

    /// XORs a single byte into the byte representation of the state.
    ///
    /// # Panics ...
    /// - if `offset >= 200`.
    pub fn xor_byte(&mut self, offset: usize, byte: u8) {
        self.xor_bytes(offset, &[byte]);
    }

    /// Returns the last `len` bytes of the byte representation of the state.
    ///
    /// # Panics ...
    /// - if `len > 200`.
    pub fn tail(&self, len: usize) -> Vec<u8> {
        self.to_bytes()[STATE_BYTES - len..].to_vec()
    }
}

/// Returns the position of lane `(x, y)` in the lane array.
pub fn lane_index(x: usize, y: usize) -> usize {
    assert!(x < 5 && y < 5, "lane ({x}, {y}) is outside the 5 x 5 state");
    x + 5 * y
}

impl From<[u8; STATE_BYTES]> for KeccakState {
    fn from(bytes: [u8; STATE_BYTES]) -> Self {
        Self::from_bytes(&bytes)
    }
}

impl fmt::LowerHex for KeccakState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for KeccakState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:x}")
    }
}

impl fmt::Debug for KeccakState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeccakState({self:x})")
    }
}

impl Serialize for KeccakState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{self:x}"))
    }
}

impl<'de> Deserialize<'de> for KeccakState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod test_layout {
    use super::{KeccakState, STATE_BYTES};

    /// Ensures that the byte layout is column-major and little-endian.
    #[test]
    fn column_major_little_endian() {
        let mut bytes = [0u8; STATE_BYTES];
        // lane (1, 2) starts at byte 8 * (1 + 5 * 2) = 88
        bytes[88] = 0x11;
        bytes[95] = 0x22;

        let state = KeccakState::from_bytes(&bytes);

        assert_eq!(0x2200_0000_0000_0011, state.lane(1, 2));
        assert_eq!(0, state.lane(2, 1));
        assert_eq!(bytes, state.to_bytes());
    }

    /// Ensures that XORing bytes across a lane border hits both lanes.
    #[test]
    fn xor_across_lanes() {
        let mut state = KeccakState::default();
        state.xor_bytes(6, &[0xaa, 0xbb, 0xcc]);
        state.xor_bytes(6, &[0xaa]);

        assert_eq!(0xbb << 56, state.lane(0, 0));
        assert_eq!(0xcc, state.lane(1, 0));
    }

    /// Ensures that the tail covers the last bytes of the last lane.
    #[test]
    fn tail() {
        let mut state = KeccakState::default();
        *state.lane_mut(4, 4) = 0x0102_0304_0506_0708;

        assert_eq!(vec![0x03, 0x02, 0x01], state.tail(3));
        assert!(state.tail(0).is_empty());
    }

    /// Ensures that XORing beyond the state results in a panic.
    #[test]
    #[should_panic]
    fn xor_out_of_bounds() {
        let mut state = KeccakState::default();
        state.xor_bytes(199, &[0x01, 0x02]);
    }

    /// Ensures that lanes outside the `5 x 5` grid are rejected.
    #[test]
    #[should_panic]
    fn lane_out_of_bounds() {
        let _ = KeccakState::default().lane(5, 0);
    }
}
