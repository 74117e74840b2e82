// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the Keccak-f\[1600\] permutation.
//!
//! Every one of the 24 rounds consists of the five steps
//! theta, rho, pi, chi, and iota, which are applied in this order.
//! All steps are bijections on the 1600 bit state.
//!
//! The main references are listed in the following:
//! - \[1\] Bertoni, Guido and Daemen, Joan and Peeters, Michaël and Van Assche, Gilles (2011).
//! The Keccak reference, version 3.0.
//! <https://keccak.team/files/Keccak-reference-3.0.pdf>
//! - \[2\] National Institute of Standards and Technology (2015).
//! SHA-3 Standard: Permutation-Based Hash and Extendable-Output Functions.
//! FIPS PUB 202. <https://doi.org/10.6028/NIST.FIPS.202>

use super::state::{lane_index, KeccakState, LANES, STATE_BYTES};

/// The number of rounds of Keccak-f\[1600\].
pub const ROUNDS: usize = 24;

/// The round constants of the iota step, one per round.
pub const ROUND_CONSTANTS: [u64; ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808A,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808B,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008A,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000A,
    0x0000_0000_8000_808B,
    0x8000_0000_0000_008B,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800A,
    0x8000_0000_8000_000A,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// The rotation offsets of the rho step, indexed by `[x][y]`.
pub const RHO_OFFSETS: [[u32; 5]; 5] = [
    [0, 36, 3, 41, 18],
    [1, 44, 10, 45, 2],
    [62, 6, 43, 15, 61],
    [28, 55, 25, 21, 56],
    [27, 20, 39, 8, 14],
];

/// Applies the full Keccak-f\[1600\] permutation to the given lanes in place.
///
/// Parameters:
/// - `lanes`: the state as lanes, where lane `(x, y)` is stored at `x + 5 * y`
///
/// # Examples
/// ```
/// use keccak_collision::primitive::keccak_f::keccak_f1600;
///
/// let mut lanes = [0u64; 25];
/// keccak_f1600(&mut lanes);
///
/// assert_eq!(0xF1258F7940E1DDE7, lanes[0]);
/// ```
pub fn keccak_f1600(lanes: &mut [u64; LANES]) {
    for round_constant in ROUND_CONSTANTS {
        theta(lanes);
        rho(lanes);
        pi(lanes);
        chi(lanes);
        iota(lanes, round_constant);
    }
}

/// Applies Keccak-f\[1600\] to the byte representation of a state.
///
/// Parameters:
/// - `state`: the 200 bytes the permutation is applied to
///
/// Returns the permuted 200 bytes. The input is left untouched.
///
/// # Examples
/// ```
/// use keccak_collision::primitive::keccak_f::permute;
///
/// let permuted = permute(&[0u8; 200]);
///
/// assert_eq!([0xe7, 0xdd, 0xe1, 0x40], permuted[..4]);
/// ```
pub fn permute(state: &[u8; STATE_BYTES]) -> [u8; STATE_BYTES] {
    let mut state = KeccakState::from_bytes(state);
    state.permute();
    state.to_bytes()
}

impl KeccakState {
    /// Applies Keccak-f\[1600\] to the state in place.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::primitive::state::KeccakState;
    ///
    /// let mut state = KeccakState::default();
    /// state.permute();
    ///
    /// assert_eq!(0x84D5CCF933C0478A, state.lane(1, 0));
    /// ```
    pub fn permute(&mut self) {
        keccak_f1600(self.lanes_mut());
    }
}

/// XORs every lane with the parities of two neighbouring columns.
fn theta(lanes: &mut [u64; LANES]) {
    let mut parity = [0u64; 5];
    for (x, column_parity) in parity.iter_mut().enumerate() {
        *column_parity = (0..5).fold(0, |acc, y| acc ^ lanes[lane_index(x, y)]);
    }

    for x in 0..5 {
        let d = parity[(x + 4) % 5] ^ parity[(x + 1) % 5].rotate_left(1);
        for y in 0..5 {
            lanes[lane_index(x, y)] ^= d;
        }
    }
}

/// Rotates every lane by its fixed offset.
fn rho(lanes: &mut [u64; LANES]) {
    for x in 0..5 {
        for y in 0..5 {
            let lane = &mut lanes[lane_index(x, y)];
            *lane = lane.rotate_left(RHO_OFFSETS[x][y]);
        }
    }
}

/// Moves lane `(x, y)` to position `(y, 2x + 3y)`.
fn pi(lanes: &mut [u64; LANES]) {
    let previous = *lanes;
    for x in 0..5 {
        for y in 0..5 {
            lanes[lane_index(y, (2 * x + 3 * y) % 5)] = previous[lane_index(x, y)];
        }
    }
}

/// Applies the only non-linear step row by row.
fn chi(lanes: &mut [u64; LANES]) {
    for y in 0..5 {
        let row: [u64; 5] = std::array::from_fn(|x| lanes[lane_index(x, y)]);
        for x in 0..5 {
            lanes[lane_index(x, y)] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
        }
    }
}

fn iota(lanes: &mut [u64; LANES], round_constant: u64) {
    lanes[0] ^= round_constant;
}

#[cfg(test)]
mod test_keccak_f1600 {
    use super::{keccak_f1600, permute};
    use crate::primitive::state::{KeccakState, STATE_BYTES};

    /// Checks the permutation of the all-zero state against the reference.
    #[test]
    fn zero_state() {
        let mut lanes = [0u64; 25];

        keccak_f1600(&mut lanes);
        assert_eq!(0xF1258F7940E1DDE7, lanes[0]);
        assert_eq!(0x84D5CCF933C0478A, lanes[1]);

        keccak_f1600(&mut lanes);
        assert_eq!(0x2D5C954DF96ECB3C, lanes[0]);
    }

    /// Ensures that the byte and the lane interface agree.
    #[test]
    fn bytes_and_lanes_agree() {
        let mut bytes = [0u8; STATE_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let mut state = KeccakState::from_bytes(&bytes);

        state.permute();

        assert_eq!(state.to_bytes(), permute(&bytes));
    }
}
