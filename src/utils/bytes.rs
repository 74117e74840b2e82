// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains helper functions on byte slices.

/// XORs two byte slices of equal length.
///
/// Parameters:
/// - `lhs`: specifies the first operand
/// - `rhs`: specifies the second operand
///
/// Returns a vector, whose `i`-th entry is `lhs[i] ^ rhs[i]`.
///
/// # Examples
/// ```
/// use keccak_collision::utils::bytes::xor;
///
/// assert_eq!(vec![0x00, 0xff], xor(&[0x0f, 0xf0], &[0x0f, 0x0f]));
/// ```
///
/// # Panics ...
/// - if `lhs` and `rhs` have different lengths.
pub fn xor(lhs: &[u8], rhs: &[u8]) -> Vec<u8> {
    let mut res = lhs.to_vec();
    xor_in_place(&mut res, rhs);
    res
}

/// XORs `rhs` into `lhs`.
///
/// # Panics ...
/// - if `lhs` and `rhs` have different lengths.
pub fn xor_in_place(lhs: &mut [u8], rhs: &[u8]) {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "Only byte slices of equal length can be XORed."
    );
    for (l, r) in lhs.iter_mut().zip(rhs) {
        *l ^= r;
    }
}

/// Serializes an optional byte string as an optional hex string.
/// Use it with `#[serde(default, with = "crate::utils::bytes::hex_option")]`.
pub mod hex_option {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|value| hex::decode(value).map_err(D::Error::custom))
            .transpose()
    }
}
