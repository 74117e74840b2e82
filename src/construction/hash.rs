// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains implementations of hash functions.

mod reduced_keccak;

pub use reduced_keccak::{reduced_hash, ReducedKeccak, KECCAK_SUFFIX};

/// This trait should be implemented by hashes with domain `[u8]`.
pub trait HashInto<DigestSpace> {
    /// Hashes a given byte string.
    ///
    /// Parameters:
    /// - `m`: specifies the message to be hashed
    ///
    /// Returns a hash of type `DigestSpace`.
    fn hash(&self, m: &[u8]) -> DigestSpace;
}
