// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the constructions built on top of the Keccak-f\[1600\]
//! permutation. A construction is built the same way:
//!
//! 1. A trait that combines the common feature, e.g.
//! [`hashing into a digest space`](hash::HashInto).
//! 2. Explicit implementations of the trait, e.g.
//! [`ReducedKeccak`](hash::ReducedKeccak).

pub mod hash;
pub mod sponge;
