// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This crate provides the Keccak-f\[1600\] permutation, a generic sponge
//! construction on top of it, and a reduced-capacity Keccak hash to
//! experiment with. On top of the hash it implements a birthday-bound
//! collision search on the capacity part of the state and a suffix forger,
//! which turns such an internal collision into two distinct messages with
//! identical digests of any length.
//!
//! The crate is layered the following way:
//! 1. [`primitive`] contains the permutation and the state it operates on.
//! 2. [`construction`] contains the sponge and the hash functions built from it.
//! 3. [`attack`] contains the collision search and the suffix forger.

pub mod attack;
pub mod construction;
pub mod error;
pub mod primitive;
pub mod utils;
