// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the Keccak-f\[1600\] permutation and the state it
//! operates on. Both do not provide any security guarantees by themselves,
//! they are the building block of the constructions in [`crate::construction`].

pub mod keccak_f;
pub mod state;
