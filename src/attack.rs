// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains a generic collision attack on sponges with a small capacity.
//! An attack proceeds in two steps:
//!
//! 1. A [`CollisionSearch`](collision::CollisionSearch) finds two distinct messages
//! whose final states share the capacity part.
//! 2. [`forge_suffixes`](forge::forge_suffixes) extends both messages by one block each,
//! such that the extended messages collide for every output length.

pub mod collision;
pub mod forge;
