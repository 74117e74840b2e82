// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! Finds two distinct messages with the same digest under Keccak with a capacity of 16 bits.
//!
//! Run it with `RUST_LOG=debug cargo run --example collide`.
//! Optionally, a JSON configuration of a [`CollisionSearch`] can be passed as first argument.

use keccak_collision::{
    attack::{
        collision::{CollisionSearch, CycleDetection},
        forge::forge_suffixes,
    },
    construction::hash::ReducedKeccak,
    error::SpongeError,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SpongeError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let search = match std::env::args().nth(1) {
        Some(json) => CollisionSearch::from_json(&json)?,
        None => CollisionSearch::new(
            ReducedKeccak::with_rate_output(16)?,
            CycleDetection::default(),
        ),
    };

    let collision = search.run()?;
    let forged = forge_suffixes(&collision, &search.hash, 0x37)?;
    let digest = forged.verify(&search.hash)?;

    println!("capacity tail: {}", collision.capacity_tail);
    println!("evaluations:   {}", collision.evaluations);
    println!("message 1:     {}", hex::encode(&forged.message_1));
    println!("message 2:     {}", hex::encode(&forged.message_2));
    println!("digest:        {}", hex::encode(digest));

    Ok(())
}
