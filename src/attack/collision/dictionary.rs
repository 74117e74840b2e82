// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains a parallel search on random messages.
//!
//! A coordinator derives one seed per worker and round. Every worker hashes
//! a batch of random one-block messages, and the coordinator merges the
//! batches in worker order, so the result only depends on the configuration
//! and not on the scheduling of the workers.

use super::{CollisionSearchState, Observation, SearchStrategy};
use crate::{construction::hash::ReducedKeccak, error::SpongeError};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::{prelude::*, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The maximal number of worker threads of a [`DictionarySearch`].
pub const MAX_WORKERS: usize = 1 << 10;

/// The maximal number of messages a [`DictionarySearch`] hashes per round,
/// i.e. the bound on `workers * batch_size`.
pub const MAX_ROUND_SIZE: usize = 1 << 22;

/// A dictionary search on random messages of one block, hashed in parallel.
///
/// Attributes:
/// - `workers`: the number of threads hashing batches, at most [`MAX_WORKERS`]
/// - `batch_size`: the number of messages each worker hashes per round,
/// such that `workers * batch_size` is at most [`MAX_ROUND_SIZE`]
/// - `seed`: the seed of the coordinator, which derives the seeds of the workers
///
/// Searches with the same `seed` and `batch_size` and the same `workers` produce
/// the same collision.
///
/// # Examples
/// ```
/// use keccak_collision::attack::collision::{CollisionSearch, DictionarySearch};
/// use keccak_collision::construction::hash::ReducedKeccak;
///
/// let hash = ReducedKeccak::with_rate_output(16).unwrap();
/// let strategy = DictionarySearch {
///     workers: 2,
///     batch_size: 64,
///     seed: 42,
/// };
///
/// let collision = CollisionSearch::new(hash, strategy).run().unwrap();
///
/// assert!(collision.is_valid(&hash));
/// assert_eq!(hash.rate_bytes(), collision.first.message.len());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionarySearch {
    pub workers: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for DictionarySearch {
    fn default() -> Self {
        Self {
            workers: rayon::current_num_threads(),
            batch_size: 1 << 12,
            seed: 0,
        }
    }
}

#[typetag::serde]
impl SearchStrategy for DictionarySearch {
    /// Hashes rounds of random batches in parallel and merges them into `state`
    /// until two distinct messages share a capacity tail.
    ///
    /// Parameters:
    /// - `hash`: the hash under attack
    /// - `state`: the state all merged evaluations are recorded in
    ///
    /// Returns the colliding observations, where the earlier one comes first.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
    /// if `workers` or `batch_size` is `0`, if `workers` exceeds [`MAX_WORKERS`],
    /// if `workers * batch_size` exceeds [`MAX_ROUND_SIZE`],
    /// or if the thread pool can not be built.
    fn search(
        &self,
        hash: &ReducedKeccak,
        state: &mut CollisionSearchState,
    ) -> Result<(Observation, Observation), SpongeError> {
        if self.workers == 0 || self.batch_size == 0 {
            return Err(SpongeError::InvalidConfig(format!(
                "A dictionary search needs at least one worker and a non-empty batch, \
                but {} workers and batches of size {} were provided.",
                self.workers, self.batch_size
            )));
        }
        if self.workers > MAX_WORKERS {
            return Err(SpongeError::InvalidConfig(format!(
                "A dictionary search supports at most {MAX_WORKERS} workers, but {} were provided.",
                self.workers
            )));
        }
        let round_size = self
            .workers
            .checked_mul(self.batch_size)
            .filter(|round_size| *round_size <= MAX_ROUND_SIZE)
            .ok_or_else(|| {
                SpongeError::InvalidConfig(format!(
                    "A round of {} workers with batches of size {} exceeds the maximum of \
                    {MAX_ROUND_SIZE} messages.",
                    self.workers, self.batch_size
                ))
            })?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| SpongeError::InvalidConfig(e.to_string()))?;

        let mut coordinator = ChaCha20Rng::seed_from_u64(self.seed);
        let mut first_index = 0;
        loop {
            let seeds: Vec<u64> = (0..self.workers).map(|_| coordinator.gen()).collect();
            let batches: Vec<Vec<Observation>> = pool.install(|| {
                seeds
                    .par_iter()
                    .enumerate()
                    .map(|(worker, seed)| {
                        let offset = first_index + (worker * self.batch_size) as u64;
                        hash_batch(hash, *seed, offset, self.batch_size)
                    })
                    .collect()
            });

            if let Some(pair) = state.merge(batches.into_iter().flatten()) {
                return Ok(pair);
            }
            first_index += round_size as u64;
            debug!(
                evaluations = state.evaluations(),
                visited = state.len(),
                "merged batches"
            );
        }
    }
}

/// Hashes `batch_size` random messages of one block drawn from `seed`.
fn hash_batch(
    hash: &ReducedKeccak,
    seed: u64,
    first_index: u64,
    batch_size: usize,
) -> Vec<Observation> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..batch_size as u64)
        .map(|i| {
            let mut message = vec![0u8; hash.rate_bytes()];
            rng.fill_bytes(&mut message);
            Observation::evaluate(hash, first_index + i, message).0
        })
        .collect()
}
