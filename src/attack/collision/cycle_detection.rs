// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains a tortoise-and-hare walk over the chain `m_{i+1} = H(m_i)`,
//! which terminates with an error if the chain runs into a cycle of messages.
//!
//! The main references are listed in the following:
//! - \[1\] Floyd, Robert W. (1967).
//! Nondeterministic Algorithms.
//! In: Journal of the ACM 14(4). <https://doi.org/10.1145/321420.321422>

use super::{chain_start, chain_step, CollisionSearchState, Observation, SearchStrategy};
use crate::{construction::hash::ReducedKeccak, error::SpongeError};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use tracing::debug;

/// A tortoise-and-hare walk over the chain `m_{i+1} = H(m_i)`, where every digest
/// is truncated or padded with zero bytes to one block.
///
/// The hare evaluates `m_0, m_1, ...` in order and records every evaluation in the
/// [`CollisionSearchState`], which catches the first pair of distinct messages
/// sharing a capacity tail. The tortoise follows at half the speed on the recorded
/// capacity tails, so it never evaluates a message.
/// If the tails of `m_t` and `m_{2t}` agree without a collision being reported,
/// both messages are equal and the chain repeats forever.
/// This happens if the digests are too short to leave the cycle before
/// a collision on the capacity is expected.
///
/// Attributes:
/// - `start`: the first element of the chain, one block of zero bytes if `None`
///
/// # Examples
/// ```
/// use keccak_collision::attack::collision::{CollisionSearch, CycleDetection};
/// use keccak_collision::construction::hash::ReducedKeccak;
///
/// let hash = ReducedKeccak::with_rate_output(16).unwrap();
///
/// let collision = CollisionSearch::new(hash, CycleDetection::default()).run().unwrap();
///
/// assert_eq!(183, collision.evaluations);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDetection {
    #[serde(default, with = "crate::utils::bytes::hex_option")]
    pub start: Option<Vec<u8>>,
}

impl CycleDetection {
    /// Creates a tortoise-and-hare walk starting at `start`.
    pub fn starting_at(start: impl Into<Vec<u8>>) -> Self {
        Self {
            start: Some(start.into()),
        }
    }
}

#[typetag::serde]
impl SearchStrategy for CycleDetection {
    /// Moves the hare along the chain until a capacity tail repeats
    /// for two distinct messages, while the tortoise watches for a cycle.
    ///
    /// Parameters:
    /// - `hash`: the hash under attack
    /// - `state`: the state all evaluations are recorded in
    ///
    /// Returns the colliding observations, where the earlier one comes first.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
    /// if the length of `start` is not a multiple of the rate
    /// or if the chain repeats a message before a collision is found.
    fn search(
        &self,
        hash: &ReducedKeccak,
        state: &mut CollisionSearchState,
    ) -> Result<(Observation, Observation), SpongeError> {
        let mut hare = chain_start(&self.start, hash)?;
        let mut tails = Vec::new();
        loop {
            let index = tails.len();
            let (tail, next) = match chain_step(hash, state, index as u64, hare) {
                ControlFlow::Continue(link) => link,
                ControlFlow::Break(pair) => return Ok(pair),
            };
            tails.push(tail);
            hare = next;

            let tortoise = index / 2;
            if index > 0 && index % 2 == 0 && tails[tortoise] == tail {
                debug!(tortoise, hare = index, %tail, "tortoise met hare");
                return Err(SpongeError::InvalidConfig(format!(
                    "The chain repeats message {tortoise} at step {index} before two distinct \
                    messages share a capacity tail, the output of {} bits is too short.",
                    hash.output_bits()
                )));
            }
        }
    }
}

#[cfg(test)]
mod test_cycle_detection {
    use super::CycleDetection;
    use crate::{
        attack::{
            collision::{ChainSearch, CollisionSearch, CollisionSearchState, SearchStrategy},
            forge::forge_suffixes,
        },
        construction::hash::ReducedKeccak,
        error::SpongeError,
    };

    /// Checks the walk from zero bytes against the precomputed collision.
    #[test]
    fn known_collision() {
        let hash = ReducedKeccak::with_rate_output(16).unwrap();

        let collision = CollisionSearch::new(hash, CycleDetection::default())
            .run()
            .unwrap();

        assert_eq!("4bd8", collision.capacity_tail.to_string());
        assert_eq!((30, 182), (collision.first.index, collision.second.index));
        assert_eq!(183, collision.evaluations);
        assert!(collision.is_valid(&hash));
    }

    /// Ensures that the walk finds the same pair as the plain chain
    /// and evaluates every chain element exactly once.
    #[test]
    fn same_pair_as_chain() {
        let hash = ReducedKeccak::with_rate_output(16).unwrap();
        let start = [b"tortoise and hare".as_slice(), &[0u8; 181]].concat();
        let mut cycle_state = CollisionSearchState::new(16).unwrap();
        let mut chain_state = CollisionSearchState::new(16).unwrap();

        let (a, b) = CycleDetection::starting_at(start.clone())
            .search(&hash, &mut cycle_state)
            .unwrap();
        let (c, d) = ChainSearch::starting_at(start)
            .search(&hash, &mut chain_state)
            .unwrap();

        assert_eq!(a.tail, c.tail);
        assert_eq!((a.index, b.index), (c.index, d.index));
        assert_eq!(b.index + 1, cycle_state.evaluations());
        assert_eq!(chain_state.evaluations(), cycle_state.evaluations());
    }

    /// Ensures that collisions for outputs shorter and longer than the rate
    /// consist of whole blocks and can be forged.
    #[test]
    fn output_lengths() {
        for (output_bits, indices) in [(256, (20, 152)), (1600, (30, 182))] {
            let hash = ReducedKeccak::new(16, output_bits).unwrap();

            let collision = CollisionSearch::new(hash, CycleDetection::default())
                .run()
                .unwrap();

            assert_eq!(indices, (collision.first.index, collision.second.index));
            assert_eq!(198, collision.first.message.len());
            assert_eq!(198, collision.second.message.len());
            let forged = forge_suffixes(&collision, &hash, 0x37).unwrap();
            assert!(forged.verify(&hash).is_ok());
        }
    }

    /// Ensures that a chain of one-byte digests, which repeats long before
    /// a 56-bit capacity collides, is detected instead of walked forever.
    #[test]
    fn message_cycle() {
        let hash = ReducedKeccak::new(56, 8).unwrap();
        let mut state = CollisionSearchState::new(56).unwrap();

        let result = CycleDetection::default().search(&hash, &mut state);

        assert!(matches!(result, Err(SpongeError::InvalidConfig(_))));
        assert_eq!(17, state.evaluations());
    }

    /// Ensures that an empty digest, which maps every element to the zero block,
    /// is detected as a cycle.
    #[test]
    fn empty_output() {
        let hash = ReducedKeccak::new(16, 0).unwrap();

        let result = CollisionSearch::new(hash, CycleDetection::default()).run();

        assert!(matches!(result, Err(SpongeError::InvalidConfig(_))));
    }

    /// Ensures that a start not ending at a block boundary is rejected.
    #[test]
    fn unaligned_start() {
        let hash = ReducedKeccak::with_rate_output(16).unwrap();

        let result = CollisionSearch::new(hash, CycleDetection::starting_at(vec![1u8; 199])).run();

        assert!(matches!(result, Err(SpongeError::InvalidConfig(_))));
    }
}
