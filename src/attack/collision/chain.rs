// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the chained dictionary search, which walks the
//! chain `m_{i+1} = H(m_i)` and looks every capacity tail up in a dictionary.

use super::{chain_start, chain_step, CollisionSearchState, Observation, SearchStrategy};
use crate::{construction::hash::ReducedKeccak, error::SpongeError};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// A search along the chain `m_{i+1} = H(m_i)`, where every element is evaluated once.
///
/// Attributes:
/// - `start`: the first element of the chain, one block of zero bytes if `None`
///
/// Every digest is truncated or padded with zero bytes to one block before it is
/// hashed again, so all chain elements end at a block boundary and every collision
/// can be extended by [`forge_suffixes`](crate::attack::forge::forge_suffixes)
/// for any output length.
///
/// # Examples
/// ```
/// use keccak_collision::attack::collision::{ChainSearch, CollisionSearchState, SearchStrategy};
/// use keccak_collision::construction::hash::ReducedKeccak;
///
/// let hash = ReducedKeccak::with_rate_output(16).unwrap();
/// let mut state = CollisionSearchState::new(16).unwrap();
///
/// let (first, second) = ChainSearch::default().search(&hash, &mut state).unwrap();
///
/// assert_eq!((30, 182), (first.index, second.index));
/// assert_eq!(183, state.evaluations());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSearch {
    #[serde(default, with = "crate::utils::bytes::hex_option")]
    pub start: Option<Vec<u8>>,
}

impl ChainSearch {
    /// Creates a chain search starting at `start`.
    pub fn starting_at(start: impl Into<Vec<u8>>) -> Self {
        Self {
            start: Some(start.into()),
        }
    }
}

#[typetag::serde]
impl SearchStrategy for ChainSearch {
    /// Evaluates `m_0, m_1, ...` until the capacity tail of some `m_j`
    /// has been seen for an earlier `m_i`.
    ///
    /// Parameters:
    /// - `hash`: the hash under attack
    /// - `state`: the state all evaluations are recorded in
    ///
    /// Returns the colliding observations `(m_i, m_j)` with `i < j`.
    /// The search does not terminate if the chain enters a cycle
    /// before two distinct messages share a capacity tail.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
    /// if the length of `start` is not a multiple of the rate.
    fn search(
        &self,
        hash: &ReducedKeccak,
        state: &mut CollisionSearchState,
    ) -> Result<(Observation, Observation), SpongeError> {
        let mut message = chain_start(&self.start, hash)?;
        let mut index = 0;
        loop {
            message = match chain_step(hash, state, index, message) {
                ControlFlow::Continue((_, next)) => next,
                ControlFlow::Break(pair) => return Ok(pair),
            };
            index += 1;
        }
    }
}
