// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the generic collision search on the capacity part
//! of the state of a [`ReducedKeccak`].
//!
//! A search is built the following way:
//! 1. A [`CollisionSearchState`] records every evaluated message by its
//! [`CapacityTail`] and reports the first two distinct messages sharing one.
//! 2. A [`SearchStrategy`] decides which messages are evaluated,
//! e.g. [`CycleDetection`], [`ChainSearch`], or [`DictionarySearch`].
//! 3. A [`CollisionSearch`] ties a hash and a strategy together and
//! owns one [`CollisionSearchState`] per run.
//!
//! By the birthday bound, a collision is expected after roughly
//! `1.25 * 2^(capacity / 2)` evaluations.

use crate::{
    construction::hash::{HashInto, ReducedKeccak},
    error::SpongeError,
    primitive::state::{KeccakState, STATE_BYTES},
};
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::{hash_map::Entry, HashMap},
    fmt,
    ops::ControlFlow,
};
use tracing::{debug, info, trace};

mod chain;
mod cycle_detection;
mod dictionary;

pub use chain::ChainSearch;
pub use cycle_detection::CycleDetection;
pub use dictionary::{DictionarySearch, MAX_ROUND_SIZE, MAX_WORKERS};

/// The maximal number of bytes of a [`CapacityTail`], i.e. capacities of
/// up to 256 bits can be searched.
pub const MAX_TAIL_BYTES: usize = 32;

/// A debug message with the progress is emitted after this many evaluations.
const PROGRESS_INTERVAL: u64 = 1 << 14;

/// The last `capacity / 8` bytes of a state, which are used as key of the search.
///
/// # Examples
/// ```
/// use keccak_collision::attack::collision::CapacityTail;
/// use keccak_collision::primitive::state::KeccakState;
///
/// let mut state = KeccakState::default();
/// state.xor_bytes(198, &[0x4b, 0xd8]);
///
/// let tail = CapacityTail::from_state(&state, 2);
///
/// assert_eq!("4bd8", tail.to_string());
/// assert_eq!(&[0x4b, 0xd8], tail.as_bytes());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapacityTail {
    len: u8,
    bytes: [u8; MAX_TAIL_BYTES],
}

impl CapacityTail {
    /// Extracts the last `len` bytes of `state`.
    ///
    /// Parameters:
    /// - `state`: the state whose capacity part is extracted
    /// - `len`: the number of capacity bytes
    ///
    /// Returns the [`CapacityTail`] of `state`.
    ///
    /// # Panics ...
    /// - if `len` is larger than [`MAX_TAIL_BYTES`].
    pub fn from_state(state: &KeccakState, len: usize) -> Self {
        let bytes = state.to_bytes();
        Self::from_slice(&bytes[STATE_BYTES - len..])
    }

    /// Creates a [`CapacityTail`] from its bytes.
    ///
    /// # Panics ...
    /// - if `bytes` is longer than [`MAX_TAIL_BYTES`].
    pub fn from_slice(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() <= MAX_TAIL_BYTES,
            "A capacity tail consists of at most {MAX_TAIL_BYTES} bytes."
        );
        let mut tail = Self {
            len: bytes.len() as u8,
            bytes: [0u8; MAX_TAIL_BYTES],
        };
        tail.bytes[..bytes.len()].copy_from_slice(bytes);
        tail
    }

    /// Returns the bytes of the tail.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Returns the number of bytes of the tail.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if the tail belongs to a capacity of `0`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for CapacityTail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}

impl fmt::Debug for CapacityTail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapacityTail({self})")
    }
}

impl Serialize for CapacityTail {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CapacityTail {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = hex::decode(String::deserialize(deserializer)?).map_err(D::Error::custom)?;
        if bytes.len() > MAX_TAIL_BYTES {
            return Err(D::Error::custom(format!(
                "A capacity tail consists of at most {MAX_TAIL_BYTES} bytes."
            )));
        }
        Ok(Self::from_slice(&bytes))
    }
}

/// A single evaluation of the hash during a search.
///
/// Attributes:
/// - `index`: the position of the message in the order of evaluation
/// - `message`: the evaluated message
/// - `tail`: the capacity tail of the final state of `message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub index: u64,
    pub message: Vec<u8>,
    pub tail: CapacityTail,
}

impl Observation {
    /// Hashes `message` and records its capacity tail.
    ///
    /// Parameters:
    /// - `hash`: the hash under attack
    /// - `index`: the position of the message in the order of evaluation
    /// - `message`: the message to be evaluated
    ///
    /// Returns the [`Observation`] together with the digest of `message`.
    pub fn evaluate(hash: &ReducedKeccak, index: u64, message: Vec<u8>) -> (Self, Vec<u8>) {
        let output = hash.hash(&message);
        let tail = CapacityTail::from_state(&output.final_state, hash.capacity_bytes());
        (
            Self {
                index,
                message,
                tail,
            },
            output.digest,
        )
    }
}

/// The message stored for a capacity tail.
#[derive(Debug)]
struct Visit {
    index: u64,
    message: Vec<u8>,
}

/// Keeps track of all capacity tails seen during one collision search.
///
/// A state is created per search, filled by [`observe`](CollisionSearchState::observe)
/// or [`merge`](CollisionSearchState::merge), and consumed by
/// [`report`](CollisionSearchState::report) as soon as a collision is found.
///
/// # Examples
/// ```
/// use keccak_collision::attack::collision::{CollisionSearchState, Observation};
/// use keccak_collision::construction::hash::ReducedKeccak;
///
/// let hash = ReducedKeccak::with_rate_output(16).unwrap();
/// let mut state = CollisionSearchState::new(16).unwrap();
///
/// let (observation, _) = Observation::evaluate(&hash, 0, b"message".to_vec());
///
/// assert!(state.observe(observation.clone()).is_none());
/// // the same message is not a collision
/// assert!(state.observe(observation).is_none());
/// assert_eq!(2, state.evaluations());
/// assert_eq!(1, state.len());
/// ```
#[derive(Debug)]
pub struct CollisionSearchState {
    capacity_bytes: usize,
    visited: HashMap<CapacityTail, Visit>,
    evaluations: u64,
}

impl CollisionSearchState {
    /// Starts an empty search on capacity tails of `capacity` bits.
    ///
    /// Parameters:
    /// - `capacity`: the capacity in bits of the hash under attack
    ///
    /// Returns an empty [`CollisionSearchState`] or a [`SpongeError`]
    /// if the capacity can not be searched.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
    /// if `capacity` is not a multiple of `8` or larger than `256`.
    pub fn new(capacity: usize) -> Result<Self, SpongeError> {
        if capacity % 8 != 0 || capacity > 8 * MAX_TAIL_BYTES {
            return Err(SpongeError::InvalidConfig(format!(
                "Only capacities which are multiples of 8 and at most {} can be searched, but {capacity} was provided.",
                8 * MAX_TAIL_BYTES
            )));
        }

        Ok(Self {
            capacity_bytes: capacity / 8,
            visited: HashMap::new(),
            evaluations: 0,
        })
    }

    /// Returns the number of capacity bytes the search is keyed on.
    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Returns the number of observations made so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Returns the number of distinct capacity tails seen so far.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Returns `true` if nothing has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Records one evaluation of the hash.
    ///
    /// Parameters:
    /// - `observation`: the evaluated message and its capacity tail
    ///
    /// Returns the earlier and the new observation if the capacity tail has
    /// been seen before for a different message, otherwise `None`.
    ///
    /// # Panics ...
    /// - if the tail of `observation` does not have the length of the searched capacity.
    pub fn observe(&mut self, observation: Observation) -> Option<(Observation, Observation)> {
        assert_eq!(
            self.capacity_bytes,
            observation.tail.len(),
            "The observation belongs to a different capacity."
        );
        self.evaluations += 1;
        if self.evaluations % PROGRESS_INTERVAL == 0 {
            debug!(
                evaluations = self.evaluations,
                visited = self.visited.len(),
                "collision search in progress"
            );
        }

        match self.visited.entry(observation.tail) {
            Entry::Occupied(entry) => {
                let visit = entry.get();
                if visit.message == observation.message {
                    return None;
                }
                let earlier = Observation {
                    index: visit.index,
                    message: visit.message.clone(),
                    tail: observation.tail,
                };
                Some((earlier, observation))
            }
            Entry::Vacant(entry) => {
                entry.insert(Visit {
                    index: observation.index,
                    message: observation.message,
                });
                None
            }
        }
    }

    /// Records a batch of evaluations in order and stops at the first collision.
    /// Observations after the colliding one are discarded and not counted.
    ///
    /// Parameters:
    /// - `batch`: the observations, e.g. computed by a worker
    ///
    /// Returns the first collision within `batch` or `None`.
    pub fn merge(
        &mut self,
        batch: impl IntoIterator<Item = Observation>,
    ) -> Option<(Observation, Observation)> {
        batch
            .into_iter()
            .find_map(|observation| self.observe(observation))
    }

    /// Finishes the search and builds the report of the found collision.
    ///
    /// Parameters:
    /// - `hash`: the hash the observations were made with
    /// - `pair`: the colliding observations
    ///
    /// Returns a [`Collision`], where both witnesses carry their final states.
    pub fn report(self, hash: &ReducedKeccak, pair: (Observation, Observation)) -> Collision {
        let (first, second) = pair;
        let witness = |observation: Observation| Witness {
            final_state: hash.hash(&observation.message).final_state,
            index: observation.index,
            message: observation.message,
        };

        Collision {
            capacity_tail: first.tail,
            first: witness(first),
            second: witness(second),
            evaluations: self.evaluations,
        }
    }
}

/// One of the two messages of a [`Collision`].
///
/// Attributes:
/// - `index`: the position of the message in the order of evaluation
/// - `message`: the message
/// - `final_state`: the state the final permutation is applied to when hashing `message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub index: u64,
    #[serde(with = "hex::serde")]
    pub message: Vec<u8>,
    pub final_state: KeccakState,
}

/// Two distinct messages whose final states share the capacity tail.
///
/// Attributes:
/// - `capacity_tail`: the shared capacity tail
/// - `first`: the message that was evaluated first
/// - `second`: the message that was evaluated second
/// - `evaluations`: the number of hash evaluations the search needed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub capacity_tail: CapacityTail,
    pub first: Witness,
    pub second: Witness,
    pub evaluations: u64,
}

impl Collision {
    /// Checks whether both witnesses are distinct and hash to final states
    /// with the reported capacity tail under `hash`.
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::attack::collision::{ChainSearch, CollisionSearch};
    /// use keccak_collision::construction::hash::ReducedKeccak;
    ///
    /// let hash = ReducedKeccak::with_rate_output(8).unwrap();
    /// let collision = CollisionSearch::new(hash, ChainSearch::default()).run().unwrap();
    ///
    /// assert!(collision.is_valid(&hash));
    /// ```
    pub fn is_valid(&self, hash: &ReducedKeccak) -> bool {
        let tail_of = |witness: &Witness| {
            CapacityTail::from_state(
                &hash.hash(&witness.message).final_state,
                hash.capacity_bytes(),
            )
        };

        self.first.message != self.second.message
            && tail_of(&self.first) == self.capacity_tail
            && tail_of(&self.second) == self.capacity_tail
    }
}

/// This trait should be implemented by every strategy that chooses which
/// messages are evaluated during a collision search.
/// Strategies are serialized by name, so a whole search can be configured in JSON.
#[typetag::serde]
pub trait SearchStrategy: fmt::Debug + Send + Sync {
    /// Evaluates messages until two distinct messages share a capacity tail.
    ///
    /// Parameters:
    /// - `hash`: the hash under attack
    /// - `state`: the state all evaluations are recorded in
    ///
    /// Returns the two colliding observations or a [`SpongeError`]
    /// if the strategy is misconfigured.
    fn search(
        &self,
        hash: &ReducedKeccak,
        state: &mut CollisionSearchState,
    ) -> Result<(Observation, Observation), SpongeError>;
}

/// Returns the first message of a chain, which is `start` or, if no start
/// is given, one block of zero bytes.
///
/// # Errors and Failures
/// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
/// if the length of `start` is not a multiple of the rate.
pub(crate) fn chain_start(
    start: &Option<Vec<u8>>,
    hash: &ReducedKeccak,
) -> Result<Vec<u8>, SpongeError> {
    match start {
        None => Ok(vec![0u8; hash.rate_bytes()]),
        Some(start) if start.len() % hash.rate_bytes() != 0 => {
            Err(SpongeError::InvalidConfig(format!(
                "A chain start of {} bytes does not end at a block boundary of {} bytes.",
                start.len(),
                hash.rate_bytes()
            )))
        }
        Some(start) => Ok(start.clone()),
    }
}

/// Turns the digest of a chain element into the next chain element,
/// which is the digest truncated or padded with zero bytes to one block.
pub(crate) fn next_chain_message(mut digest: Vec<u8>, hash: &ReducedKeccak) -> Vec<u8> {
    digest.resize(hash.rate_bytes(), 0);
    digest
}

/// Evaluates chain element `index`, records it, and continues with
/// its capacity tail and the next chain element.
pub(crate) fn chain_step(
    hash: &ReducedKeccak,
    state: &mut CollisionSearchState,
    index: u64,
    message: Vec<u8>,
) -> ControlFlow<(Observation, Observation), (CapacityTail, Vec<u8>)> {
    let (observation, digest) = Observation::evaluate(hash, index, message);
    let tail = observation.tail;
    trace!(index, %tail, "chain step");
    match state.observe(observation) {
        Some(pair) => ControlFlow::Break(pair),
        None => ControlFlow::Continue((tail, next_chain_message(digest, hash))),
    }
}

/// A collision search on a [`ReducedKeccak`] with a configurable strategy.
///
/// Attributes:
/// - `hash`: the hash under attack
/// - `strategy`: the strategy choosing the evaluated messages
///
/// # Examples
/// ```
/// use keccak_collision::attack::collision::{CollisionSearch, CycleDetection};
/// use keccak_collision::construction::hash::ReducedKeccak;
///
/// let hash = ReducedKeccak::with_rate_output(16).unwrap();
/// let search = CollisionSearch::new(hash, CycleDetection::default());
///
/// let collision = search.run().unwrap();
///
/// assert_eq!("4bd8", collision.capacity_tail.to_string());
/// assert_eq!((30, 182), (collision.first.index, collision.second.index));
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct CollisionSearch {
    pub hash: ReducedKeccak,
    pub strategy: Box<dyn SearchStrategy>,
}

impl CollisionSearch {
    /// Creates a new collision search.
    ///
    /// Parameters:
    /// - `hash`: the hash under attack
    /// - `strategy`: the strategy choosing the evaluated messages
    ///
    /// Returns a [`CollisionSearch`], which can be started with [`CollisionSearch::run`].
    pub fn new(hash: ReducedKeccak, strategy: impl SearchStrategy + 'static) -> Self {
        Self {
            hash,
            strategy: Box::new(strategy),
        }
    }

    /// Reads a collision search from its JSON configuration.
    ///
    /// Parameters:
    /// - `json`: the configuration containing the hash and the strategy
    ///
    /// Returns the configured [`CollisionSearch`] or a [`SpongeError`].
    ///
    /// # Examples
    /// ```
    /// use keccak_collision::attack::collision::CollisionSearch;
    ///
    /// let search = CollisionSearch::from_json(
    ///     r#"{
    ///         "hash": {"capacity": 16, "output_bits": 1584},
    ///         "strategy": {"DictionarySearch": {"workers": 2, "batch_size": 128, "seed": 7}}
    ///     }"#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(16, search.hash.capacity());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
    /// if `json` is not a valid configuration, e.g. if it contains invalid sponge parameters
    /// or an unknown strategy.
    pub fn from_json(json: &str) -> Result<Self, SpongeError> {
        serde_json::from_str(json).map_err(|e| SpongeError::InvalidConfig(e.to_string()))
    }

    /// Runs the search with a fresh [`CollisionSearchState`] until a collision is found.
    ///
    /// Returns the found [`Collision`] or a [`SpongeError`] if the search is misconfigured.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
    /// if the capacity of the hash is larger than `256` or the strategy is misconfigured.
    pub fn run(&self) -> Result<Collision, SpongeError> {
        let state = CollisionSearchState::new(self.hash.capacity())?;
        self.run_with_state(state)
    }

    /// Runs the search, recording all evaluations in `state`.
    ///
    /// Parameters:
    /// - `state`: the state of the search, e.g. an empty one or one with earlier observations
    ///
    /// Returns the found [`Collision`] or a [`SpongeError`] if the search is misconfigured.
    ///
    /// # Errors and Failures
    /// - Returns a [`SpongeError`] of type [`InvalidConfig`](SpongeError::InvalidConfig)
    /// if `state` was created for another capacity or the strategy is misconfigured.
    pub fn run_with_state(&self, mut state: CollisionSearchState) -> Result<Collision, SpongeError> {
        if state.capacity_bytes() != self.hash.capacity_bytes() {
            return Err(SpongeError::InvalidConfig(format!(
                "The search state is keyed on {} capacity bytes, but the hash has {}.",
                state.capacity_bytes(),
                self.hash.capacity_bytes()
            )));
        }

        info!(
            capacity = self.hash.capacity(),
            output_bits = self.hash.output_bits(),
            strategy = ?self.strategy,
            "starting collision search"
        );
        let pair = self.strategy.search(&self.hash, &mut state)?;
        let collision = state.report(&self.hash, pair);
        info!(
            evaluations = collision.evaluations,
            tail = %collision.capacity_tail,
            first = collision.first.index,
            second = collision.second.index,
            "found capacity collision"
        );

        Ok(collision)
    }
}

#[cfg(test)]
mod test_capacity_tail {
    use super::{CapacityTail, MAX_TAIL_BYTES};
    use crate::primitive::state::KeccakState;
    use std::collections::HashSet;

    /// Ensures that tails compare by their exact bytes and length.
    #[test]
    fn value_semantics() {
        let a = CapacityTail::from_slice(&[1, 2]);
        let b = CapacityTail::from_slice(&[1, 2]);
        let c = CapacityTail::from_slice(&[1, 2, 0]);

        let set: HashSet<_> = [a, b, c].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(2, set.len());
    }

    /// Ensures that the tail is taken from the end of the state.
    #[test]
    fn from_state() {
        let mut state = KeccakState::default();
        state.xor_bytes(195, &[1, 2, 3, 4, 5]);

        assert_eq!(&[2, 3, 4, 5], CapacityTail::from_state(&state, 4).as_bytes());
        assert!(CapacityTail::from_state(&state, 0).is_empty());
    }

    /// Ensures that too long tails result in a panic.
    #[test]
    #[should_panic]
    fn too_long() {
        let _ = CapacityTail::from_slice(&[0u8; MAX_TAIL_BYTES + 1]);
    }

    /// Ensures that tails are serialized as hex strings.
    #[test]
    fn serialize() {
        let tail = CapacityTail::from_slice(&[0x79, 0x7d, 0xa3]);

        let json = serde_json::to_string(&tail).unwrap();
        let read: CapacityTail = serde_json::from_str(&json).unwrap();

        assert_eq!("\"797da3\"", json);
        assert_eq!(tail, read);
        assert!(serde_json::from_str::<CapacityTail>(&format!("\"{}\"", "00".repeat(33))).is_err());
    }
}


#[cfg(test)]
mod test_collision_search {
    use super::{ChainSearch, Collision, CollisionSearch, CollisionSearchState, CycleDetection};
    use crate::construction::hash::ReducedKeccak;

    /// Ensures that a state of another capacity is rejected.
    #[test]
    fn mismatching_state() {
        let hash = ReducedKeccak::with_rate_output(16).unwrap();
        let search = CollisionSearch::new(hash, ChainSearch::default());

        assert!(search
            .run_with_state(CollisionSearchState::new(24).unwrap())
            .is_err());
    }

    /// Ensures that too large capacities are rejected before searching.
    #[test]
    fn capacity_too_large() {
        let hash = ReducedKeccak::with_rate_output(512).unwrap();
        let search = CollisionSearch::new(hash, CycleDetection::default());

        assert!(search.run().is_err());
    }

    /// Ensures that a search and its report survive a JSON round trip.
    #[test]
    fn json_configuration() {
        let search = CollisionSearch::from_json(
            r#"{"hash": {"capacity": 16, "output_bits": 1584}, "strategy": {"ChainSearch": {}}}"#,
        )
        .unwrap();

        let collision = search.run().unwrap();
        let json = serde_json::to_string(&collision).unwrap();

        assert_eq!(collision, serde_json::from_str::<Collision>(&json).unwrap());
        assert!(json.contains("\"capacity_tail\":\"4bd8\""));
    }

    /// Ensures that a search runs with a subscriber installed.
    #[test]
    fn with_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        let hash = ReducedKeccak::with_rate_output(24).unwrap();

        let collision = CollisionSearch::new(hash, ChainSearch::default())
            .run()
            .unwrap();

        assert_eq!("797da3", collision.capacity_tail.to_string());
    }

    /// Ensures that invalid configurations are rejected.
    #[test]
    fn invalid_json() {
        let unknown_strategy =
            r#"{"hash": {"capacity": 16, "output_bits": 1584}, "strategy": {"Guessing": {}}}"#;
        let invalid_capacity =
            r#"{"hash": {"capacity": 15, "output_bits": 1584}, "strategy": {"ChainSearch": {}}}"#;

        assert!(CollisionSearch::from_json(unknown_strategy).is_err());
        assert!(CollisionSearch::from_json(invalid_capacity).is_err());
        assert!(CollisionSearch::from_json("{").is_err());
    }
}
