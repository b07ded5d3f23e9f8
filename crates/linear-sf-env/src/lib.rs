//! Environments for the linear successor-feature testbed
//!
//! The main environment is the [`RandomWalkChain`]: a finite, single-action
//! Markov chain whose structural matrices are available in closed form
//! through [`MarkovModel`](linear_sf_core::MarkovModel), so learned estimates
//! can be compared against exact solutions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chain;
pub mod wrappers;

// Re-export environments
pub use chain::{ChainConfig, RandomWalkChain, DEFAULT_NUM_STATES};
pub use wrappers::TimeLimit;

// Re-export core types
pub use linear_sf_core::{
    Environment, EnvironmentConfig, MarkovModel, Observation, Reward, Step, TrackedEnvironment,
    VectorObservation,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ChainConfig, RandomWalkChain, TimeLimit};
    pub use linear_sf_core::prelude::*;
}
