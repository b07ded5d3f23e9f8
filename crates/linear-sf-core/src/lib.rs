//! Core traits and types for the linear successor-feature testbed
//!
//! This crate provides the shared vocabulary of the workspace: the
//! step/reset [`Environment`] contract, the structural [`MarkovModel`]
//! contract consumed by analytical solvers, and the [`Agent`] query contract
//! consumed by evaluators.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod environment;
pub mod error;
pub mod model;
pub mod observation;

// Re-export core traits and types
pub use action::{Action, ActionSpace, DiscreteAction, DiscreteSpace};
pub use agent::{Agent, AgentCapabilities, SuccessorReturn};
pub use environment::{
    Environment, EnvironmentConfig, Episode, Reward, Step, StepInfo, TrackedEnvironment,
};
pub use error::{RLError, Result};
pub use model::MarkovModel;
pub use observation::{BoxObservationSpace, Observation, ObservationSpace, VectorObservation};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, ActionSpace, Agent, DiscreteAction, Environment, MarkovModel, Observation,
        ObservationSpace, Result, Reward, Step, SuccessorReturn, VectorObservation,
    };
}
