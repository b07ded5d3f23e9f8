//! Action representations and action spaces

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for actions in an RL environment
pub trait Action: Clone + Debug + Send + Sync {
    /// Convert action to a vector representation
    fn to_vec(&self) -> Vec<f64>;
}

/// Trait for defining action spaces
pub trait ActionSpace: Send + Sync {
    /// The type of actions in this space
    type Action: Action;

    /// Sample an action using the caller's random source
    fn sample(&self, rng: &mut dyn RngCore) -> Self::Action;

    /// Check if an action is valid within this space
    fn contains(&self, action: &Self::Action) -> bool;

    /// Get the dimensionality of the action space
    fn dim(&self) -> Option<usize>;
}

/// Discrete action, an index into a [`DiscreteSpace`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteAction(pub usize);

impl Action for DiscreteAction {
    #[allow(clippy::cast_precision_loss)]
    fn to_vec(&self) -> Vec<f64> {
        vec![self.0 as f64]
    }
}

impl From<usize> for DiscreteAction {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Discrete action space `{0, .., n-1}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscreteSpace {
    /// Number of discrete actions
    pub n: usize,
}

impl DiscreteSpace {
    /// Create a new discrete action space
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl ActionSpace for DiscreteSpace {
    type Action = DiscreteAction;

    fn sample(&self, rng: &mut dyn RngCore) -> Self::Action {
        DiscreteAction(rng.gen_range(0..self.n))
    }

    fn contains(&self, action: &Self::Action) -> bool {
        action.0 < self.n
    }

    fn dim(&self) -> Option<usize> {
        Some(1)
    }
}
