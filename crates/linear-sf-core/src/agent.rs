//! Query contract for agents whose estimates are evaluated against ground truth
//!
//! Only the value query is mandatory. Everything else is an optional
//! capability: an accessor returning `None` means the agent does not have it,
//! and evaluators inspect [`AgentCapabilities`] once instead of probing the
//! agent ad hoc.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Successor-return query, exposed by agents that estimate returns through
/// their successor features
pub trait SuccessorReturn {
    /// Estimated successor return for the given features and action
    fn successor_return(&self, features: &DVector<f64>, action: usize) -> crate::Result<f64>;
}

/// Agent whose value estimates can be queried
pub trait Agent {
    /// Estimated value of taking `action` in the state with `features`
    fn q_value(&self, features: &DVector<f64>, action: usize) -> crate::Result<f64>;

    /// Successor-return capability, if the agent has one
    fn as_successor_return(&self) -> Option<&dyn SuccessorReturn> {
        None
    }

    /// Per-action `d x d` successor-feature parameter matrices, if exposed
    fn sf_params(&self) -> Option<&[DMatrix<f64>]> {
        None
    }

    /// Length `d` reward parameter vector, if exposed
    fn reward_params(&self) -> Option<&DVector<f64>> {
        None
    }

    /// Describe which optional capabilities this agent has
    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities {
            successor_return: self.as_successor_return().is_some(),
            sf_params: self.sf_params().is_some_and(|ws| !ws.is_empty()),
            reward_params: self.reward_params().is_some(),
        }
    }
}

/// Which optional capabilities an agent exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Successor-return query
    pub successor_return: bool,
    /// Successor-feature parameter matrices (at least one action)
    pub sf_params: bool,
    /// Reward parameter vector
    pub reward_params: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl Agent for Constant {
        fn q_value(&self, _features: &DVector<f64>, _action: usize) -> crate::Result<f64> {
            Ok(self.0)
        }
    }

    struct WithReturn {
        wr: DVector<f64>,
    }

    impl SuccessorReturn for WithReturn {
        fn successor_return(&self, features: &DVector<f64>, _action: usize) -> crate::Result<f64> {
            Ok(features.dot(&self.wr))
        }
    }

    impl Agent for WithReturn {
        fn q_value(&self, features: &DVector<f64>, _action: usize) -> crate::Result<f64> {
            Ok(features.sum())
        }

        fn as_successor_return(&self) -> Option<&dyn SuccessorReturn> {
            Some(self)
        }

        fn reward_params(&self) -> Option<&DVector<f64>> {
            Some(&self.wr)
        }
    }

    #[test]
    fn test_default_capabilities() {
        let agent = Constant(0.5);
        assert_eq!(agent.capabilities(), AgentCapabilities::default());
        assert!(agent.as_successor_return().is_none());
    }

    #[test]
    fn test_declared_capabilities() {
        let agent = WithReturn {
            wr: DVector::from_vec(vec![1.0, 2.0]),
        };
        let caps = agent.capabilities();
        assert!(caps.successor_return);
        assert!(caps.reward_params);
        assert!(!caps.sf_params);

        let phi = DVector::from_vec(vec![0.0, 1.0]);
        let query = agent.as_successor_return().unwrap();
        assert!((query.successor_return(&phi, 0).unwrap() - 2.0).abs() < f64::EPSILON);
    }
}
