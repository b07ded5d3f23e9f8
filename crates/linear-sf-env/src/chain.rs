//! Random walk chain, after the 19-state example in Sutton & Barto
//!
//! Positions run from `0` to `n_states`. Both ends are absorbing; the token
//! starts in the middle and moves one position left or right with equal
//! probability. Leaving through the right end pays 1.0, everything else pays
//! nothing. Observations are tabular one-hot features over the `n_states - 1`
//! non-terminal positions.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use linear_sf_core::{
    ActionSpace, BoxObservationSpace, DiscreteAction, DiscreteSpace, Environment,
    EnvironmentConfig, MarkovModel, ObservationSpace, RLError, Result, Reward, Step, StepInfo,
    VectorObservation,
};

/// Default chain size, giving the classic 19 non-terminal states
pub const DEFAULT_NUM_STATES: usize = 20;

/// Configuration of a [`RandomWalkChain`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Number of chain positions; `n_states - 1` of them are non-terminal
    pub n_states: usize,
    /// Seed of the instance-owned random source
    pub seed: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            n_states: DEFAULT_NUM_STATES,
            seed: 0,
        }
    }
}

impl ChainConfig {
    /// Check that the chain has at least two non-terminal states
    pub fn validate(&self) -> Result<()> {
        if self.n_states < 3 {
            return Err(RLError::InvalidConfig(format!(
                "random walk chain needs n_states >= 3, got {}",
                self.n_states
            )));
        }
        Ok(())
    }
}

impl TryFrom<&EnvironmentConfig> for ChainConfig {
    type Error = RLError;

    fn try_from(config: &EnvironmentConfig) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            n_states: config.get_param("n_states")?.unwrap_or(defaults.n_states),
            seed: config.seed.unwrap_or(defaults.seed),
        })
    }
}

/// Random walk chain environment with a single (ignored) action
#[derive(Debug, Clone)]
pub struct RandomWalkChain {
    /// Number of chain positions including the right boundary
    n_states: usize,
    /// Dimension of the tabular features
    feature_dim: usize,
    /// Current position in `[0, n_states]`
    state: usize,
    /// Instance-owned random source
    rng: StdRng,
}

impl RandomWalkChain {
    /// Create a chain from a generic environment configuration
    ///
    /// Reads `seed` and the optional `n_states` parameter.
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        Self::from_chain_config(ChainConfig::try_from(&config)?)
    }

    /// Create a chain from an explicit configuration
    pub fn from_chain_config(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            n_states = config.n_states,
            seed = config.seed,
            "creating random walk chain"
        );

        Ok(Self {
            n_states: config.n_states,
            feature_dim: config.n_states - 1,
            state: config.n_states / 2,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// The default 20-position chain with the given seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            n_states: DEFAULT_NUM_STATES,
            feature_dim: DEFAULT_NUM_STATES - 1,
            state: DEFAULT_NUM_STATES / 2,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current position
    #[must_use]
    pub fn state(&self) -> usize {
        self.state
    }

    /// Number of chain positions, terminal boundary included
    #[must_use]
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Position the chain starts from after a reset
    #[must_use]
    pub fn start_state(&self) -> usize {
        self.n_states / 2
    }

    /// Whether `state` lies strictly inside the chain
    #[must_use]
    pub fn is_interior(&self, state: usize) -> bool {
        (1..self.n_states).contains(&state)
    }

    /// One-hot features of a position; terminal positions map to all zeros
    #[must_use]
    pub fn state_to_features(&self, state: usize) -> VectorObservation {
        let mut phi = VectorObservation::zeros(self.feature_dim);
        if let Some(idx) = state.checked_sub(1).filter(|&idx| idx < self.feature_dim) {
            phi.data[idx] = 1.0;
        }
        phi
    }
}

impl Environment for RandomWalkChain {
    type Observation = VectorObservation;
    type Action = DiscreteAction;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        Box::new(BoxObservationSpace::unit(self.feature_dim))
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        Box::new(DiscreteSpace::new(1))
    }

    fn reset(&mut self) -> Result<Self::Observation> {
        self.state = self.start_state();
        Ok(self.state_to_features(self.state))
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation>> {
        let from = self.state;

        // Terminal positions are absorbing
        if self.is_interior(self.state) {
            self.state = if self.rng.gen::<bool>() {
                self.state + 1
            } else {
                self.state - 1
            };
        }

        let reward = if self.state == self.n_states { 1.0 } else { 0.0 };
        let done = !self.is_interior(self.state);
        tracing::trace!(action = action.0, from, to = self.state, reward, done, "chain step");

        Ok(Step {
            observation: self.state_to_features(self.state),
            reward: Reward(reward),
            done,
            truncated: false,
            info: StepInfo::default(),
        })
    }
}

impl MarkovModel for RandomWalkChain {
    /// Non-terminal positions only
    fn num_states(&self) -> usize {
        self.n_states - 1
    }

    fn transition_matrix(&self) -> DMatrix<f64> {
        let n = self.num_states();
        let mut p = DMatrix::zeros(n, n);
        for i in 1..n - 1 {
            p[(i, i + 1)] = 0.5;
            p[(i, i - 1)] = 0.5;
        }
        // The other half of each boundary row leaves the chain
        p[(0, 1)] = 0.5;
        p[(n - 1, n - 2)] = 0.5;
        p
    }

    /// Expected reward for leaving each state: only the rightmost state can
    /// exit on the paying side, which it does half of the time.
    fn reward_function(&self) -> DVector<f64> {
        let n = self.num_states();
        let mut r = DVector::zeros(n);
        r[n - 1] = 0.5;
        r
    }

    fn feature_matrix(&self) -> DMatrix<f64> {
        DMatrix::identity(self.num_states(), self.feature_dim)
    }

    fn feature_dim(&self) -> usize {
        self.feature_dim
    }
}
