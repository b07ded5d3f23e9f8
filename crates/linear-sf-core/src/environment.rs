//! Environment traits and types

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Action, ActionSpace, Observation, ObservationSpace};

/// Reward signal from the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(pub f64);

impl Reward {
    /// Get the reward value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Reward {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Reward> for f64 {
    fn from(reward: Reward) -> Self {
        reward.0
    }
}

/// Result of a single environment step
#[derive(Debug, Clone)]
pub struct Step<O> {
    /// Observation from the environment
    pub observation: O,
    /// Reward signal
    pub reward: Reward,
    /// Whether the episode is done
    pub done: bool,
    /// Whether the episode was truncated (e.g., time limit)
    pub truncated: bool,
    /// Additional info from the environment
    pub info: StepInfo,
}

/// Additional information from a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Custom fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StepInfo {
    /// Whether the info carries no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: String,
    /// Total reward
    pub total_reward: f64,
    /// Number of steps
    pub steps: usize,
    /// Whether episode was truncated
    pub truncated: bool,
    /// Start time
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// End time
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Configuration for environments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Random seed
    pub seed: Option<u64>,
    /// Maximum episode steps
    pub max_steps: Option<usize>,
    /// Environment specific parameters
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl EnvironmentConfig {
    /// Config with only a seed set
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Set an environment specific parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Read an environment specific parameter, `None` when it is not set
    pub fn get_param<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Option<T>> {
        self.params
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(Into::into)
    }
}

/// Core environment trait
///
/// Environments are plain synchronous state machines; every instance owns its
/// own random source so instances never share trajectories.
pub trait Environment: Send {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;

    /// Get the observation space
    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>>;

    /// Get the action space
    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>>;

    /// Reset the environment and return the initial observation
    fn reset(&mut self) -> crate::Result<Self::Observation>;

    /// Take a step in the environment
    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation>>;

    /// Render the environment (optional)
    fn render(&self) -> crate::Result<()> {
        Ok(())
    }

    /// Close the environment
    fn close(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// Get current episode info
    fn episode_info(&self) -> Option<Episode> {
        None
    }
}

/// Wrapper for environments that tracks episodes
pub struct TrackedEnvironment<E> {
    /// Inner environment
    pub env: E,
    /// Current episode
    pub episode: Option<Episode>,
    /// Step counter
    pub step_count: usize,
}

impl<E> TrackedEnvironment<E> {
    /// Create a new tracked environment
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode: None,
            step_count: 0,
        }
    }
}

impl<E> Environment for TrackedEnvironment<E>
where
    E: Environment,
{
    type Observation = E::Observation;
    type Action = E::Action;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        self.env.action_space()
    }

    fn reset(&mut self) -> crate::Result<Self::Observation> {
        if let Some(ref mut episode) = self.episode {
            if episode.end_time.is_none() {
                episode.end_time = Some(chrono::Utc::now());
            }
        }

        let episode = Episode {
            id: uuid::Uuid::new_v4().to_string(),
            total_reward: 0.0,
            steps: 0,
            truncated: false,
            start_time: chrono::Utc::now(),
            end_time: None,
        };
        tracing::debug!(episode = %episode.id, "starting episode");
        self.episode = Some(episode);
        self.step_count = 0;

        self.env.reset()
    }

    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation>> {
        let step = self.env.step(action)?;

        self.step_count += 1;
        if let Some(ref mut episode) = self.episode {
            episode.total_reward += step.reward.0;
            episode.steps = self.step_count;

            if (step.done || step.truncated) && episode.end_time.is_none() {
                episode.truncated = step.truncated;
                episode.end_time = Some(chrono::Utc::now());
                tracing::debug!(
                    episode = %episode.id,
                    steps = episode.steps,
                    total_reward = episode.total_reward,
                    truncated = episode.truncated,
                    "episode finished"
                );
            }
        }

        Ok(step)
    }

    fn render(&self) -> crate::Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> crate::Result<()> {
        self.env.close()
    }

    fn episode_info(&self) -> Option<Episode> {
        self.episode.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxObservationSpace, DiscreteAction, DiscreteSpace, VectorObservation};

    /// Counts down from `start`, paying 1.0 on the step that reaches zero
    struct Countdown {
        start: usize,
        left: usize,
    }

    impl Environment for Countdown {
        type Observation = VectorObservation;
        type Action = DiscreteAction;

        fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
            Box::new(BoxObservationSpace::unit(1))
        }

        fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
            Box::new(DiscreteSpace::new(1))
        }

        fn reset(&mut self) -> crate::Result<Self::Observation> {
            self.left = self.start;
            Ok(VectorObservation::zeros(1))
        }

        fn step(&mut self, _action: Self::Action) -> crate::Result<Step<Self::Observation>> {
            self.left = self.left.saturating_sub(1);
            let done = self.left == 0;
            Ok(Step {
                observation: VectorObservation::zeros(1),
                reward: Reward(if done { 1.0 } else { 0.0 }),
                done,
                truncated: false,
                info: StepInfo::default(),
            })
        }
    }

    #[test]
    fn test_tracked_episode() {
        let mut env = TrackedEnvironment::new(Countdown { start: 3, left: 0 });
        assert!(env.episode_info().is_none());

        env.reset().unwrap();
        let first_id = env.episode_info().unwrap().id;

        let mut steps = 0;
        loop {
            steps += 1;
            if env.step(DiscreteAction(0)).unwrap().done {
                break;
            }
        }

        let episode = env.episode_info().unwrap();
        assert_eq!(steps, 3);
        assert_eq!(episode.steps, 3);
        assert!((episode.total_reward - 1.0).abs() < f64::EPSILON);
        assert!(!episode.truncated);
        assert!(episode.end_time.is_some());

        env.reset().unwrap();
        let second = env.episode_info().unwrap();
        assert_ne!(second.id, first_id);
        assert_eq!(second.steps, 0);
        assert!(second.end_time.is_none());
    }

    #[test]
    fn test_config_params() {
        let config = EnvironmentConfig::with_seed(42).param("n_states", 10);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.get_param::<usize>("n_states").unwrap(), Some(10));
        assert_eq!(config.get_param::<usize>("missing").unwrap(), None);
        assert!(config.get_param::<String>("n_states").is_err());
    }

    #[test]
    fn test_config_flattened_json() {
        let config: EnvironmentConfig =
            serde_json::from_str(r#"{"seed": 7, "max_steps": 40, "n_states": 12}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_steps, Some(40));
        assert_eq!(config.get_param::<usize>("n_states").unwrap(), Some(12));
    }
}
