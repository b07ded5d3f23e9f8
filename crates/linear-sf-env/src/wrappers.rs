//! Environment wrappers for common transformations

use linear_sf_core::{ActionSpace, Environment, ObservationSpace, Step};

/// Time limit wrapper
///
/// Ends an episode after `max_steps` steps. The step that hits the limit is
/// reported as `done` and `truncated` unless the inner environment already
/// terminated on it.
pub struct TimeLimit<E> {
    /// Inner environment
    pub env: E,
    /// Maximum steps
    pub max_steps: usize,
    /// Current step count
    pub steps: usize,
}

impl<E> TimeLimit<E> {
    /// Create a new time limit wrapper
    pub fn new(env: E, max_steps: usize) -> Self {
        Self {
            env,
            max_steps,
            steps: 0,
        }
    }

    /// Get a reference to the inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E> Environment for TimeLimit<E>
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

    fn reset(&mut self) -> linear_sf_core::Result<Self::Observation> {
        self.steps = 0;
        self.env.reset()
    }

    fn step(&mut self, action: Self::Action) -> linear_sf_core::Result<Step<Self::Observation>> {
        self.steps += 1;
        let mut step = self.env.step(action)?;

        if self.steps >= self.max_steps && !step.done {
            tracing::debug!(max_steps = self.max_steps, "episode truncated");
            step.truncated = true;
            step.done = true;
        }

        Ok(step)
    }

    fn render(&self) -> linear_sf_core::Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> linear_sf_core::Result<()> {
        self.env.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RandomWalkChain;
    use linear_sf_core::DiscreteAction;

    #[test]
    fn test_truncates_long_episodes() {
        // From the middle of a 20-state chain at least 10 steps are needed to exit
        let mut env = TimeLimit::new(RandomWalkChain::with_seed(1), 3);
        env.reset().unwrap();

        let first = env.step(DiscreteAction(0)).unwrap();
        let second = env.step(DiscreteAction(0)).unwrap();
        let third = env.step(DiscreteAction(0)).unwrap();

        assert!(!first.done && !second.done);
        assert!(third.done);
        assert!(third.truncated);

        env.reset().unwrap();
        assert_eq!(env.steps, 0);
        assert_eq!(env.inner().state(), 10);
    }
}
