//! Evaluation metrics for the Harvest environment.
//!
//! Runs a policy for whole episodes and aggregates harvesting and
//! sustainability statistics.

use std::fmt;

use tracing::debug;

use crate::environment::HarvestEnv;
use crate::error::Result;
use crate::policy::Policy;

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    /// Mean apples collected per episode, summed over agents.
    pub mean_apples_collected: f64,
    /// Mean number of times an agent fired per episode.
    pub mean_beams_fired: f64,
    /// Mean apples regrown per episode.
    pub mean_resources_spawned: f64,
    /// Mean resources left on the grid when the episode ended.
    pub mean_resources_remaining: f64,
    /// Mean cumulative reward per episode.
    pub mean_cumulative_reward: f64,
    /// Number of episodes evaluated.
    pub n_episodes: usize,
}

/// Tracks per-episode statistics during evaluation.
#[derive(Debug, Default)]
struct EpisodeStats {
    apples_collected: usize,
    beams_fired: usize,
    resources_spawned: usize,
    resources_remaining: usize,
    cumulative_reward: f64,
}

impl EvaluationMetrics {
    /// Evaluates a policy over multiple episodes and returns aggregated metrics.
    ///
    /// # Arguments
    ///
    /// * `env` - The environment to evaluate in
    /// * `policy` - The policy to evaluate
    /// * `n_episodes` - Number of episodes to run
    pub fn evaluate(
        env: &mut HarvestEnv,
        policy: &mut dyn Policy,
        n_episodes: usize,
    ) -> Result<Self> {
        let mut all_stats = Vec::with_capacity(n_episodes);

        for episode in 0..n_episodes {
            let mut obs = env.reset()?;
            let mut stats = EpisodeStats::default();

            loop {
                let actions = policy.select_actions(&obs);
                let result = env.step(&actions)?;

                stats.apples_collected += result.apples_collected;
                stats.beams_fired += result.beams_fired;
                stats.resources_spawned += result.resources_spawned;
                obs = result.observations;

                if result.done {
                    stats.cumulative_reward = env.cumulative_reward;
                    stats.resources_remaining = env.n_resources();
                    break;
                }
            }

            debug!(
                episode,
                policy = policy.name(),
                apples = stats.apples_collected,
                reward = stats.cumulative_reward,
                "Episode finished"
            );
            all_stats.push(stats);
        }

        let n = all_stats.len().max(1) as f64;
        let mean = |f: fn(&EpisodeStats) -> f64| all_stats.iter().map(f).sum::<f64>() / n;

        Ok(Self {
            mean_apples_collected: mean(|s| s.apples_collected as f64),
            mean_beams_fired: mean(|s| s.beams_fired as f64),
            mean_resources_spawned: mean(|s| s.resources_spawned as f64),
            mean_resources_remaining: mean(|s| s.resources_remaining as f64),
            mean_cumulative_reward: mean(|s| s.cumulative_reward),
            n_episodes,
        })
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(
            f,
            "  Mean apples collected:   {:.2}",
            self.mean_apples_collected
        )?;
        writeln!(f, "  Mean beams fired:        {:.1}", self.mean_beams_fired)?;
        writeln!(
            f,
            "  Mean apples regrown:     {:.1}",
            self.mean_resources_spawned
        )?;
        writeln!(
            f,
            "  Mean apples remaining:   {:.1}",
            self.mean_resources_remaining
        )?;
        writeln!(
            f,
            "  Mean cumulative reward:  {:.2}",
            self.mean_cumulative_reward
        )
    }
}
