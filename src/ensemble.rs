use std::panic::{self, AssertUnwindSafe};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::mean::compute_mean;
use crate::monitor::NoopMonitor;
use crate::network::Network;
use crate::simulation::{CancellationToken, RunLimits, Simulation, Termination};
use crate::trajectory::Trajectory;

#[derive(Clone, Debug, Default)]
pub struct EnsembleOptions {
    /// Worker count; `None` uses rayon's global pool sized to the host.
    pub threads: Option<usize>,
    /// Base seed; `None` draws one from system entropy.
    pub seed: Option<u64>,
    pub max_steps: Option<u64>,
    pub cancel: Option<CancellationToken>,
}

#[derive(Clone, Debug)]
pub struct ReplicateRun {
    pub replicate: usize,
    pub seed: u64,
    pub termination: Termination,
    pub trajectory: Trajectory,
}

#[derive(Debug, Error)]
#[error("replicate {replicate} (seed {seed:#018x}) failed: {error}")]
pub struct ReplicateFailure {
    pub replicate: usize,
    pub seed: u64,
    #[source]
    pub error: SimError,
}

#[derive(Debug)]
pub struct Ensemble {
    outcomes: Vec<Result<ReplicateRun, ReplicateFailure>>,
}

impl Ensemble {
    pub fn outcomes(&self) -> &[Result<ReplicateRun, ReplicateFailure>] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn runs(&self) -> impl Iterator<Item = &ReplicateRun> + '_ {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReplicateFailure> + '_ {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn trajectories(&self) -> impl Iterator<Item = &Trajectory> + '_ {
        self.runs().map(|run| &run.trajectory)
    }

    pub fn into_trajectories(self) -> Vec<Trajectory> {
        self.outcomes
            .into_iter()
            .filter_map(Result::ok)
            .map(|run| run.trajectory)
            .collect()
    }

    pub fn mean(&self) -> SimResult<Trajectory> {
        compute_mean(self.trajectories())
    }
}

pub fn run_replicates(network: &Network, end_time: f64, count: usize) -> SimResult<Ensemble> {
    run_replicates_with(network, end_time, count, &EnsembleOptions::default())
}

pub fn run_replicates_with(
    network: &Network,
    end_time: f64,
    count: usize,
    options: &EnsembleOptions,
) -> SimResult<Ensemble> {
    if count == 0 {
        return Err(SimError::InvalidArgument(
            "number of replicates must be greater than zero".into(),
        ));
    }
    if !end_time.is_finite() || end_time <= 0.0 {
        return Err(SimError::InvalidArgument(
            "end time must be positive and finite".into(),
        ));
    }
    if options.threads == Some(0) {
        return Err(SimError::InvalidArgument(
            "thread count must be greater than zero".into(),
        ));
    }

    let base_seed = options.seed.unwrap_or_else(rand::random);
    let limits = RunLimits {
        max_steps: options.max_steps,
        cancel: options.cancel.clone(),
    };

    let simulate = || -> Vec<Result<ReplicateRun, ReplicateFailure>> {
        (0..count)
            .into_par_iter()
            .map(|idx| {
                let seed = derive_seed(base_seed, idx as u64);
                run_replicate(network, end_time, idx, seed, &limits)
            })
            .collect()
    };

    let outcomes = match options.threads {
        Some(n) => ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?
            .install(simulate),
        None => simulate(),
    };

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    info!(
        replicates = count,
        failed,
        base_seed,
        "replicate batch finished"
    );
    Ok(Ensemble { outcomes })
}

fn run_replicate(
    network: &Network,
    end_time: f64,
    replicate: usize,
    seed: u64,
    limits: &RunLimits,
) -> Result<ReplicateRun, ReplicateFailure> {
    let simulate = || -> SimResult<(Termination, Trajectory)> {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let mut simulation = Simulation::new(network, rng)?;
        let termination = simulation.run_with_limits(end_time, limits, &mut NoopMonitor)?;
        Ok((termination, simulation.into_trajectory()))
    };
    let attempt = panic::catch_unwind(AssertUnwindSafe(simulate)).unwrap_or_else(|payload| {
        Err(SimError::ReplicatePanicked(panic_message(payload.as_ref())))
    });

    match attempt {
        Ok((termination, trajectory)) => {
            debug!(
                replicate,
                seed,
                events = trajectory.len().saturating_sub(1),
                ?termination,
                "replicate finished"
            );
            Ok(ReplicateRun {
                replicate,
                seed,
                termination,
                trajectory,
            })
        }
        Err(error) => {
            warn!(replicate, seed, %error, "replicate failed");
            Err(ReplicateFailure {
                replicate,
                seed,
                error,
            })
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Per-replicate seed: the replicate index is mixed into the base seed and
/// scrambled with SplitMix64, so replicates never share a stream even when
/// they start in the same clock tick.
pub fn derive_seed(base: u64, replicate: u64) -> u64 {
    const GOLDEN_GAMMA: u64 = 0x9E3779B97F4A7C15;
    let mut z = base ^ replicate.wrapping_mul(GOLDEN_GAMMA);
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
