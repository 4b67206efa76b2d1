use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::monitor::{Monitor, NoopMonitor};
use crate::network::Network;
use crate::propensity::{compute_delay, Delay};
use crate::trajectory::{SimulationState, Trajectory};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    EndTime,
    Exhausted,
    Cancelled,
    StepLimit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    Fired { reaction: usize, time: f64 },
    /// The reaction was selected but its stoichiometry could not be met; the
    /// clock advanced without any change in amounts.
    Blocked { reaction: usize, time: f64 },
    Exhausted,
}

#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunLimits {
    pub max_steps: Option<u64>,
    pub cancel: Option<CancellationToken>,
}

pub struct Simulation<'a, R> {
    network: &'a Network,
    rng: R,
    trajectory: Trajectory,
    delays: Vec<Delay>,
    time: f64,
    steps: u64,
}

impl<'a, R: Rng> Simulation<'a, R> {
    pub fn new(network: &'a Network, rng: R) -> SimResult<Self> {
        let mut trajectory = Trajectory::new(network.shared_names());
        trajectory.insert(SimulationState::new(
            0.0,
            network.initial_amounts().to_vec(),
        ))?;
        Ok(Self {
            network,
            rng,
            trajectory,
            delays: vec![Delay::Inactive; network.n_reactions()],
            time: 0.0,
            steps: 0,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    pub fn delays(&self) -> &[Delay] {
        &self.delays
    }

    pub fn current(&self) -> SimResult<&SimulationState> {
        self.trajectory
            .last()
            .ok_or_else(|| SimError::EmptyTrajectory("simulation has no current state".into()))
    }

    fn select_next(&mut self) -> SimResult<Option<(usize, f64)>> {
        let Self {
            network,
            rng,
            trajectory,
            delays,
            ..
        } = self;
        let current = trajectory
            .last()
            .ok_or_else(|| SimError::EmptyTrajectory("simulation has no current state".into()))?
            .amounts();
        let mut best: Option<(usize, f64)> = None;
        for (idx, reaction) in network.reactions().iter().enumerate() {
            let delay = compute_delay(reaction, current, &mut *rng)?;
            delays[idx] = delay;
            if let Delay::Active(value) = delay {
                if best.map_or(true, |(_, shortest)| value < shortest) {
                    best = Some((idx, value));
                }
            }
        }
        Ok(best)
    }

    pub fn step<M: Monitor>(&mut self, monitor: &mut M) -> SimResult<StepOutcome> {
        let Some((chosen, delay)) = self.select_next()? else {
            return Ok(StepOutcome::Exhausted);
        };
        let time = self.time + delay;
        let mut next = self.current()?.advanced_to(time);
        let reaction = &self.network.reactions()[chosen];
        let applied = reaction.is_satisfiable(next.amounts());
        if applied {
            reaction.apply(next.amounts_mut());
        } else {
            trace!(reaction = chosen, time, "stoichiometry not met, advancing clock only");
        }
        self.trajectory.insert(next)?;
        self.time = time;
        self.steps += 1;
        monitor.observe(self.current()?);
        Ok(if applied {
            StepOutcome::Fired {
                reaction: chosen,
                time,
            }
        } else {
            StepOutcome::Blocked {
                reaction: chosen,
                time,
            }
        })
    }

    pub fn run<M: Monitor>(&mut self, end_time: f64, monitor: &mut M) -> SimResult<Termination> {
        self.run_with_limits(end_time, &RunLimits::default(), monitor)
    }

    pub fn run_with_limits<M: Monitor>(
        &mut self,
        end_time: f64,
        limits: &RunLimits,
        monitor: &mut M,
    ) -> SimResult<Termination> {
        if !end_time.is_finite() || end_time < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "end time must be finite and non-negative, got {end_time}"
            )));
        }
        let termination = loop {
            if self.time > end_time {
                break Termination::EndTime;
            }
            if limits.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                break Termination::Cancelled;
            }
            if limits.max_steps.is_some_and(|max| self.steps >= max) {
                break Termination::StepLimit;
            }
            if let StepOutcome::Exhausted = self.step(monitor)? {
                break Termination::Exhausted;
            }
        };
        debug!(
            steps = self.steps,
            time = self.time,
            ?termination,
            "simulation finished"
        );
        Ok(termination)
    }
}

pub fn simulate<R: Rng>(network: &Network, end_time: f64, rng: R) -> SimResult<Trajectory> {
    let mut simulation = Simulation::new(network, rng)?;
    simulation.run(end_time, &mut NoopMonitor)?;
    Ok(simulation.into_trajectory())
}
