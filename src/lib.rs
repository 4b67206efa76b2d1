pub mod config;
pub mod ensemble;
pub mod error;
pub mod export;
pub mod mean;
pub mod monitor;
pub mod network;
pub mod networks;
pub mod propensity;
pub mod reaction;
pub mod simulation;
pub mod species;
pub mod trajectory;

pub use config::RunConfig;
pub use ensemble::{
    derive_seed, run_replicates, run_replicates_with, Ensemble, EnsembleOptions, ReplicateFailure,
    ReplicateRun,
};
pub use error::{SimError, SimResult};
pub use mean::{compute_interpolated_value, compute_mean};
pub use monitor::{Monitor, NoopMonitor, PeakMonitor};
pub use network::{Network, NetworkBuilder};
pub use propensity::{compute_delay, Delay};
pub use reaction::{Reaction, Term};
pub use simulation::{
    simulate, CancellationToken, RunLimits, Simulation, StepOutcome, Termination,
};
pub use species::{Species, SpeciesId, SpeciesTable, ENVIRONMENT};
pub use trajectory::{SimulationState, Trajectory};
