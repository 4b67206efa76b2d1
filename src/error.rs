use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("species '{0}' is already defined")]
    DuplicateSpecies(String),
    #[error("species '{0}' was not found")]
    UnknownSpecies(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("snapshot at t={attempted} does not advance past t={previous}")]
    TimeNotIncreasing { previous: f64, attempted: f64 },
    #[error("no snapshot recorded at t={0}")]
    MissingTimestamp(f64),
    #[error("cannot interpolate across zero-length interval at t={time}")]
    DegenerateInterval { time: f64 },
    #[error("trajectories disagree on species: {0}")]
    SpeciesMismatch(String),
    #[error("empty trajectory: {0}")]
    EmptyTrajectory(String),
    #[error("thread pool error: {0}")]
    ThreadPool(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("replicate panicked: {0}")]
    ReplicatePanicked(String),
}
