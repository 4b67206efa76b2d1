use crate::error::{SimError, SimResult};
use crate::species::SpeciesId;
use crate::trajectory::{SimulationState, Trajectory};

pub fn compute_interpolated_value(
    s0: &SimulationState,
    s1: &SimulationState,
    species: SpeciesId,
    time: f64,
) -> SimResult<f64> {
    let span = s1.time() - s0.time();
    if span == 0.0 {
        return Err(SimError::DegenerateInterval { time });
    }
    let a0 = s0.amount(species);
    let a1 = s1.amount(species);
    Ok(a0 + ((a1 - a0) / span) * (time - s0.time()))
}

pub fn sampling_grid(step: f64, upper_bound: f64) -> SimResult<Vec<f64>> {
    if !upper_bound.is_finite() || upper_bound < 0.0 {
        return Err(SimError::InvalidArgument(format!(
            "grid upper bound must be finite and non-negative, got {upper_bound}"
        )));
    }
    if upper_bound == 0.0 {
        return Ok(vec![0.0]);
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(SimError::InvalidArgument(format!(
            "grid spacing must be positive and finite, got {step}"
        )));
    }
    let last = (upper_bound / step).floor() as usize;
    Ok((0..=last).map(|i| (i as f64 * step).min(upper_bound)).collect())
}

fn accumulate_resampled(
    trajectory: &Trajectory,
    grid: &[f64],
    sums: &mut [f64],
) -> SimResult<()> {
    let points = trajectory.points();
    let n_species = trajectory.species().len();
    let mut cursor = 0usize;
    for (row, &t) in sums.chunks_exact_mut(n_species).zip(grid) {
        while cursor + 1 < points.len() && points[cursor + 1].time() <= t {
            cursor += 1;
        }
        let s0 = &points[cursor];
        if t < s0.time() {
            return Err(SimError::InvalidArgument(format!(
                "grid point t={t} precedes the first snapshot at t={}",
                s0.time()
            )));
        }
        if s0.time() == t {
            for (acc, &amount) in row.iter_mut().zip(s0.amounts()) {
                *acc += amount;
            }
            continue;
        }
        let s1 = points.get(cursor + 1).ok_or_else(|| {
            SimError::InvalidArgument(format!(
                "grid point t={t} lies past the last snapshot at t={}",
                s0.time()
            ))
        })?;
        for (species, acc) in row.iter_mut().enumerate() {
            *acc += compute_interpolated_value(s0, s1, SpeciesId(species), t)?;
        }
    }
    Ok(())
}

pub fn compute_mean<'a, I>(trajectories: I) -> SimResult<Trajectory>
where
    I: IntoIterator<Item = &'a Trajectory>,
{
    let trajectories: Vec<&Trajectory> = trajectories.into_iter().collect();
    let first = *trajectories
        .first()
        .ok_or_else(|| SimError::EmptyTrajectory("no trajectories to average".into()))?;

    let mut upper_bound = f64::INFINITY;
    for (idx, trajectory) in trajectories.iter().enumerate() {
        if trajectory.is_empty() {
            return Err(SimError::EmptyTrajectory(format!(
                "trajectory {idx} has no snapshots"
            )));
        }
        if trajectory.species() != first.species() {
            return Err(SimError::SpeciesMismatch(format!(
                "trajectory {idx} tracks {:?}, expected {:?}",
                trajectory.species(),
                first.species()
            )));
        }
        upper_bound = upper_bound.min(trajectory.max_time());
    }

    let average_delay = first.max_time() / first.len() as f64;
    let grid = sampling_grid(average_delay, upper_bound)?;
    let n_species = first.species().len();

    let mut mean = Trajectory::with_capacity(first.shared_species(), grid.len());
    if n_species == 0 {
        for &t in &grid {
            mean.insert(SimulationState::new(t, Vec::new()))?;
        }
        return Ok(mean);
    }

    let mut sums = vec![0.0; grid.len() * n_species];
    for trajectory in &trajectories {
        accumulate_resampled(trajectory, &grid, &mut sums)?;
    }

    let count = trajectories.len() as f64;
    for (&t, row) in grid.iter().zip(sums.chunks_exact(n_species)) {
        let amounts = row.iter().map(|sum| sum / count).collect();
        mean.insert(SimulationState::new(t, amounts))?;
    }
    Ok(mean)
}
