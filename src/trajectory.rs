use std::sync::Arc;

use crate::error::{SimError, SimResult};
use crate::species::{SpeciesId, SpeciesTable};

/// Amounts of every species at one instant. Indexed by [`SpeciesId`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    time: f64,
    amounts: Vec<f64>,
}

impl SimulationState {
    pub fn new(time: f64, amounts: Vec<f64>) -> Self {
        Self { time, amounts }
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }

    #[inline]
    pub fn amount(&self, species: SpeciesId) -> f64 {
        self.amounts[species.index()]
    }

    pub(crate) fn advanced_to(&self, time: f64) -> Self {
        Self {
            time,
            amounts: self.amounts.clone(),
        }
    }

    pub(crate) fn amounts_mut(&mut self) -> &mut [f64] {
        &mut self.amounts
    }
}

#[derive(Clone, Debug)]
pub struct Trajectory {
    species: Arc<[String]>,
    points: Vec<SimulationState>,
    max_time: f64,
}

impl Trajectory {
    pub fn new(species: Arc<[String]>) -> Self {
        Self {
            species,
            points: Vec::new(),
            max_time: 0.0,
        }
    }

    pub fn with_capacity(species: Arc<[String]>, capacity: usize) -> Self {
        Self {
            species,
            points: Vec::with_capacity(capacity),
            max_time: 0.0,
        }
    }

    pub fn insert(&mut self, state: SimulationState) -> SimResult<()> {
        if state.amounts.len() != self.species.len() {
            return Err(SimError::SpeciesMismatch(format!(
                "snapshot carries {} amounts for {} species",
                state.amounts.len(),
                self.species.len()
            )));
        }
        if !state.time.is_finite() {
            return Err(SimError::InvalidArgument(format!(
                "snapshot time must be finite, got {}",
                state.time
            )));
        }
        if let Some(last) = self.points.last() {
            if state.time <= last.time {
                return Err(SimError::TimeNotIncreasing {
                    previous: last.time,
                    attempted: state.time,
                });
            }
        }
        self.max_time = state.time;
        self.points.push(state);
        Ok(())
    }

    pub fn at(&self, time: f64) -> SimResult<&SimulationState> {
        self.points
            .binary_search_by(|p| p.time.total_cmp(&time))
            .map(|idx| &self.points[idx])
            .map_err(|_| SimError::MissingTimestamp(time))
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub(crate) fn shared_species(&self) -> Arc<[String]> {
        Arc::clone(&self.species)
    }

    pub fn species_id(&self, name: &str) -> SimResult<SpeciesId> {
        self.species
            .iter()
            .position(|s| s == name)
            .map(SpeciesId)
            .ok_or_else(|| SimError::UnknownSpecies(name.to_string()))
    }

    pub fn points(&self) -> &[SimulationState] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationState> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&SimulationState> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SimulationState> {
        self.points.last()
    }

    pub fn series(&self, species: SpeciesId) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(move |p| (p.time, p.amount(species)))
    }

    pub fn table_at(&self, index: usize) -> SimResult<SpeciesTable> {
        let state = self.points.get(index).ok_or_else(|| {
            SimError::InvalidArgument(format!(
                "snapshot index {index} out of range for {} points",
                self.points.len()
            ))
        })?;
        let mut table = SpeciesTable::new();
        for (name, &amount) in self.species.iter().zip(state.amounts.iter()) {
            table.insert(name.clone(), amount)?;
        }
        Ok(table)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a SimulationState;
    type IntoIter = std::slice::Iter<'a, SimulationState>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Arc<[String]> {
        vec!["A".to_string(), "B".to_string()].into()
    }

    #[test]
    fn insert_tracks_max_time_and_lookup() {
        let mut trajectory = Trajectory::new(names());
        trajectory
            .insert(SimulationState::new(0.0, vec![1.0, 0.0]))
            .unwrap();
        trajectory
            .insert(SimulationState::new(0.75, vec![0.0, 1.0]))
            .unwrap();
        assert_eq!(trajectory.max_time(), 0.75);
        assert_eq!(trajectory.at(0.75).unwrap().amounts(), &[0.0, 1.0]);
        assert!(matches!(
            trajectory.at(0.5),
            Err(SimError::MissingTimestamp(t)) if t == 0.5
        ));
    }

    #[test]
    fn repeated_or_earlier_timestamps_are_rejected() {
        let mut trajectory = Trajectory::new(names());
        trajectory
            .insert(SimulationState::new(1.0, vec![1.0, 0.0]))
            .unwrap();
        for t in [1.0, 0.5] {
            let err = trajectory
                .insert(SimulationState::new(t, vec![9.0, 9.0]))
                .unwrap_err();
            assert!(matches!(err, SimError::TimeNotIncreasing { .. }));
        }
        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory.at(1.0).unwrap().amounts(), &[1.0, 0.0]);
    }

    #[test]
    fn snapshots_must_match_species_count() {
        let mut trajectory = Trajectory::new(names());
        let err = trajectory
            .insert(SimulationState::new(0.0, vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, SimError::SpeciesMismatch(_)));
    }

    #[test]
    fn table_at_restores_names() {
        let mut trajectory = Trajectory::new(names());
        trajectory
            .insert(SimulationState::new(0.0, vec![3.0, 4.0]))
            .unwrap();
        let table = trajectory.table_at(0).unwrap();
        assert_eq!(table.get("B").unwrap(), 4.0);
        assert_eq!(trajectory.species_id("B").unwrap().index(), 1);
    }
}
