use crate::error::SimResult;
use crate::network::Network;
use crate::species::SpeciesId;
use crate::trajectory::SimulationState;

/// Observer invoked once per accepted step with the freshly recorded
/// snapshot. Monitors see the state but cannot alter the run.
pub trait Monitor {
    fn observe(&mut self, state: &SimulationState);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMonitor;

impl Monitor for NoopMonitor {
    #[inline]
    fn observe(&mut self, _state: &SimulationState) {}
}

impl<F> Monitor for F
where
    F: FnMut(&SimulationState),
{
    #[inline]
    fn observe(&mut self, state: &SimulationState) {
        self(state)
    }
}

/// Tracks the largest amount one species reaches and when it first got there.
#[derive(Clone, Debug)]
pub struct PeakMonitor {
    species: SpeciesId,
    peak: Option<(f64, f64)>,
}

impl PeakMonitor {
    pub fn new(network: &Network, species: &str) -> SimResult<Self> {
        Ok(Self {
            species: network.species_id(species)?,
            peak: None,
        })
    }

    pub fn peak_amount(&self) -> Option<f64> {
        self.peak.map(|(amount, _)| amount)
    }

    pub fn peak_time(&self) -> Option<f64> {
        self.peak.map(|(_, time)| time)
    }
}

impl Monitor for PeakMonitor {
    fn observe(&mut self, state: &SimulationState) {
        // Snapshots from a smaller network carry no amount for this species.
        let Some(&amount) = state.amounts().get(self.species.index()) else {
            return;
        };
        match self.peak {
            Some((best, _)) if best >= amount => {}
            _ => self.peak = Some((amount, state.time())),
        }
    }
}
