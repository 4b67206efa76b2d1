//! Waiting-time sampling for a single reaction.
//!
//! Random draw contract: a reaction whose reactants or catalysts include a
//! species at zero consumes no draw. Every other reaction consumes exactly one
//! `f64` from the open interval (0, 1) and turns it into an exponential
//! waiting time by inversion. Replicates started from the same seed therefore
//! reproduce bit for bit.

use rand::distributions::Open01;
use rand::Rng;

use crate::error::{SimError, SimResult};
use crate::network::{CompiledReaction, Reactant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Delay {
    Active(f64),
    Inactive,
}

impl Delay {
    pub fn value(self) -> Option<f64> {
        match self {
            Delay::Active(delay) => Some(delay),
            Delay::Inactive => None,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Delay::Active(_))
    }
}

/// Product of `amount^count` over `terms`, or zero as soon as any amount is
/// exhausted.
#[inline]
pub(crate) fn combinatorial_factor(terms: &[Reactant], state: &[f64]) -> f64 {
    let mut factor = 1.0;
    for term in terms {
        let available = state[term.species];
        if available <= 0.0 {
            return 0.0;
        }
        factor *= available.powi(i32::try_from(term.count).unwrap_or(i32::MAX));
    }
    factor
}

impl CompiledReaction {
    #[inline]
    pub(crate) fn propensity(&self, state: &[f64]) -> f64 {
        let reactant_factor = combinatorial_factor(&self.reactants, state);
        if reactant_factor == 0.0 {
            return 0.0;
        }
        let catalyst_factor = combinatorial_factor(&self.catalysts, state);
        self.rate_constant * reactant_factor * catalyst_factor
    }
}

pub fn compute_delay<R: Rng + ?Sized>(
    reaction: &CompiledReaction,
    state: &[f64],
    rng: &mut R,
) -> SimResult<Delay> {
    if !reaction.fits(state.len()) {
        return Err(SimError::SpeciesMismatch(format!(
            "reaction references species outside a state of {} amounts",
            state.len()
        )));
    }
    let k = reaction.propensity(state);
    if !k.is_finite() {
        return Err(SimError::InvalidArgument(format!(
            "propensity overflowed to {k} (rate {})",
            reaction.rate_constant
        )));
    }
    if k <= 0.0 {
        return Ok(Delay::Inactive);
    }
    let u: f64 = rng.sample(Open01);
    Ok(Delay::Active(-u.ln() / k))
}
