use std::sync::Arc;

use crate::error::{SimError, SimResult};
use crate::reaction::{Reaction, Term};
use crate::species::{SpeciesId, SpeciesTable, ENVIRONMENT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reactant {
    pub species: usize,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledReaction {
    pub rate_constant: f64,
    pub reactants: Vec<Reactant>,
    pub products: Vec<Reactant>,
    pub catalysts: Vec<Reactant>,
}

impl CompiledReaction {
    /// Whether every species index is valid for a state of `n_species`.
    pub fn fits(&self, n_species: usize) -> bool {
        self.reactants
            .iter()
            .chain(&self.products)
            .chain(&self.catalysts)
            .all(|r| r.species < n_species)
    }

    #[inline]
    pub(crate) fn is_satisfiable(&self, state: &[f64]) -> bool {
        self.reactants
            .iter()
            .chain(self.catalysts.iter())
            .all(|r| state[r.species] >= f64::from(r.count))
    }

    #[inline]
    pub(crate) fn apply(&self, state: &mut [f64]) {
        for reactant in &self.reactants {
            state[reactant.species] -= f64::from(reactant.count);
        }
        for product in &self.products {
            state[product.species] += f64::from(product.count);
        }
    }
}

#[derive(Clone, Debug)]
pub struct Network {
    table: SpeciesTable,
    names: Arc<[String]>,
    initial: Vec<f64>,
    reactions: Vec<CompiledReaction>,
    declarations: Vec<Reaction>,
}

impl Network {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    pub fn n_species(&self) -> usize {
        self.names.len()
    }

    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn species_names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn shared_names(&self) -> Arc<[String]> {
        Arc::clone(&self.names)
    }

    pub fn species_id(&self, name: &str) -> SimResult<SpeciesId> {
        self.table.id(name)
    }

    pub fn initial_table(&self) -> &SpeciesTable {
        &self.table
    }

    pub fn initial_amounts(&self) -> &[f64] {
        &self.initial
    }

    pub fn reactions(&self) -> &[CompiledReaction] {
        &self.reactions
    }

    pub fn declarations(&self) -> &[Reaction] {
        &self.declarations
    }

    pub fn with_initial_amount(&self, name: &str, amount: f64) -> SimResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "species '{name}' initial amount must be finite and non-negative, got {amount}"
            )));
        }
        let mut network = self.clone();
        let id = network.table.id(name)?;
        *network.table.get_mut(name)? = amount;
        network.initial[id.index()] = amount;
        Ok(network)
    }
}

#[derive(Debug, Default)]
pub struct NetworkBuilder {
    table: SpeciesTable,
    reactions: Vec<CompiledReaction>,
    declarations: Vec<Reaction>,
}

impl NetworkBuilder {
    pub fn species(&mut self, name: impl Into<String>, amount: f64) -> SimResult<SpeciesId> {
        self.table.insert(name, amount)
    }

    /// Adds a reaction and returns its index. Terms may only name declared
    /// species or the environment.
    pub fn reaction(&mut self, reaction: Reaction) -> SimResult<usize> {
        let idx = self.reactions.len();
        if !reaction.rate.is_finite() || reaction.rate <= 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "reaction {idx} ({reaction}) rate must be finite and positive"
            )));
        }
        let reactants = compile_terms(&self.table, &reaction.reactants, idx, "reactant")?;
        let products = compile_terms(&self.table, &reaction.products, idx, "product")?;
        let catalysts = compile_terms(&self.table, &reaction.catalysts, idx, "catalyst")?;
        self.reactions.push(CompiledReaction {
            rate_constant: reaction.rate,
            reactants,
            products,
            catalysts,
        });
        self.declarations.push(reaction);
        Ok(idx)
    }

    pub fn build(self) -> SimResult<Network> {
        let names: Arc<[String]> = self.table.names().map(str::to_string).collect();
        let initial = self.table.amounts();
        Ok(Network {
            table: self.table,
            names,
            initial,
            reactions: self.reactions,
            declarations: self.declarations,
        })
    }
}

/// Largest per-species count; propensities raise amounts to this power.
pub const MAX_STOICHIOMETRY: u32 = i32::MAX as u32;

fn compile_terms(
    table: &SpeciesTable,
    terms: &[Term],
    reaction_idx: usize,
    role: &str,
) -> SimResult<Vec<Reactant>> {
    let mut out: Vec<Reactant> = Vec::with_capacity(terms.len());
    for term in terms {
        if term.amount == 0 {
            return Err(SimError::InvalidArgument(format!(
                "reaction {reaction_idx} {role} '{}' must have a positive amount",
                term.species
            )));
        }
        if term.species == ENVIRONMENT {
            continue;
        }
        let species = table.id(&term.species)?.index();
        // Repeated names accumulate.
        let count = match out.iter_mut().find(|r| r.species == species) {
            Some(existing) => {
                existing.count = existing.count.saturating_add(term.amount);
                existing.count
            }
            None => {
                out.push(Reactant {
                    species,
                    count: term.amount,
                });
                term.amount
            }
        };
        if count > MAX_STOICHIOMETRY {
            return Err(SimError::InvalidArgument(format!(
                "reaction {reaction_idx} {role} '{}' amount {count} exceeds {MAX_STOICHIOMETRY}",
                term.species
            )));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_terms_are_summed() {
        let mut builder = Network::builder();
        builder.species("A", 10.0).unwrap();
        builder.species("B", 0.0).unwrap();
        builder
            .reaction(
                Reaction::new(1.0)
                    .reactant("A", 1)
                    .reactant("A", 2)
                    .product("B", 1),
            )
            .unwrap();
        let network = builder.build().unwrap();
        assert_eq!(
            network.reactions()[0].reactants,
            vec![Reactant {
                species: 0,
                count: 3
            }]
        );
    }

    #[test]
    fn environment_terms_are_dropped() {
        let mut builder = Network::builder();
        builder.species("M", 0.0).unwrap();
        builder
            .reaction(Reaction::new(2.0).reactant(ENVIRONMENT, 1).product("M", 1))
            .unwrap();
        builder
            .reaction(Reaction::new(1.0).reactant("M", 1).product(ENVIRONMENT, 1))
            .unwrap();
        let network = builder.build().unwrap();
        assert!(network.reactions()[0].reactants.is_empty());
        assert!(network.reactions()[1].products.is_empty());
        assert_eq!(network.n_species(), 1);
    }

    #[test]
    fn undeclared_species_are_rejected() {
        let mut builder = Network::builder();
        builder.species("A", 1.0).unwrap();
        let err = builder
            .reaction(Reaction::new(1.0).reactant("A", 1).product("Z", 1))
            .unwrap_err();
        assert!(matches!(err, SimError::UnknownSpecies(name) if name == "Z"));
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let mut builder = Network::builder();
        builder.species("A", 1.0).unwrap();
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = builder
                .reaction(Reaction::new(rate).reactant("A", 1))
                .unwrap_err();
            assert!(matches!(err, SimError::InvalidArgument(msg) if msg.contains("rate")));
        }
    }

    #[test]
    fn with_initial_amount_updates_table_and_vector() {
        let mut builder = Network::builder();
        builder.species("A", 1.0).unwrap();
        let network = builder.build().unwrap();
        let changed = network.with_initial_amount("A", 7.0).unwrap();
        assert_eq!(changed.initial_amounts(), &[7.0]);
        assert_eq!(changed.initial_table().get("A").unwrap(), 7.0);
        assert_eq!(network.initial_amounts(), &[1.0]);
    }
}
