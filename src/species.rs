use indexmap::IndexMap;

use crate::error::{SimError, SimResult};

/// Name of the unconstrained source/sink. Its quantity is never checked or
/// decremented, so it never appears in a species table.
pub const ENVIRONMENT: &str = "__env__";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub(crate) usize);

impl SpeciesId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Species {
    pub name: String,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeciesTable {
    entries: IndexMap<String, f64>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, amount: f64) -> SimResult<SpeciesId> {
        let name = name.into();
        if name == ENVIRONMENT {
            return Err(SimError::InvalidArgument(format!(
                "'{ENVIRONMENT}' is reserved for the environment and cannot hold an amount"
            )));
        }
        if name.is_empty() {
            return Err(SimError::InvalidArgument(
                "species name must not be empty".into(),
            ));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "species '{name}' initial amount must be finite and non-negative, got {amount}"
            )));
        }
        if self.entries.contains_key(&name) {
            return Err(SimError::DuplicateSpecies(name));
        }
        let (idx, _) = self.entries.insert_full(name, amount);
        Ok(SpeciesId(idx))
    }

    pub fn id(&self, name: &str) -> SimResult<SpeciesId> {
        self.entries
            .get_index_of(name)
            .map(SpeciesId)
            .ok_or_else(|| SimError::UnknownSpecies(name.to_string()))
    }

    pub fn get(&self, name: &str) -> SimResult<f64> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownSpecies(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> SimResult<&mut f64> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| SimError::UnknownSpecies(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Species> + '_ {
        self.entries.iter().map(|(name, &amount)| Species {
            name: name.clone(),
            amount,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.entries.values().copied().collect()
    }
}
