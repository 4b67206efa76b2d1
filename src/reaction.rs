use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub species: String,
    pub amount: u32,
}

impl Term {
    pub fn new(species: impl Into<String>, amount: u32) -> Self {
        Self {
            species: species.into(),
            amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    pub reactants: Vec<Term>,
    pub products: Vec<Term>,
    pub catalysts: Vec<Term>,
    pub rate: f64,
}

impl Reaction {
    pub fn new(rate: f64) -> Self {
        Self {
            reactants: Vec::new(),
            products: Vec::new(),
            catalysts: Vec::new(),
            rate,
        }
    }

    pub fn reactant(mut self, species: impl Into<String>, amount: u32) -> Self {
        self.reactants.push(Term::new(species, amount));
        self
    }

    pub fn product(mut self, species: impl Into<String>, amount: u32) -> Self {
        self.products.push(Term::new(species, amount));
        self
    }

    pub fn catalyst(mut self, species: impl Into<String>, amount: u32) -> Self {
        self.catalysts.push(Term::new(species, amount));
        self
    }
}

fn write_terms(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    if terms.is_empty() {
        return f.write_str("0");
    }
    for (idx, term) in terms.iter().enumerate() {
        if idx > 0 {
            f.write_str(" + ")?;
        }
        if term.amount != 1 {
            write!(f, "{}*", term.amount)?;
        }
        f.write_str(&term.species)?;
    }
    Ok(())
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_terms(f, &self.reactants)?;
        f.write_str(" -> ")?;
        write_terms(f, &self.products)?;
        if !self.catalysts.is_empty() {
            f.write_str(" | ")?;
            write_terms(f, &self.catalysts)?;
        }
        write!(f, " @ {}", self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_all_terms() {
        let reaction = Reaction::new(0.5)
            .reactant("A", 1)
            .reactant("B", 2)
            .product("C", 1)
            .catalyst("D", 1);
        assert_eq!(reaction.to_string(), "A + 2*B -> C | D @ 0.5");
    }

    #[test]
    fn display_marks_empty_sides() {
        let reaction = Reaction::new(2.0).product("M", 1);
        assert_eq!(reaction.to_string(), "0 -> M @ 2");
    }
}
