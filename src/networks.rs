use crate::error::SimResult;
use crate::network::Network;
use crate::reaction::Reaction;
use crate::species::ENVIRONMENT;

/// Susceptible-Exposed-Infectious-Hospitalised-Removed epidemic over a
/// population of `n`. Infection is `S -> E` catalysed by `I`.
pub fn seihr(n: u32) -> SimResult<Network> {
    let population = f64::from(n);
    let eps = 0.0009; // initial fraction of infectious
    let i0 = (eps * population).round();
    let e0 = (eps * population * 15.0).round();
    let s0 = population - i0 - e0;
    let r0 = 2.4; // basic reproductive number
    let alpha = 1.0 / 5.1; // incubation rate, ~5.1 days
    let gamma = 1.0 / 3.1; // recovery rate, ~3.1 days
    let beta = r0 * gamma;
    let p_h = 0.9e-3; // probability of hospitalisation
    let kappa = gamma * p_h * (1.0 - p_h);
    let tau = 1.0 / 10.12; // recovery/death rate in hospital, ~10.12 days

    let mut b = Network::builder();
    b.species("S", s0)?;
    b.species("E", e0)?;
    b.species("I", i0)?;
    b.species("H", 0.0)?;
    b.species("R", 0.0)?;

    b.reaction(
        Reaction::new(beta / population)
            .reactant("S", 1)
            .product("E", 1)
            .catalyst("I", 1),
    )?;
    b.reaction(Reaction::new(alpha).reactant("E", 1).product("I", 1))?;
    b.reaction(Reaction::new(gamma).reactant("I", 1).product("R", 1))?;
    b.reaction(Reaction::new(kappa).reactant("I", 1).product("H", 1))?;
    b.reaction(Reaction::new(tau).reactant("H", 1).product("R", 1))?;
    b.build()
}

/// `A + 2B -> C`, catalysed by `D`.
pub fn introduction(a: u32, b_amount: u32, d: u32, lambda: f64) -> SimResult<Network> {
    let mut b = Network::builder();
    b.species("A", f64::from(a))?;
    b.species("B", f64::from(b_amount))?;
    b.species("C", 0.0)?;
    b.species("D", f64::from(d))?;
    b.reaction(
        Reaction::new(lambda)
            .reactant("A", 1)
            .reactant("B", 2)
            .product("C", 1)
            .catalyst("D", 1),
    )?;
    b.build()
}

struct OscillatorRates {
    alpha_a: f64,
    alpha_a_bound: f64,
    alpha_r: f64,
    alpha_r_bound: f64,
    beta_a: f64,
    beta_r: f64,
    gamma_a: f64,
    gamma_r: f64,
    gamma_c: f64,
    delta_a: f64,
    delta_r: f64,
    delta_ma: f64,
    delta_mr: f64,
    theta_a: f64,
    theta_r: f64,
}

const OSCILLATOR: OscillatorRates = OscillatorRates {
    alpha_a: 50.0,
    alpha_a_bound: 500.0,
    alpha_r: 0.01,
    alpha_r_bound: 50.0,
    beta_a: 50.0,
    beta_r: 5.0,
    gamma_a: 1.0,
    gamma_r: 1.0,
    gamma_c: 2.0,
    delta_a: 1.0,
    delta_r: 0.2,
    delta_ma: 10.0,
    delta_mr: 0.5,
    theta_a: 50.0,
    theta_r: 100.0,
};

fn oscillator_species() -> SimResult<crate::network::NetworkBuilder> {
    let mut b = Network::builder();
    b.species("DA", 1.0)?;
    b.species("D_A", 0.0)?;
    b.species("DR", 1.0)?;
    b.species("D_R", 0.0)?;
    b.species("MA", 0.0)?;
    b.species("MR", 0.0)?;
    b.species("A", 0.0)?;
    b.species("R", 0.0)?;
    b.species("C", 0.0)?;
    Ok(b)
}

fn rx(rate: f64, from: &[&str], to: &[&str]) -> Reaction {
    let reaction = from
        .iter()
        .fold(Reaction::new(rate), |r, name| r.reactant(*name, 1));
    to.iter().fold(reaction, |r, name| r.product(*name, 1))
}

/// Vilar et al. circadian oscillator, transcription written out as
/// self-regenerating reactions.
pub fn circadian_oscillator() -> SimResult<Network> {
    let k = OSCILLATOR;
    let mut b = oscillator_species()?;
    b.reaction(rx(k.gamma_a, &["A", "DA"], &["D_A"]))?;
    b.reaction(rx(k.theta_a, &["D_A"], &["DA", "A"]))?;
    b.reaction(rx(k.gamma_r, &["A", "DR"], &["D_R"]))?;
    b.reaction(rx(k.theta_r, &["D_R"], &["DR", "A"]))?;
    b.reaction(rx(k.alpha_a_bound, &["D_A"], &["MA", "D_A"]))?;
    b.reaction(rx(k.alpha_a, &["DA"], &["MA", "DA"]))?;
    b.reaction(rx(k.alpha_r_bound, &["D_R"], &["MR", "D_R"]))?;
    b.reaction(rx(k.alpha_r, &["DR"], &["MR", "DR"]))?;
    b.reaction(rx(k.beta_a, &["MA"], &["MA", "A"]))?;
    b.reaction(rx(k.beta_r, &["MR"], &["MR", "R"]))?;
    b.reaction(rx(k.gamma_c, &["A", "R"], &["C"]))?;
    b.reaction(rx(k.delta_a, &["C"], &["R"]))?;
    b.reaction(rx(k.delta_a, &["A"], &[ENVIRONMENT]))?;
    b.reaction(rx(k.delta_r, &["R"], &[ENVIRONMENT]))?;
    b.reaction(rx(k.delta_ma, &["MA"], &[ENVIRONMENT]))?;
    b.reaction(rx(k.delta_mr, &["MR"], &[ENVIRONMENT]))?;
    b.build()
}

/// Same oscillator with transcription and translation drawn from the
/// environment and gated by catalysts.
pub fn circadian_oscillator_catalysts() -> SimResult<Network> {
    let k = OSCILLATOR;
    let mut b = oscillator_species()?;
    b.reaction(rx(k.gamma_a, &["A", "DA"], &["D_A"]))?;
    b.reaction(rx(k.theta_a, &["D_A"], &["DA", "A"]))?;
    b.reaction(rx(k.gamma_r, &["DR", "A"], &["D_R"]))?;
    b.reaction(rx(k.theta_r, &["D_R"], &["DR", "A"]))?;
    b.reaction(rx(k.alpha_a_bound, &[ENVIRONMENT], &["MA"]).catalyst("D_A", 1))?;
    b.reaction(rx(k.alpha_a, &[ENVIRONMENT], &["MA"]).catalyst("DA", 1))?;
    b.reaction(rx(k.alpha_r_bound, &[ENVIRONMENT], &["MR"]).catalyst("D_R", 1))?;
    b.reaction(rx(k.alpha_r, &[ENVIRONMENT], &["MR"]).catalyst("DR", 1))?;
    b.reaction(rx(k.beta_a, &[ENVIRONMENT], &["A"]).catalyst("MA", 1))?;
    b.reaction(rx(k.beta_r, &[ENVIRONMENT], &["R"]).catalyst("MR", 1))?;
    b.reaction(rx(k.gamma_c, &["A", "R"], &["C"]))?;
    b.reaction(rx(k.delta_a, &["C"], &["R"]))?;
    b.reaction(rx(k.delta_a, &["A"], &[ENVIRONMENT]))?;
    b.reaction(rx(k.delta_r, &["R"], &[ENVIRONMENT]))?;
    b.reaction(rx(k.delta_ma, &["MA"], &[ENVIRONMENT]))?;
    b.reaction(rx(k.delta_mr, &["MR"], &[ENVIRONMENT]))?;
    b.build()
}
