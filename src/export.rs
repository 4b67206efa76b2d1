use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SimResult;
use crate::network::Network;
use crate::reaction::Term;
use crate::species::ENVIRONMENT;
use crate::trajectory::Trajectory;

/// Writes one row per snapshot: species amounts in table order, then the
/// timestamp. The header names the species followed by `time`.
pub fn write_csv<W: Write>(trajectory: &Trajectory, mut writer: W) -> SimResult<()> {
    for name in trajectory.species() {
        write!(writer, "{name},")?;
    }
    writeln!(writer, "time")?;
    for state in trajectory {
        for amount in state.amounts() {
            write!(writer, "{amount},")?;
        }
        writeln!(writer, "{}", state.time())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv(trajectory: &Trajectory, path: impl AsRef<Path>) -> SimResult<()> {
    let file = File::create(path)?;
    write_csv(trajectory, BufWriter::new(file))
}

fn edges_from<'a>(terms: &'a [Term]) -> impl Iterator<Item = &'a Term> + 'a {
    terms.iter().filter(|t| t.species != ENVIRONMENT)
}

pub fn write_dot<W: Write>(network: &Network, mut writer: W) -> SimResult<()> {
    writeln!(writer, "digraph {{")?;
    for (idx, name) in network.species_names().iter().enumerate() {
        writeln!(
            writer,
            "s{idx}[label=\"{name}\",shape=\"box\",style=\"filled\",fillcolor=\"cyan\"];"
        )?;
    }
    for (idx, reaction) in network.declarations().iter().enumerate() {
        writeln!(
            writer,
            "r{idx}[label=\"{}\",shape=\"oval\",style=\"filled\",fillcolor=\"yellow\"];",
            reaction.rate
        )?;
        for catalyst in edges_from(&reaction.catalysts) {
            let s = network.species_id(&catalyst.species)?.index();
            writeln!(writer, "s{s} -> r{idx} [arrowhead=\"tee\"];")?;
        }
        for reactant in edges_from(&reaction.reactants) {
            let s = network.species_id(&reactant.species)?.index();
            writeln!(writer, "s{s} -> r{idx};")?;
        }
        for product in edges_from(&reaction.products) {
            let s = network.species_id(&product.species)?.index();
            writeln!(writer, "r{idx} -> s{s};")?;
        }
    }
    writeln!(writer, "}}")?;
    writer.flush()?;
    Ok(())
}

pub fn save_dot(network: &Network, path: impl AsRef<Path>) -> SimResult<()> {
    let file = File::create(path)?;
    write_dot(network, BufWriter::new(file))
}
