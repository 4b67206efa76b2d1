// Runs one of the bundled networks as a replicate batch and writes CSV output.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ssa_vessel::export::{save_csv, save_dot};
use ssa_vessel::monitor::PeakMonitor;
use ssa_vessel::{networks, run_replicates_with, Network, RunConfig, Simulation};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Example {
    Seihr,
    Introduction,
    Circadian,
    CircadianCatalysts,
}

#[derive(Parser)]
#[command(name = "ssa-vessel")]
#[command(about = "Stochastic simulation of reaction networks", long_about = None)]
struct Cli {
    /// Network to simulate
    #[arg(short, long, value_enum)]
    network: Example,

    /// TOML run configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Population size for the epidemic network
    #[arg(long, default_value_t = 10_000)]
    population: u32,

    /// Where to write the mean (or single) trajectory
    #[arg(short, long, default_value = "trajectory.csv")]
    output: PathBuf,

    /// Directory receiving one CSV per successful replicate
    #[arg(long)]
    replicate_dir: Option<PathBuf>,

    /// Write the network as a Graphviz dot file
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_network(cli: &Cli) -> Result<Network> {
    let network = match cli.network {
        Example::Seihr => networks::seihr(cli.population)?,
        Example::Introduction => networks::introduction(100, 100, 2, 0.001)?,
        Example::Circadian => networks::circadian_oscillator()?,
        Example::CircadianCatalysts => networks::circadian_oscillator_catalysts()?,
    };
    Ok(network)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = RunConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let network = build_network(&cli)?;
    info!(
        species = network.n_species(),
        reactions = network.n_reactions(),
        replicates = config.replicates,
        end_time = config.end_time,
        "network ready"
    );

    if let Some(path) = &cli.dot {
        save_dot(&network, path).with_context(|| format!("writing {}", path.display()))?;
    }

    if let Example::Seihr = cli.network {
        report_hospital_peak(&network, &config)?;
    }

    let ensemble = run_replicates_with(
        &network,
        config.end_time,
        config.replicates,
        &config.ensemble_options(),
    )?;
    for failure in ensemble.failures() {
        warn!("{failure}");
    }
    if ensemble.runs().next().is_none() {
        bail!("all {} replicates failed", ensemble.len());
    }

    if let Some(dir) = &cli.replicate_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        for run in ensemble.runs() {
            let path = dir.join(format!("replicate_{}.csv", run.replicate));
            save_csv(&run.trajectory, &path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }

    let trajectory = if config.replicates == 1 {
        ensemble
            .into_trajectories()
            .into_iter()
            .next()
            .context("single replicate produced no trajectory")?
    } else {
        ensemble.mean()?
    };
    save_csv(&trajectory, &cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(
        points = trajectory.len(),
        path = %cli.output.display(),
        "trajectory written"
    );
    Ok(())
}

/// Single seeded run of the epidemic that tracks peak hospitalisation.
fn report_hospital_peak(network: &Network, config: &RunConfig) -> Result<()> {
    use rand::SeedableRng;

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut peak = PeakMonitor::new(network, "H")?;
    let mut simulation = Simulation::new(network, rand_chacha::ChaCha8Rng::seed_from_u64(seed))?;
    simulation.run(config.end_time, &mut peak)?;
    if let (Some(amount), Some(time)) = (peak.peak_amount(), peak.peak_time()) {
        info!(amount, time, seed, "peak hospitalised");
    }
    Ok(())
}
