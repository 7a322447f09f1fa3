use std::path::{Path, PathBuf};

use clap::{Args, Command, FromArgMatches as _};
use log::info;

use crate::define_rng;
use crate::error::EpiError;
use crate::log::parse_log_level_spec;
use crate::parameters::Parameters;
use crate::random::RngStore;
use crate::report::{ReportWriter, SimulationLog};
use crate::simulator::Simulator;

define_rng!(SeedingRng);

/// File name of the daily log inside `--output-dir`.
pub const DAILY_LOG_FILE: &str = "daily_log.csv";

/// Default cli arguments for the simulation runner
#[derive(Args, Debug, Clone, PartialEq)]
pub struct BaseArgs {
    /// Random seed. Overrides the seed in the config file
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Optional directory for the daily log CSV
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of days to simulate
    #[arg(short, long, default_value_t = 100)]
    pub days: u32,

    /// Number of runs, using consecutive seeds starting from the random seed
    #[arg(short = 'n', long, default_value_t = 1)]
    pub runs: u32,

    /// Number of individuals infected before the first day
    #[arg(short, long, default_value_t = 0)]
    pub initial_infections: usize,

    /// Log level, e.g. `info` or `warn,campus_epi::simulator=trace`
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Default for BaseArgs {
    fn default() -> Self {
        BaseArgs {
            random_seed: None,
            config: None,
            output_dir: None,
            days: 100,
            runs: 1,
            initial_infections: 0,
            log_level: None,
        }
    }
}

fn create_cli() -> Command {
    let cli = Command::new("campus-epi")
        .about("Simulates disease spread, testing and isolation on a contact network");
    BaseArgs::augment_args(cli)
}

/// Runs the simulation with arguments parsed from the command line.
///
/// `setup_fn` is called after every reset, before the first simulated day of each run.
///
/// # Errors
/// Returns an error if argument parsing, configuration, the setup function, or writing the log
/// fails.
pub fn run_with_args<F>(setup_fn: F) -> Result<Vec<SimulationLog>, Box<dyn std::error::Error>>
where
    F: Fn(&mut Simulator, &BaseArgs) -> Result<(), EpiError>,
{
    let matches = create_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    Ok(run_with_args_internal(&args, setup_fn)?)
}

pub(crate) fn run_with_args_internal<F>(
    args: &BaseArgs,
    setup_fn: F,
) -> Result<Vec<SimulationLog>, EpiError>
where
    F: Fn(&mut Simulator, &BaseArgs) -> Result<(), EpiError>,
{
    if let Some(spec) = &args.log_level {
        parse_log_level_spec(spec)?.apply();
    }

    let mut parameters = match &args.config {
        Some(path) => {
            info!("loading parameters from {}", path.display());
            Parameters::load_from_json(path)?
        }
        None => Parameters::default(),
    };
    if let Some(seed) = args.random_seed {
        parameters.seed = seed;
    }
    if args.initial_infections > parameters.population_size {
        return Err(EpiError::invalid_parameter(
            "initial_infections",
            format!(
                "{} initial infections requested for a population of {}",
                args.initial_infections, parameters.population_size
            ),
        ));
    }

    let first_seed = parameters.seed;
    let individual = parameters.individual.clone();
    let mut simulator = Simulator::new(parameters)?;
    let mut logs = Vec::new();
    for run in 0..args.runs {
        let seed = first_seed.wrapping_add(u64::from(run));
        simulator.reset(seed, individual.clone())?;
        seed_infections(&mut simulator, args.initial_infections)?;
        setup_fn(&mut simulator, args)?;

        simulator.run(args.days);
        println!(
            "seed {}: {} days, {} infections, {} tests",
            seed,
            simulator.current_day(),
            simulator.cumulative_infections(),
            simulator.cumulative_tests()
        );
        logs.push(simulator.log().clone());
    }

    if let Some(output_dir) = &args.output_dir {
        write_logs(&output_dir.join(DAILY_LOG_FILE), &logs)?;
    }
    Ok(logs)
}

/// Infects `count` distinct individuals chosen uniformly at random. Uses its own generator so
/// that the disease draws of the run are unaffected.
fn seed_infections(simulator: &mut Simulator, count: usize) -> Result<(), EpiError> {
    let population_size = simulator.individuals().len();
    let rngs = RngStore::new(simulator.seed());
    let mut infected = 0;
    while infected < count {
        let id = rngs.sample_range(SeedingRng, 0..population_size);
        if simulator.individuals()[id].is_susceptible() {
            simulator.force_infect(id)?;
            infected += 1;
        }
    }
    Ok(())
}

fn write_logs(path: &Path, logs: &[SimulationLog]) -> Result<(), EpiError> {
    info!("writing daily log to {}", path.display());
    let mut writer = ReportWriter::create(path)?;
    for log in logs {
        writer.write_log(log)?;
    }
    writer.flush()
}
