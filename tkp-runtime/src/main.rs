use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, path::PathBuf, time::Instant};
use tkp_algorithms::temporal_knapsack::lahc::{Params, Solver};
use tkp_challenges::temporal_knapsack::{Challenge, Solution, Track};
use tkp_utils::{compress_obj, dejsonify, jsonify, load_json_map, read_json_arg};
use tracing_subscriber::EnvFilter;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutputData {
    pub objective: i64,
    pub initial_objective: i64,
    pub items: Vec<usize>,
    pub runtime_ms: u128,
    pub params: Params,
}

fn cli() -> Command {
    Command::new("tkp-runtime")
        .about("Solves, verifies and generates Temporal Knapsack instances")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compute_solution")
                .about("Computes a solution with Late Acceptance Hill Climbing")
                .arg(
                    arg!(<INSTANCE> "Path to an instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--strategy [STRATEGY] "Initial solution strategy: greedy or random")
                        .value_parser(["greedy", "random"]),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for the random strategy")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--history [HISTORY] "Late acceptance history length")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--iterations [ITERATIONS] "Number of neighborhood sweeps")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the output data will be saved to this file path (default json)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress [COMPRESS] "If output file is set, the output data will be compressed as zlib")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Verifies a solution")
                .arg(
                    arg!(<INSTANCE> "Path to an instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("generate_instance")
                .about("Generates a random instance in the instance file format")
                .arg(arg!(<SEED> "Seed value").value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(--bids [BIDS] "Number of bids")
                        .default_value("100")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--horizon [HORIZON] "Number of time units")
                        .default_value("50")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--capacity [CAPACITY] "Shared resource capacity")
                        .default_value("100")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--"max-price" [MAX_PRICE] "Largest bid price")
                        .default_value("1000")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--"max-demand" [MAX_DEMAND] "Largest bid demand")
                        .default_value("40")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--"max-duration" [MAX_DURATION] "Longest bid interval")
                        .default_value("10")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the instance will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("benchmark")
                .about("Solves every instance for every iteration count and prints a csv table")
                .arg(
                    arg!(<INSTANCES> "Paths to instance files")
                        .num_args(1..)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--iterations [ITERATIONS] "Comma separated iteration counts")
                        .num_args(1..)
                        .value_delimiter(',')
                        .default_values([
                            "50", "100", "150", "200", "250", "300", "350", "400", "450", "500",
                        ])
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    init_tracing();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("compute_solution", sub_m)) => compute_solution(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("hyperparameters").cloned(),
            sub_m.get_one::<String>("strategy").cloned(),
            sub_m.get_one::<u64>("seed").cloned(),
            sub_m.get_one::<u64>("history").cloned(),
            sub_m.get_one::<u64>("iterations").cloned(),
            sub_m.get_one::<PathBuf>("output").cloned(),
            *sub_m.get_one::<bool>("compress").unwrap(),
        ),
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
        ),
        Some(("generate_instance", sub_m)) => generate_instance(
            *sub_m.get_one::<u64>("SEED").unwrap(),
            Track {
                num_bids: *sub_m.get_one::<usize>("bids").unwrap(),
                horizon: *sub_m.get_one::<u32>("horizon").unwrap(),
                capacity: *sub_m.get_one::<u32>("capacity").unwrap(),
                max_price: *sub_m.get_one::<u32>("max-price").unwrap(),
                max_demand: *sub_m.get_one::<u32>("max-demand").unwrap(),
                max_duration: *sub_m.get_one::<u32>("max-duration").unwrap(),
            },
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("benchmark", sub_m)) => benchmark(
            sub_m
                .get_many::<PathBuf>("INSTANCES")
                .unwrap()
                .cloned()
                .collect(),
            sub_m
                .get_many::<u64>("iterations")
                .unwrap()
                .cloned()
                .collect(),
            sub_m.get_one::<String>("hyperparameters").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn compute_solution(
    instance_path: PathBuf,
    hyperparameters: Option<String>,
    strategy: Option<String>,
    seed: Option<u64>,
    history: Option<u64>,
    iterations: Option<u64>,
    output_file: Option<PathBuf>,
    compress: bool,
) -> Result<()> {
    let challenge = load_challenge(&instance_path)?;

    let mut hyperparameters = load_hyperparameters(hyperparameters)?;
    if let Some(strategy) = strategy {
        hyperparameters.insert("strategy".to_string(), Value::from(strategy));
    }
    if let Some(seed) = seed {
        hyperparameters.insert("seed".to_string(), Value::from(seed));
    }
    if let Some(history) = history {
        hyperparameters.insert("history_length".to_string(), Value::from(history));
    }
    if let Some(iterations) = iterations {
        hyperparameters.insert("iteration_limit".to_string(), Value::from(iterations));
    }
    let params = Params::initialize(&Some(hyperparameters))?;
    tracing::info!(
        instance = %instance_path.display(),
        num_bids = challenge.num_bids,
        capacity = challenge.capacity,
        ?params,
        "computing solution"
    );

    let start = Instant::now();
    let summary = Solver::run(&challenge, &params, None)?;
    let runtime_ms = start.elapsed().as_millis();

    let output_data = OutputData {
        objective: summary.objective,
        initial_objective: summary.initial_objective,
        items: summary.solution.items,
        runtime_ms,
        params,
    };
    if let Some(path) = output_file {
        if compress {
            fs::write(&path, compress_obj(&output_data)?)?;
        } else {
            fs::write(&path, jsonify(&output_data)?)?;
        }
        println!("output_data written to: {:?}", path);
    } else {
        println!("{}", jsonify(&output_data)?);
    }
    Ok(())
}

pub fn verify_solution(instance_path: PathBuf, solution: String) -> Result<()> {
    let challenge = load_challenge(&instance_path)?;
    let solution = dejsonify::<Solution>(&read_json_arg(&solution)?)
        .map_err(|e| anyhow!("Failed to parse solution: {}", e))?;

    match challenge.evaluate_total_price(&solution) {
        Ok(total_price) => println!("Solution is valid, total price: {}", total_price),
        Err(e) => {
            eprintln!("Invalid solution: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn generate_instance(seed: u64, track: Track, output_file: Option<PathBuf>) -> Result<()> {
    let mut seed_bytes = [0u8; 32];
    seed_bytes[..8].copy_from_slice(&seed.to_le_bytes());
    let challenge = Challenge::generate_instance(&seed_bytes, &track)?;

    if let Some(path) = output_file {
        fs::write(&path, challenge.to_string())?;
        println!("instance written to: {:?}", path);
    } else {
        print!("{}", challenge);
    }
    Ok(())
}

pub fn benchmark(
    instance_paths: Vec<PathBuf>,
    iterations: Vec<u64>,
    hyperparameters: Option<String>,
) -> Result<()> {
    let hyperparameters = load_hyperparameters(hyperparameters)?;
    let challenges = instance_paths
        .iter()
        .map(|path| load_challenge(path).map(|c| (path, c)))
        .collect::<Result<Vec<_>>>()?;

    println!("instance, iterations, initial_objective, best_objective, seconds");
    for &iteration_limit in &iterations {
        let mut h = hyperparameters.clone();
        h.insert("iteration_limit".to_string(), Value::from(iteration_limit));
        let params = Params::initialize(&Some(h))?;

        for (path, challenge) in &challenges {
            let start = Instant::now();
            let summary = Solver::run(challenge, &params, None)?;
            let seconds = start.elapsed().as_secs_f64();
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            println!(
                "{}, {}, {}, {}, {:.6}",
                name, iteration_limit, summary.initial_objective, summary.objective, seconds
            );
        }
    }
    Ok(())
}

fn load_challenge(path: &PathBuf) -> Result<Challenge> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read instance file {:?}: {}", path, e))?;
    text.parse::<Challenge>()
        .map_err(|e| anyhow!("Malformed instance {:?}: {}", path, e))
}

fn load_hyperparameters(hyperparameters: Option<String>) -> Result<Map<String, Value>> {
    match hyperparameters {
        Some(arg) => load_json_map(&arg),
        None => Ok(Map::new()),
    }
}
