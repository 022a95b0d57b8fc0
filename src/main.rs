use ballsim::{Scenario, ScenarioConfig};
use ballsim::run_3d;
use ballsim::{bench_broadphase, bench_step_curve};

use anyhow::Result;
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run the broad-phase benchmarks instead of the viewer
    #[arg(long)]
    bench: bool,

    /// Print the grid-vs-direct timing curve as CSV
    #[arg(long)]
    bench_curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Bevy's LogPlugin bridges `log` records itself; env_logger only backs
    // the headless benchmark paths.
    if args.bench || args.bench_curve {
        env_logger::init();
        if args.bench {
            bench_broadphase();
        } else {
            bench_step_curve();
        }
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg);
    run_3d(scenario);

    Ok(())
}
