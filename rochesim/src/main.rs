use rochesim::{ScenarioConfig, Scenario};
use rochesim::{run_2d, run_headless};
use rochesim::bench_tick;

use anyhow::{bail, Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under scenarios/
    #[arg(short, default_value = "roche_limit.yaml")]
    file_name: String,

    /// Override the scenario's shuffle seed
    #[arg(long)]
    seed: Option<u64>,

    /// Time the physics step for several cloud sizes and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("cannot open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg = ScenarioConfig::from_reader(reader)
        .with_context(|| format!("cannot parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_tick()?;
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(seed) = args.seed {
        scenario_cfg.engine.seed = Some(seed);
    }

    let scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;
    println!(
        "{}: planet + {} asteroids, seed {}",
        args.file_name,
        scenario.system.asteroids().len(),
        scenario.seed
    );

    let viewer_cfg = scenario.viewer.clone();
    let with_viewer = scenario.options.viewer;
    let sim = scenario.into_loop().context("cannot open output files")?;

    let exit = if with_viewer {
        run_2d(sim, &viewer_cfg)
    } else {
        run_headless(sim)
    };

    if exit.is_error() {
        bail!("simulation ended with an error");
    }
    Ok(())
}
