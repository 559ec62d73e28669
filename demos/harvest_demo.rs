// Demonstration: run the Harvest environment and evaluate a baseline policy.
//
// Build/run from this repo root:
//   cargo run --example harvest_demo -- --policy greedy --episodes 10 --agents 4

use std::env;

use harvest::{
    EvaluationMetrics, GreedyHarvestPolicy, HarvestConfig, HarvestEnv, MapLayout, Policy,
    Position, RandomPolicy,
};

fn main() {
    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("greedy");
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let agents: usize = arg_value(&args, "--agents")
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = HarvestConfig {
        episode_horizon: 500,
        ..HarvestConfig::default()
    };

    let mut policy: Box<dyn Policy> = match policy_name {
        "random" => Box::new(RandomPolicy::with_seed(config.action_dim(), seed)),
        "greedy" => Box::new(GreedyHarvestPolicy::new()),
        other => {
            eprintln!("Unknown --policy '{}'; expected 'greedy' or 'random'.", other);
            std::process::exit(2);
        }
    };

    let mut env = match HarvestEnv::new(config, orchard(), agents, seed) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Cannot build environment: {e}");
            std::process::exit(2);
        }
    };

    match EvaluationMetrics::evaluate(&mut env, policy.as_mut(), episodes) {
        Ok(metrics) => {
            println!("Policy: {}", policy.name());
            println!("{}", metrics);
            println!("Final grid:\n{}", env.grid());
        }
        Err(e) => {
            eprintln!("Evaluation failed: {e}");
            std::process::exit(1);
        }
    }
}

/// 16x24 walled orchard with three apple patches and spawn points along the
/// top and bottom rows.
fn orchard() -> MapLayout {
    let mut apples = Vec::new();
    for (top, left) in [(3, 3), (8, 10), (4, 17)] {
        for row in top..top + 4 {
            for col in left..left + 4 {
                if (row + col) % 3 != 0 {
                    apples.push(Position::new(row, col));
                }
            }
        }
    }
    let spawns = (2..22)
        .step_by(3)
        .flat_map(|col| [Position::new(1, col), Position::new(14, col)]);
    MapLayout::new(16, 24)
        .with_border_walls()
        .with_resources(apples)
        .with_agent_spawns(spawns)
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
