use anyhow::Context;
use env_logger::Builder;
use log::{LevelFilter, info};
use radio_reachability::config::Config;
use radio_reachability::simulation::{build_model, load_scene};
use radio_reachability::{NodeId, ReachabilityGraph};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "Usage: radio-reachability <scene.json> [config.toml]";

/// Resolve the config: explicit path, else `config.toml` next to the scene, else defaults.
fn resolve_config(scene_path: &Path, config_path: Option<PathBuf>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => {
            let path = Config::config_path_from_scene(scene_path);
            if path.exists() { Config::load(&path) } else { Ok(Config::default()) }
        }
    }
}

fn sorted(nodes: HashSet<NodeId>) -> Vec<NodeId> {
    let mut nodes: Vec<NodeId> = nodes.into_iter().collect();
    nodes.sort_unstable();
    nodes
}

fn run(scene_path: &Path, config: &Config) -> anyhow::Result<()> {
    let scene = load_scene(scene_path)?;
    let model = build_model(config.propagation_model, &scene)?;

    let mut graph = ReachabilityGraph::new().with_start_policy(config.connectivity_start);
    graph.rebuild(&scene.nodes, model.as_ref());

    for node_id in &config.inactive_nodes {
        graph.toggle(*node_id).with_context(|| format!("Cannot deactivate node {}", node_id))?;
        info!("Node {} deactivated", node_id);
    }

    println!("{}", graph);
    for node_id in graph.node_ids() {
        let neighbors = sorted(graph.get_neighbors(*node_id)?);
        let one_hop = sorted(graph.get_one_hop_neighbors(*node_id)?);
        println!("node {:>5}: neighbors {:?}, one-hop {:?}", node_id, neighbors, one_hop);
    }

    let connected = graph.is_connected()?;
    println!(
        "{} of {} nodes active, network is {}",
        graph.active_nodes().len(),
        graph.node_count(),
        if connected { "connected" } else { "disconnected" }
    );
    Ok(())
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(scene_path) = args.next().map(PathBuf::from) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };
    let config_path = args.next().map(PathBuf::from);

    let config = match resolve_config(&scene_path, config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("radio_reachability"), config.log_level.into())
        .init();

    info!("Starting up");

    match run(&scene_path, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
