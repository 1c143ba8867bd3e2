//! Reachability topology for simulated radio nodes.
//!
//! The crate is split into:
//! - `reachability`: the directed reachability graph (rebuild, toggle, neighbor
//!   queries, connectivity check)
//! - `simulation`: scene description, geometry, link-budget math and the
//!   propagation models that feed the graph
//! - `config`: TOML run configuration used by the report binary

pub mod config;
pub mod error;
pub mod reachability;
pub mod simulation;

pub use config::Config;
pub use error::ReachabilityError;
pub use reachability::{Entry, LinkState, NodeId, RadioNode, ReachabilityGraph, StartNodePolicy};
pub use simulation::propagation::{LogDistanceModel, ModelKind, PropagationModel, UnitDiskModel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::scene::parse_scene;
    use std::collections::HashSet;

    const CORRIDOR: &str = include_str!("../scenes/corridor.json");

    #[test]
    fn corridor_scene_with_unit_disk_model() {
        let scene = parse_scene(CORRIDOR).unwrap();
        let model = simulation::build_model(ModelKind::UnitDisk, &scene).unwrap();
        let mut graph = ReachabilityGraph::new();
        graph.rebuild(&scene.nodes, model.as_ref());

        assert_eq!(graph.get_neighbors(2).unwrap(), HashSet::from([1, 2, 3]));
        // Node 5 is out of range and behind the wall.
        assert_eq!(graph.get_one_hop_neighbors(5).unwrap(), HashSet::from([5]));
        assert_eq!(graph.is_connected(), Ok(false));

        graph.toggle(5).unwrap();
        assert_eq!(graph.is_connected(), Ok(true));

        graph.toggle(3).unwrap();
        assert_eq!(graph.is_connected(), Ok(false));
    }

    #[test]
    fn corridor_scene_with_log_distance_model() {
        let scene = parse_scene(CORRIDOR).unwrap();
        let model = simulation::build_model(ModelKind::LogDistance, &scene).unwrap();
        let mut graph = ReachabilityGraph::new();
        graph.rebuild(&scene.nodes, model.as_ref());

        // Without obstacles every node would be in budget; the wall cuts node 5 off.
        assert!(graph.entry(1, 4).unwrap().linked);
        assert!(!graph.entry(3, 5).unwrap().linked);
        assert!(!graph.entry(5, 1).unwrap().linked);
        assert_eq!(graph.is_connected(), Ok(false));
    }
}
