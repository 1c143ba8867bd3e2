//! Propagation models supplying pairwise reception probabilities.
//!
//! The reachability graph only needs `PropagationModel::rx_success_probability`.
//! Two scene-backed models are provided:
//! - `UnitDiskModel`: distance-ratio falloff inside a fixed transmitting range
//! - `LogDistanceModel`: link budget against the LoRa receiving limit
//!
//! Both report zero when the line of sight between the nodes is blocked.

use anyhow::Context;
use serde::Deserialize;

use super::geometry::{distance, distance2, is_line_of_sight_blocked};
use super::signal_calculations::{LoraParameters, PathLossParameters, calculate_effective_distance, calculate_receiving_limit, calculate_rssi};
use super::types::{Node, Obstacle, Scene, UnitDiskParameters};

/// Source of reception-success probabilities between two nodes.
///
/// Implementations return values in `[0, 1]`; the graph does not validate them.
pub trait PropagationModel<N> {
    fn rx_success_probability(&self, src: &N, dest: &N) -> f64;
}

impl<N, F> PropagationModel<N> for F
where
    F: Fn(&N, &N) -> f64,
{
    fn rx_success_probability(&self, src: &N, dest: &N) -> f64 {
        self(src, dest)
    }
}

/// Which scene-backed model to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    #[default]
    UnitDisk,
    LogDistance,
}

/// Unit disk graph medium.
pub struct UnitDiskModel {
    params: UnitDiskParameters,
    obstacles: Vec<Obstacle>,
}

impl UnitDiskModel {
    pub fn new(params: UnitDiskParameters, obstacles: Vec<Obstacle>) -> Self {
        Self { params, obstacles }
    }

    pub fn from_scene(scene: &Scene) -> Self {
        Self::new(scene.unit_disk_parameters.clone(), scene.obstacles.clone())
    }
}

impl PropagationModel<Node> for UnitDiskModel {
    /// `success_ratio_tx × (1 - d²/range² × (1 - success_ratio_rx))` inside the range, 0 outside.
    fn rx_success_probability(&self, src: &Node, dest: &Node) -> f64 {
        let range2 = self.params.transmitting_range * self.params.transmitting_range;
        if range2 <= 0.0 {
            return 0.0;
        }
        let ratio = distance2(&src.position, &dest.position) / range2;
        if ratio > 1.0 || is_line_of_sight_blocked(&src.position, &dest.position, &self.obstacles) {
            return 0.0;
        }
        self.params.success_ratio_tx * (1.0 - ratio * (1.0 - self.params.success_ratio_rx))
    }
}

/// Log-distance path loss medium.
///
/// Receivers beyond the sender's deterministic effective distance are out of
/// range. Inside it, a link is reliable (probability 1.0) when the sampled RSSI
/// at the receiver reaches the receiving limit, otherwise it is absent. With
/// shadowing enabled every query samples a fresh value, so a rebuild is a
/// random snapshot.
pub struct LogDistanceModel {
    path_loss_parameters: PathLossParameters,
    lora_parameters: LoraParameters,
    obstacles: Vec<Obstacle>,
    receiving_limit: f32,
}

impl LogDistanceModel {
    pub fn new(path_loss_parameters: PathLossParameters, lora_parameters: LoraParameters, obstacles: Vec<Obstacle>) -> Self {
        let receiving_limit = calculate_receiving_limit(&lora_parameters, &path_loss_parameters);
        Self {
            path_loss_parameters,
            lora_parameters,
            obstacles,
            receiving_limit,
        }
    }

    pub fn from_scene(scene: &Scene) -> anyhow::Result<Self> {
        let path_loss_parameters = scene.path_loss_parameters.clone().context("Scene has no path_loss_parameters")?;
        let lora_parameters = scene.lora_parameters.clone().context("Scene has no lora_parameters")?;
        Ok(Self::new(path_loss_parameters, lora_parameters, scene.obstacles.clone()))
    }

    /// Receiving limit (dBm) links are compared against.
    pub fn receiving_limit(&self) -> f32 {
        self.receiving_limit
    }
}

impl PropagationModel<Node> for LogDistanceModel {
    fn rx_success_probability(&self, src: &Node, dest: &Node) -> f64 {
        let effective_distance = calculate_effective_distance(src.radio_strength, &self.lora_parameters, &self.path_loss_parameters) as f64;
        if distance2(&src.position, &dest.position) > effective_distance * effective_distance {
            return 0.0;
        }
        if is_line_of_sight_blocked(&src.position, &dest.position, &self.obstacles) {
            return 0.0;
        }
        let rssi = calculate_rssi(distance(&src.position, &dest.position) as f32, src.radio_strength, &self.path_loss_parameters);
        if rssi >= self.receiving_limit { 1.0 } else { 0.0 }
    }
}

/// Build the model selected by `kind` from the scene's parameters.
pub fn build_model(kind: ModelKind, scene: &Scene) -> anyhow::Result<Box<dyn PropagationModel<Node>>> {
    let model: Box<dyn PropagationModel<Node>> = match kind {
        ModelKind::UnitDisk => Box::new(UnitDiskModel::from_scene(scene)),
        ModelKind::LogDistance => Box::new(LogDistanceModel::from_scene(scene).context("Cannot build log-distance model")?),
    };
    log::debug!("Using {:?} propagation model", kind);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::{Point, RectPos};

    fn node(node_id: u32, x: f64, y: f64) -> Node {
        Node {
            node_id,
            position: Point { x, y },
            radio_strength: 14.0,
        }
    }

    fn wall() -> Obstacle {
        Obstacle::Rectangle {
            position: RectPos {
                top_left: Point { x: 20.0, y: -10.0 },
                bottom_right: Point { x: 25.0, y: 10.0 },
            },
        }
    }

    fn scene(obstacles: Vec<Obstacle>) -> Scene {
        Scene {
            path_loss_parameters: Some(PathLossParameters {
                path_loss_exponent: 3.0,
                shadowing_sigma: 0.0,
                path_loss_at_reference_distance: 40.0,
                noise_floor: -120.0,
            }),
            lora_parameters: Some(LoraParameters {
                bandwidth: 125_000,
                spreading_factor: 7,
                coding_rate: 1,
            }),
            unit_disk_parameters: UnitDiskParameters::default(),
            nodes: vec![node(1, 0.0, 0.0), node(2, 30.0, 0.0), node(3, 200.0, 0.0)],
            obstacles,
        }
    }

    #[test]
    fn unit_disk_is_reliable_inside_range() {
        let model = UnitDiskModel::from_scene(&scene(vec![]));
        assert_eq!(model.rx_success_probability(&node(1, 0.0, 0.0), &node(2, 30.0, 0.0)), 1.0);
        assert_eq!(model.rx_success_probability(&node(1, 0.0, 0.0), &node(2, 50.0, 0.0)), 1.0);
        assert_eq!(model.rx_success_probability(&node(1, 0.0, 0.0), &node(3, 51.0, 0.0)), 0.0);
    }

    #[test]
    fn unit_disk_falls_off_with_rx_ratio() {
        let params = UnitDiskParameters {
            transmitting_range: 100.0,
            success_ratio_tx: 1.0,
            success_ratio_rx: 0.5,
        };
        let model = UnitDiskModel::new(params, vec![]);
        assert_eq!(model.rx_success_probability(&node(1, 0.0, 0.0), &node(2, 0.0, 0.0)), 1.0);
        let p = model.rx_success_probability(&node(1, 0.0, 0.0), &node(2, 50.0, 0.0));
        assert!((p - 0.875).abs() < 1e-9);
        assert!((model.rx_success_probability(&node(1, 0.0, 0.0), &node(2, 100.0, 0.0)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn obstacles_block_both_models() {
        let scene = scene(vec![wall()]);
        let unit_disk = UnitDiskModel::from_scene(&scene);
        let log_distance = LogDistanceModel::from_scene(&scene).unwrap();
        let (a, b) = (&scene.nodes[0], &scene.nodes[1]);
        assert_eq!(unit_disk.rx_success_probability(a, b), 0.0);
        assert_eq!(log_distance.rx_success_probability(a, b), 0.0);
    }

    #[test]
    fn log_distance_compares_against_receiving_limit() {
        let scene = scene(vec![]);
        let model = LogDistanceModel::from_scene(&scene).unwrap();
        // RL = -127.5 dBm; PL(30 m) ≈ 84.3 dB, PL(200 m) ≈ 109 dB; tx 14 dBm.
        assert_eq!(model.receiving_limit(), -127.5);
        assert_eq!(model.rx_success_probability(&scene.nodes[0], &scene.nodes[1]), 1.0);
        assert_eq!(model.rx_success_probability(&scene.nodes[0], &scene.nodes[2]), 1.0);
        let far = node(4, 20_000.0, 0.0);
        assert_eq!(model.rx_success_probability(&scene.nodes[0], &far), 0.0);
    }

    #[test]
    fn log_distance_range_check_ignores_shadowing() {
        let mut scene = scene(vec![]);
        if let Some(path_loss) = scene.path_loss_parameters.as_mut() {
            path_loss.shadowing_sigma = 40.0;
        }
        let model = LogDistanceModel::from_scene(&scene).unwrap();
        // Effective distance for 14 dBm is 10^(101.5 / 30) ≈ 2416 m.
        let sender = node(1, 0.0, 0.0);
        let beyond = node(2, 2500.0, 0.0);
        for _ in 0..200 {
            assert_eq!(model.rx_success_probability(&sender, &beyond), 0.0);
        }
    }

    #[test]
    fn log_distance_requires_parameters() {
        let mut scene = scene(vec![]);
        scene.lora_parameters = None;
        assert!(build_model(ModelKind::LogDistance, &scene).is_err());
        assert!(build_model(ModelKind::UnitDisk, &scene).is_ok());
    }

    #[test]
    fn closures_are_models() {
        let model = |src: &u32, dest: &u32| if src < dest { 1.0 } else { 0.0 };
        assert_eq!(model.rx_success_probability(&1, &2), 1.0);
        assert_eq!(model.rx_success_probability(&2, &1), 0.0);
    }
}
