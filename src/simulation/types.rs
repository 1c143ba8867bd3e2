//! Type definitions for the simulation scene.
//!
//! Contains the data structures loaded from a scene file:
//! - Scene configuration (nodes, obstacles, propagation parameters)
//! - Node placement and radio strength
//! - Obstacle geometry used for line-of-sight checks

use serde::Deserialize;

use super::signal_calculations::{LoraParameters, PathLossParameters};
use crate::reachability::{NodeId, RadioNode};

/// Root structure representing the entire scene
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    /// Log-distance path loss parameters. Required by the log-distance model.
    #[serde(default)]
    pub path_loss_parameters: Option<PathLossParameters>,
    /// LoRa-like parameters used for the SNR limit. Required by the log-distance model.
    #[serde(default)]
    pub lora_parameters: Option<LoraParameters>,
    /// Unit disk graph parameters.
    #[serde(default)]
    pub unit_disk_parameters: UnitDiskParameters,
    /// All nodes present in the scene (positions and radios).
    pub nodes: Vec<Node>,
    /// Static obstacles used to determine line-of-sight.
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

/// Node structure with position and radio strength
#[derive(Debug, Deserialize, Clone)]
pub struct Node {
    pub node_id: NodeId,
    pub position: Point,
    /// Transmit power in dBm.
    pub radio_strength: f32,
}

impl RadioNode for Node {
    fn node_id(&self) -> NodeId {
        self.node_id
    }
}

/// Simple 2D point in world units.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Rectangle position with two corners
#[derive(Debug, Deserialize, Clone)]
pub struct RectPos {
    #[serde(rename = "top-left-position")]
    pub top_left: Point,
    #[serde(rename = "bottom-right-position")]
    pub bottom_right: Point,
}

/// Circle position defined by its center
#[derive(Debug, Deserialize, Clone)]
pub struct CirclePos {
    #[serde(rename = "center_position")]
    pub center: Point,
    pub radius: f64,
}

/// Obstacles expressed in world coordinates (0..=10000 for both axes). Rectangles
/// are defined by two corners; circles by center and radius.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum Obstacle {
    #[serde(rename = "rectangle")]
    Rectangle {
        #[serde(flatten)]
        position: RectPos,
    },
    #[serde(rename = "circle")]
    Circle {
        #[serde(flatten)]
        position: CirclePos,
    },
}

/// Parameters of the unit disk graph medium.
///
/// Inside `transmitting_range` the reception probability falls off from
/// `success_ratio_tx` at distance zero towards
/// `success_ratio_tx * success_ratio_rx` at the range edge. Beyond the range
/// nothing is received.
#[derive(Debug, Deserialize, Clone)]
pub struct UnitDiskParameters {
    /// Maximum transmission distance in world units.
    pub transmitting_range: f64,
    /// Probability that a transmission leaves the sender.
    pub success_ratio_tx: f64,
    /// Reception probability at the edge of the range.
    pub success_ratio_rx: f64,
}

impl Default for UnitDiskParameters {
    fn default() -> Self {
        Self {
            transmitting_range: 50.0,
            success_ratio_tx: 1.0,
            success_ratio_rx: 1.0,
        }
    }
}
