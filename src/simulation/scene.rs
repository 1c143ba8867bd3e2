//! Scene file loading and validation.

use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::types::{Obstacle, Scene};

/// World coordinates range over 0..=MAX_WORLD_COORD on both axes.
pub const MAX_WORLD_COORD: f64 = 10000.0;
pub const MAX_NODES: usize = 10000;
const MIN_RADIO_STRENGTH: f32 = -50.0;
const MAX_RADIO_STRENGTH: f32 = 50.0;

/// Read, parse and validate a JSON scene file.
pub fn load_scene(path: &Path) -> anyhow::Result<Scene> {
    let data = fs::read_to_string(path).with_context(|| format!("Failed to read scene file: {}", path.display()))?;
    let scene = parse_scene(&data).with_context(|| format!("Invalid scene file: {}", path.display()))?;
    log::info!("Loaded scene {} with {} nodes and {} obstacles", path.display(), scene.nodes.len(), scene.obstacles.len());
    Ok(scene)
}

/// Parse and validate a scene from JSON text.
pub fn parse_scene(data: &str) -> anyhow::Result<Scene> {
    let scene = serde_json::from_str::<Scene>(data).context("Invalid JSON format")?;
    validate_scene(&scene).map_err(anyhow::Error::msg).context("Invalid scene configuration")?;
    Ok(scene)
}

/// Reject malformed scenes before they reach the propagation models.
///
/// Checks:
/// - Node count between 1 and `MAX_NODES`, with unique node ids
/// - Node positions inside world bounds
/// - Radio strength within -50..=50 dBm
/// - Unit disk, LoRa and path loss parameters, when present
/// - Obstacle geometry (inside world bounds, well-formed rectangles, non-zero radius)
///
/// # Returns
///
/// `Ok(())` if validation passes, `Err(String)` describing the first problem otherwise.
pub fn validate_scene(scene: &Scene) -> Result<(), String> {
    if scene.nodes.is_empty() {
        return Err("Scene must contain at least one node".to_string());
    }
    if scene.nodes.len() > MAX_NODES {
        return Err(format!("Node count {} exceeds maximum of {}", scene.nodes.len(), MAX_NODES));
    }

    let mut node_ids = HashSet::new();
    for node in &scene.nodes {
        if !node_ids.insert(node.node_id) {
            return Err(format!("Duplicate node_id found: {}", node.node_id));
        }
        if !in_world(node.position.x) || !in_world(node.position.y) {
            return Err(format!(
                "Node {} position ({}, {}) exceeds world bounds (0-{})",
                node.node_id, node.position.x, node.position.y, MAX_WORLD_COORD
            ));
        }
        if node.radio_strength < MIN_RADIO_STRENGTH || node.radio_strength > MAX_RADIO_STRENGTH {
            return Err(format!(
                "Node {} radio_strength {} dBm outside realistic range ({} to {} dBm)",
                node.node_id, node.radio_strength, MIN_RADIO_STRENGTH, MAX_RADIO_STRENGTH
            ));
        }
    }

    let unit_disk = &scene.unit_disk_parameters;
    if unit_disk.transmitting_range <= 0.0 {
        return Err("Invalid transmitting_range, must be positive".to_string());
    }
    if !(0.0..=1.0).contains(&unit_disk.success_ratio_tx) || !(0.0..=1.0).contains(&unit_disk.success_ratio_rx) {
        return Err("Invalid unit disk success ratios, must be within 0-1".to_string());
    }

    if let Some(lora) = &scene.lora_parameters {
        if lora.spreading_factor < 5 || lora.spreading_factor > 12 {
            return Err(format!("Invalid spreading_factor {}, must be 5-12", lora.spreading_factor));
        }
        if lora.bandwidth == 0 {
            return Err("Invalid bandwidth, must be positive".to_string());
        }
        if lora.coding_rate < 1 || lora.coding_rate > 4 {
            return Err(format!("Invalid coding_rate {}, must be 1-4 (representing 4/5 to 4/8)", lora.coding_rate));
        }
    }

    if let Some(path_loss) = &scene.path_loss_parameters {
        if path_loss.path_loss_exponent <= 0.0 {
            return Err("Invalid path_loss_exponent, must be positive".to_string());
        }
        if path_loss.shadowing_sigma < 0.0 {
            return Err("Invalid shadowing_sigma, must be non-negative".to_string());
        }
    }

    for (idx, obstacle) in scene.obstacles.iter().enumerate() {
        match obstacle {
            Obstacle::Rectangle { position } => {
                let corners = [&position.top_left, &position.bottom_right];
                if corners.iter().any(|p| !in_world(p.x) || !in_world(p.y)) {
                    return Err(format!("Obstacle {} (rectangle) has coordinates exceeding world bounds (0-{})", idx, MAX_WORLD_COORD));
                }
                if position.top_left.x >= position.bottom_right.x || position.top_left.y >= position.bottom_right.y {
                    return Err(format!(
                        "Obstacle {} (rectangle) has invalid geometry: top-left ({}, {}) must be strictly less than bottom-right ({}, {})",
                        idx, position.top_left.x, position.top_left.y, position.bottom_right.x, position.bottom_right.y
                    ));
                }
            }
            Obstacle::Circle { position } => {
                if position.radius <= 0.0 {
                    return Err(format!("Obstacle {} (circle) has zero radius", idx));
                }
                let (cx, cy, r) = (position.center.x, position.center.y, position.radius);
                if !in_world(cx - r) || !in_world(cx + r) || !in_world(cy - r) || !in_world(cy + r) {
                    return Err(format!("Obstacle {} (circle) extends beyond world bounds (0-{})", idx, MAX_WORLD_COORD));
                }
            }
        }
    }

    Ok(())
}

fn in_world(coord: f64) -> bool {
    (0.0..=MAX_WORLD_COORD).contains(&coord)
}
