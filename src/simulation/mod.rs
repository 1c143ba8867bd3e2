//! Scene and propagation side of the reachability model.
//!
//! ## Module Organization
//!
//! - `types`: Scene, nodes, obstacles and unit disk parameters
//! - `scene`: Scene file loading and validation
//! - `geometry`: Line-of-sight and obstacle intersection logic
//! - `signal_calculations`: Path loss, SNR limit and link budget math
//! - `propagation`: Propagation models feeding the reachability graph

pub mod geometry;
pub mod propagation;
pub mod scene;
pub mod signal_calculations;
pub mod types;

pub use propagation::build_model;
pub use scene::load_scene;
pub use types::{Node, Obstacle, Point, Scene};
