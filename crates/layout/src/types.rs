use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One post (or any taggable payload) entering the layout.
///
/// The weight is the engagement score; it only drives visual emphasis in the
/// renderer, never the geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub tags: Vec<String>,
    pub weight: f64,
}

impl Item {
    pub fn new(id: impl Into<String>, tags: Vec<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            tags,
            weight,
        }
    }
}

/// A tag group retained for layout. Members index into the item slice the
/// cluster list was built from; one item can appear in several clusters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub label: String,
    pub members: Vec<usize>,
    pub total_weight: f64,
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid viewport {width}x{height}: dimensions must be positive and finite")]
    InvalidViewport { width: f64, height: f64 },
}

/// All tunable layout constants. Defaults match the reference visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Unscaled child bubble radius.
    pub base_child_radius: f64,
    /// Unscaled minimum parent bubble radius.
    pub base_min_parent_radius: f64,
    /// Hard floor for the scaled child radius.
    pub child_radius_floor: f64,
    /// Hard floor for the scaled minimum parent radius.
    pub parent_radius_floor: f64,
    /// Fixed margin subtracted from each canvas axis before area budgeting.
    pub canvas_margin: f64,
    /// Fraction of the usable canvas area the clusters may occupy.
    pub target_area_fraction: f64,
    /// Spacing multiplier used when estimating parent radii for the fit.
    pub estimate_spacing: f64,
    /// Padding added around each estimated parent when summing footprints.
    pub cluster_padding: f64,
    /// Spacing multiplier used for the actual parent radius.
    pub pack_spacing: f64,
    /// Extra separation margin between children inside a parent.
    pub safety_margin: f64,
    /// Sampling attempts per child before falling back.
    pub max_place_attempts: usize,
    /// Vertical space reserved above a parent bubble for its label.
    pub label_height: f64,
    /// Simulation stops being meaningful below this energy.
    pub alpha_min: f64,
    /// Per-tick relaxation rate of alpha toward its target.
    pub alpha_decay: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    /// Strength of the pull toward the canvas center.
    pub center_strength: f64,
    /// Pair-separation passes per tick.
    pub collision_iterations: usize,
    /// Clearance added per parent in the collision pass.
    pub collision_padding: f64,
    /// Distance kept between a parent's edge (plus label) and the canvas edge.
    pub boundary_margin: f64,
    /// Clearance used by the post-collision extra push.
    pub extra_push_padding: f64,
    /// Alpha target held while a parent is dragged.
    pub drag_alpha_target: f64,
    /// Seed for initial parent placement and child sampling.
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_child_radius: 25.0,
            base_min_parent_radius: 100.0,
            child_radius_floor: 15.0,
            parent_radius_floor: 60.0,
            canvas_margin: 200.0,
            target_area_fraction: 0.6,
            estimate_spacing: 1.5,
            cluster_padding: 60.0,
            pack_spacing: 1.6,
            safety_margin: 8.0,
            max_place_attempts: 200,
            label_height: 35.0,
            alpha_min: 0.001,
            alpha_decay: 0.01,
            velocity_decay: 0.6,
            center_strength: 0.02,
            collision_iterations: 8,
            collision_padding: 20.0,
            boundary_margin: 15.0,
            extra_push_padding: 25.0,
            drag_alpha_target: 0.3,
            seed: 0,
        }
    }
}
