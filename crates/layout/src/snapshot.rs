use serde::{Deserialize, Serialize};

/// One parent bubble as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentBubble {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Number of member items.
    pub count: usize,
    /// Summed member weight, for visual emphasis only.
    pub total_weight: f64,
    /// True while this bubble is held by a drag.
    pub pinned: bool,
}

/// One child bubble. `parent` indexes into the snapshot's parent list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildBubble {
    pub item_id: String,
    pub parent: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub weight: f64,
}

/// Display-only counters surfaced next to the geometry. None of these feed
/// back into the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// `Some(percent)` when the layout was auto-scaled below 100%.
    pub scale_percent: Option<u32>,
    pub cluster_count: usize,
    /// Items supplied, including ones dropped with their singleton cluster.
    pub item_count: usize,
    /// Children placed via the best-effort fallback.
    pub fallback_placements: usize,
}

/// Immutable per-frame output handed to the rendering side. Taken after each
/// tick; the renderer must not feed anything back into the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub width: f64,
    pub height: f64,
    pub parents: Vec<ParentBubble>,
    pub children: Vec<ChildBubble>,
    pub stats: LayoutStats,
}
