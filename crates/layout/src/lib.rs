//! Hierarchical bubble-cluster layout engine.
//!
//! Takes tagged items (social-media posts grouped by hashtag), partitions
//! them into clusters, fits the whole arrangement to a bounded canvas, packs
//! each cluster's children inside their parent bubble, and settles the
//! parent bubbles with an iterative force simulation that supports dragging.
//! Rendering, transport and persistence live elsewhere; this crate only
//! produces [`LayoutSnapshot`] values.
//!
//! Typical use:
//!
//! ```
//! use bubbleviz_layout::{Item, LayoutConfig, SimulationState};
//!
//! let items = vec![
//!     Item::new("post-1", vec!["#rust".into()], 12.0),
//!     Item::new("post-2", vec!["#rust".into()], 4.0),
//! ];
//! let mut state = SimulationState::new(items, 1000.0, 800.0, LayoutConfig::default())?;
//! while !state.settled() {
//!     let snapshot = state.tick();
//!     let _ = snapshot; // hand to the renderer
//! }
//! # Ok::<(), bubbleviz_layout::LayoutError>(())
//! ```

pub mod engine;
pub mod group;
pub mod place;
pub mod scale;
pub mod session;
pub mod snapshot;
pub mod svg;
pub mod types;

pub use engine::{ChildNode, ParentNode, SimulationState};
pub use group::{group_items, DEFAULT_TAG, MIN_CLUSTER_SIZE};
pub use place::{place_children, Placement};
pub use scale::{fit_scale, parent_radius, ScaleFit};
pub use session::{LayoutSession, SessionEvent};
pub use snapshot::{ChildBubble, LayoutSnapshot, LayoutStats, ParentBubble};
pub use svg::{snapshot_to_svg, write_svg};
pub use types::{Cluster, Item, LayoutConfig, LayoutError, Position};
