use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::types::{Cluster, LayoutConfig};

/// Result of fitting the reference bubble sizes to the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScaleFit {
    /// Global shrink factor, 1.0 when everything already fits.
    pub scale: f64,
    /// Scaled child radius, never below the configured floor.
    pub child_radius: f64,
    /// Scaled minimum parent radius, never below the configured floor.
    pub min_parent_radius: f64,
    /// `floor(scale * 100)` when scaled down, for the "auto-scaled" badge.
    pub percent: Option<u32>,
}

/// Radius a parent needs to hold `child_count` children of `child_radius`.
///
/// The spacing multiplier reserves gap area on top of the raw circle area so
/// the sampler has room to keep children apart.
pub fn parent_radius(
    child_count: usize,
    child_radius: f64,
    min_parent_radius: f64,
    spacing: f64,
) -> f64 {
    if child_count == 0 {
        return min_parent_radius;
    }
    let child_area = PI * child_radius * child_radius;
    let required_area = child_area * child_count as f64 * spacing;
    (required_area / PI).sqrt().max(min_parent_radius)
}

/// Derive the single global scale factor that makes every cluster fit inside
/// the target fraction of the usable canvas area.
pub fn fit_scale(clusters: &[Cluster], width: f64, height: f64, cfg: &LayoutConfig) -> ScaleFit {
    let usable_area = (width - cfg.canvas_margin) * (height - cfg.canvas_margin);

    let mut estimated_area = 0.0;
    for cluster in clusters {
        let estimate = parent_radius(
            cluster.members.len(),
            cfg.base_child_radius,
            cfg.base_min_parent_radius,
            cfg.estimate_spacing,
        );
        let footprint = estimate + cfg.cluster_padding;
        estimated_area += PI * footprint * footprint;
    }

    let target_area = usable_area * cfg.target_area_fraction;
    let scale = if estimated_area > target_area {
        (target_area / estimated_area).sqrt()
    } else {
        1.0
    };

    let percent = if scale < 1.0 {
        let percent = (scale * 100.0).floor() as u32;
        tracing::debug!(
            percent,
            clusters = clusters.len(),
            "scaling bubbles down to fit canvas"
        );
        Some(percent)
    } else {
        None
    };

    ScaleFit {
        scale,
        child_radius: (cfg.base_child_radius * scale).max(cfg.child_radius_floor),
        min_parent_radius: (cfg.base_min_parent_radius * scale).max(cfg.parent_radius_floor),
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_items;
    use crate::types::Item;

    fn tagged_items(n: usize, tags_per_group: usize) -> Vec<Item> {
        (0..n)
            .map(|i| {
                Item::new(
                    format!("item-{i}"),
                    vec![format!("#tag{}", i % tags_per_group)],
                    1.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_parent_radius_floor_applies() {
        assert_eq!(parent_radius(0, 25.0, 100.0, 1.6), 100.0);
        assert_eq!(parent_radius(2, 25.0, 100.0, 1.6), 100.0);
    }

    #[test]
    fn test_parent_radius_grows_with_children() {
        let cfg = LayoutConfig::default();
        let small = parent_radius(8, 25.0, 100.0, cfg.pack_spacing);
        let large = parent_radius(20, 25.0, 100.0, cfg.pack_spacing);
        assert!(large > small);
        // 20 children: sqrt(25^2 * 20 * 1.6) = 25 * sqrt(32)
        assert!((large - 25.0 * 32.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_no_scaling_when_plenty_of_room() {
        let cfg = LayoutConfig::default();
        let clusters = group_items(&tagged_items(6, 2));
        let fit = fit_scale(&clusters, 2000.0, 1500.0, &cfg);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.percent, None);
        assert_eq!(fit.child_radius, cfg.base_child_radius);
        assert_eq!(fit.min_parent_radius, cfg.base_min_parent_radius);
    }

    #[test]
    fn test_scaling_kicks_in_and_respects_floors() {
        let cfg = LayoutConfig::default();
        let clusters = group_items(&tagged_items(1000, 100));
        let fit = fit_scale(&clusters, 1000.0, 800.0, &cfg);
        assert!(fit.scale < 1.0);
        let percent = fit.percent.expect("scaled layout reports a percent");
        assert!(percent < 100);
        assert!(fit.child_radius >= cfg.child_radius_floor);
        assert!(fit.min_parent_radius >= cfg.parent_radius_floor);
    }

    #[test]
    fn test_scale_monotone_in_item_count() {
        let cfg = LayoutConfig::default();
        let mut prev = f64::INFINITY;
        for n in [10, 20, 40, 80, 160, 320] {
            let clusters = group_items(&tagged_items(n, 8));
            let fit = fit_scale(&clusters, 1200.0, 900.0, &cfg);
            assert!(fit.scale <= prev);
            prev = fit.scale;
        }
    }
}
