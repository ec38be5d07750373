use std::f64::consts::TAU;

use rand::Rng;

use crate::types::{LayoutConfig, Position};

/// Child offsets for one cluster, relative to the parent center.
#[derive(Debug, Clone)]
pub struct Placement {
    pub offsets: Vec<Position>,
    /// How many children could not be placed with full separation and took a
    /// best-effort position instead.
    pub fallbacks: usize,
}

/// Sample non-overlapping offsets for `count` children inside a parent of
/// `parent_radius`.
///
/// Rejection sampling with a hard minimum separation of
/// `2 * child_radius + safety_margin`. A child that exhausts its attempt
/// budget takes the candidate with the largest minimum distance to its
/// neighbors, or, if nothing was tracked, a point on an evenly divided ring.
/// Every child always gets an offset; offsets stay fixed for the lifetime of
/// the data snapshot.
pub fn place_children<R: Rng>(
    rng: &mut R,
    count: usize,
    parent_radius: f64,
    child_radius: f64,
    cfg: &LayoutConfig,
) -> Placement {
    if count == 0 {
        return Placement {
            offsets: Vec::new(),
            fallbacks: 0,
        };
    }
    if count == 1 {
        return Placement {
            offsets: vec![Position::default()],
            fallbacks: 0,
        };
    }

    let max_radius = (parent_radius - child_radius - cfg.safety_margin).max(0.0);
    let min_distance = child_radius * 2.0 + cfg.safety_margin;

    let mut offsets: Vec<Position> = Vec::with_capacity(count);
    let mut fallbacks = 0;

    for i in 0..count {
        let mut placed = false;
        let mut best: Option<(Position, f64)> = None;

        for _ in 0..cfg.max_place_attempts {
            let angle = rng.gen_range(0.0..TAU);
            // sqrt keeps the samples area-uniform instead of clumping at the
            // center
            let r = rng.gen_range(0.0..1.0f64).sqrt() * max_radius;
            let candidate = Position::new(angle.cos() * r, angle.sin() * r);

            let min_to_others = offsets
                .iter()
                .map(|p| candidate.distance(p))
                .fold(f64::INFINITY, f64::min);

            if min_to_others >= min_distance {
                offsets.push(candidate);
                placed = true;
                break;
            }
            if best.map_or(true, |(_, d)| min_to_others > d) {
                best = Some((candidate, min_to_others));
            }
        }

        if !placed {
            fallbacks += 1;
            match best {
                Some((candidate, _)) => offsets.push(candidate),
                None => {
                    // Evenly spaced ring, last resort
                    let angle = (i as f64 / count as f64) * TAU;
                    let r = max_radius * 0.8;
                    offsets.push(Position::new(angle.cos() * r, angle.sin() * r));
                }
            }
        }
    }

    if fallbacks > 0 {
        tracing::debug!(
            fallbacks,
            count,
            parent_radius,
            "child placement exhausted attempts, used best-effort positions"
        );
    }

    Placement { offsets, fallbacks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_and_single_child() {
        let cfg = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(place_children(&mut rng, 0, 100.0, 25.0, &cfg).offsets.is_empty());

        let one = place_children(&mut rng, 1, 100.0, 25.0, &cfg);
        assert_eq!(one.offsets, vec![Position::default()]);
        assert_eq!(one.fallbacks, 0);
    }

    #[test]
    fn test_children_respect_hard_separation() {
        let cfg = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let placement = place_children(&mut rng, 3, 100.0, 15.0, &cfg);
        assert_eq!(placement.offsets.len(), 3);
        assert_eq!(placement.fallbacks, 0);

        let min_distance = 15.0 * 2.0 + cfg.safety_margin;
        for i in 0..placement.offsets.len() {
            for j in (i + 1)..placement.offsets.len() {
                let d = placement.offsets[i].distance(&placement.offsets[j]);
                assert!(d >= min_distance, "children {i} and {j} too close: {d}");
            }
        }
    }

    #[test]
    fn test_children_stay_inside_parent() {
        let cfg = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let placement = place_children(&mut rng, 6, 120.0, 20.0, &cfg);
        for offset in &placement.offsets {
            let dist = offset.distance(&Position::default());
            assert!(dist <= 120.0 - 20.0 + 1e-9);
        }
    }

    #[test]
    fn test_every_child_gets_an_offset_even_when_overcrowded() {
        let cfg = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        // Far too many children for the parent; the sampler must degrade
        // instead of failing.
        let placement = place_children(&mut rng, 40, 70.0, 25.0, &cfg);
        assert_eq!(placement.offsets.len(), 40);
        assert!(placement.fallbacks > 0);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let cfg = LayoutConfig::default();
        let a = place_children(&mut StdRng::seed_from_u64(3), 8, 150.0, 20.0, &cfg);
        let b = place_children(&mut StdRng::seed_from_u64(3), 8, 150.0, 20.0, &cfg);
        assert_eq!(a.offsets, b.offsets);
    }
}
