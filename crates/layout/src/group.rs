use std::collections::HashMap;

use crate::types::{Cluster, Item};

/// Tag assigned to items that carry no tags of their own.
pub const DEFAULT_TAG: &str = "#general";

/// Clusters below this population are dropped from the layout.
pub const MIN_CLUSTER_SIZE: usize = 2;

/// Partition items into per-tag clusters.
///
/// An item with N tags joins all N clusters; untagged items join the
/// [`DEFAULT_TAG`] cluster. Cluster order is first-seen tag order, member
/// order is input order. Clusters with fewer than [`MIN_CLUSTER_SIZE`]
/// members are discarded, members included.
pub fn group_items(items: &[Item]) -> Vec<Cluster> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();

    for (idx, item) in items.iter().enumerate() {
        if item.tags.is_empty() {
            if !groups.contains_key(DEFAULT_TAG) {
                order.push(DEFAULT_TAG);
            }
            groups.entry(DEFAULT_TAG).or_default().push(idx);
        } else {
            for tag in &item.tags {
                if !groups.contains_key(tag.as_str()) {
                    order.push(tag.as_str());
                }
                groups.entry(tag.as_str()).or_default().push(idx);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|tag| {
            let members = groups.remove(tag)?;
            if members.len() < MIN_CLUSTER_SIZE {
                return None;
            }
            let total_weight = members.iter().map(|&i| items[i].weight).sum();
            Some(Cluster {
                label: tag.to_string(),
                members,
                total_weight,
            })
        })
        .collect()
}
