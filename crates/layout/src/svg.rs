use std::fs;
use std::io;
use std::path::Path;

use crate::snapshot::LayoutSnapshot;

const PALETTE: [&str; 10] = [
    "#667eea", "#f093fb", "#4facfe", "#43e97b", "#fa709a", "#fee140", "#30cfd0", "#a8edea",
    "#ff6b6b", "#feca57",
];

/// Stable label → palette color, same hash the reference UI uses.
fn color_for_label(label: &str) -> &'static str {
    let mut hash: i32 = 0;
    for ch in label.chars() {
        hash = (ch as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    PALETTE[hash.unsigned_abs() as usize % PALETTE.len()]
}

/// Render a snapshot as a standalone SVG document. Debug aid for the CLI and
/// tests; carries no layout semantics.
pub fn snapshot_to_svg(snapshot: &LayoutSnapshot) -> String {
    let mut svg = format!(
        r##"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">
<rect width="100%" height="100%" fill="#111118"/>
"##,
        snapshot.width, snapshot.height
    );

    for parent in &snapshot.parents {
        let color = color_for_label(&parent.label);
        svg.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="0.1" stroke="{}" stroke-width="3"/>
<text x="{}" y="{}" font-family="Arial" font-size="14" text-anchor="middle" fill="{}">{} ({})</text>
"#,
            parent.x,
            parent.y,
            parent.radius,
            color,
            color,
            parent.x,
            parent.y - parent.radius - 15.0,
            color,
            parent.label,
            parent.count
        ));
    }

    for child in &snapshot.children {
        let color = snapshot
            .parents
            .get(child.parent)
            .map(|p| color_for_label(&p.label))
            .unwrap_or("#999999");
        svg.push_str(&format!(
            r##"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="0.9" stroke="#fff" stroke-width="2"/>
"##,
            child.x, child.y, child.radius, color
        ));
    }

    if let Some(percent) = snapshot.stats.scale_percent {
        svg.push_str(&format!(
            r##"<text x="20" y="30" font-family="Arial" font-size="12" fill="#999">auto-scaled to {}% - {} topics, {} posts</text>
"##,
            percent, snapshot.stats.cluster_count, snapshot.stats.item_count
        ));
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_svg(snapshot: &LayoutSnapshot, path: impl AsRef<Path>) -> io::Result<()> {
    fs::write(path, snapshot_to_svg(snapshot))
}
