//! Deterministic skills-graph layout.
//!
//! Categories sit at fixed centers; their skills sit on a zig-zag ring
//! around them. Every coordinate is clamped to `[5, 95]` percent and rounded
//! to four decimals, so two independent runs over the same input produce
//! identical output.

pub mod focus;

use std::collections::HashSet;
use std::f64::consts::TAU;

use scrollwork_protocol::{
    CrossLink, GraphLink, GraphNode, NodeId, NodeKind, Point, SkillCategory, SkillGraph,
    ThemeToken,
};
use thiserror::Error;

pub use focus::{Emphasis, GraphFocus, LinkEmphasis, NodeEmphasis};

#[derive(Debug, Error)]
pub enum GraphInputError {
    #[error("invalid skills JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("category {index} has an empty name")]
    UnnamedCategory { index: usize },
}

pub const CATEGORY_CENTERS: [(f64, f64); 5] = [
    (50.0, 50.0),
    (20.0, 30.0),
    (80.0, 30.0),
    (20.0, 70.0),
    (80.0, 70.0),
];

const RING_RADIUS: f64 = 15.0;
const RING_BONUS: f64 = 5.0;
/// Ring rotation per category index, radians.
const RING_OFFSET: f64 = 0.5;
/// Horizontal stretch for the wide aspect of the graph area.
const X_STRETCH: f64 = 1.8;
const CATEGORY_SIZE: f64 = 60.0;
const SKILL_SIZE: f64 = 30.0;

pub const DEFAULT_CROSS_LINKS: [(&str, &str); 11] = [
    ("Java", "Android SDK/NDK"),
    ("Java", "Spring Boot"),
    ("Kotlin", "Android SDK/NDK"),
    ("C++", "Embedded Linux"),
    ("C++", "JNI"),
    ("Linux Daemons", "Embedded Linux"),
    ("React", "Next.js"),
    ("TypeScript", "React"),
    ("SQL", "PostgreSQL"),
    ("SQL", "MySQL"),
    ("Docker", "AWS"),
];

pub fn default_cross_links() -> Vec<CrossLink> {
    DEFAULT_CROSS_LINKS
        .iter()
        .map(|&(from, to)| CrossLink::new(from, to))
        .collect()
}

/// Parse the `[{ "category", "items" }]` skills document.
pub fn parse_skills(data: &[u8]) -> Result<Vec<SkillCategory>, GraphInputError> {
    let categories: Vec<SkillCategory> = serde_json::from_slice(data)?;
    if let Some(index) = categories.iter().position(|c| c.category.trim().is_empty()) {
        return Err(GraphInputError::UnnamedCategory { index });
    }
    Ok(categories)
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn place(v: f64) -> f64 {
    round4(v.clamp(5.0, 95.0))
}

/// Hands out ids derived from labels; repeats get a `-2`, `-3`, ... suffix.
#[derive(Default)]
struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    fn allocate(&mut self, prefix: &str, label: &str) -> NodeId {
        let base = format!("{prefix}-{label}");
        let mut id = base.clone();
        let mut n = 2;
        while !self.taken.insert(id.clone()) {
            id = format!("{base}-{n}");
            n += 1;
        }
        NodeId::from(id)
    }
}

/// The first node whose label equals `label`, else the first whose label
/// contains it.
fn resolve(nodes: &[GraphNode], label: &str) -> Option<usize> {
    nodes
        .iter()
        .position(|n| n.label == label)
        .or_else(|| nodes.iter().position(|n| n.label.contains(label)))
}

fn connect(node: &mut GraphNode, other: &NodeId) {
    if !node.connections.contains(other) {
        node.connections.push(other.clone());
    }
}

/// Lay out the skills graph.
///
/// Cross-links whose labels do not resolve are dropped; in debug builds each
/// drop is logged.
pub fn generate_graph(categories: &[SkillCategory], cross_links: &[CrossLink]) -> SkillGraph {
    let mut ids = IdAllocator::default();
    let mut nodes = Vec::new();
    let mut links = Vec::new();

    for (index, category) in categories.iter().enumerate() {
        let (cx, cy) = CATEGORY_CENTERS[index % CATEGORY_CENTERS.len()];
        let color = ThemeToken::PALETTE[index % ThemeToken::PALETTE.len()];
        let category_id = ids.allocate("cat", &category.category);
        let category_at = nodes.len();
        nodes.push(GraphNode {
            id: category_id.clone(),
            label: category.category.clone(),
            kind: NodeKind::Category,
            position: Point::new(round4(cx), round4(cy)),
            color,
            size: CATEGORY_SIZE,
            connections: Vec::new(),
        });

        let step = TAU / category.items.len().max(1) as f64;
        for (i, skill) in category.items.iter().enumerate() {
            let angle = i as f64 * step + index as f64 * RING_OFFSET;
            let radius = RING_RADIUS + if i % 2 == 1 { RING_BONUS } else { 0.0 };
            let skill_id = ids.allocate("skill", skill);
            nodes.push(GraphNode {
                id: skill_id.clone(),
                label: skill.clone(),
                kind: NodeKind::Skill,
                position: Point::new(
                    place(cx + radius * angle.cos() * X_STRETCH),
                    place(cy + radius * angle.sin()),
                ),
                color,
                size: SKILL_SIZE,
                connections: vec![category_id.clone()],
            });
            nodes[category_at].connections.push(skill_id.clone());
            links.push(GraphLink {
                source: category_id.clone(),
                target: skill_id,
            });
        }
    }

    for link in cross_links {
        let (Some(a), Some(b)) = (resolve(&nodes, &link.from), resolve(&nodes, &link.to))
        else {
            if cfg!(debug_assertions) {
                tracing::warn!(from = %link.from, to = %link.to, "cross-link target missing");
            }
            continue;
        };
        if a == b {
            continue;
        }
        let source = nodes[a].id.clone();
        let target = nodes[b].id.clone();
        let exists = links.iter().any(|l: &GraphLink| {
            (l.source == source && l.target == target)
                || (l.source == target && l.target == source)
        });
        if exists {
            continue;
        }
        connect(&mut nodes[a], &target);
        connect(&mut nodes[b], &source);
        links.push(GraphLink { source, target });
    }

    SkillGraph { nodes, links }
}
