//! Hover and click-to-lock emphasis for the skills graph.

use scrollwork_protocol::{NodeId, SkillGraph};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeEmphasis {
    pub scale: f64,
    pub opacity: f64,
    /// Focused or directly connected to the focus.
    pub highlighted: bool,
}

impl Default for NodeEmphasis {
    fn default() -> Self {
        Self {
            scale: 1.0,
            opacity: 1.0,
            highlighted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkEmphasis {
    pub opacity: f64,
    pub connected: bool,
}

/// Per-node and per-link emphasis, index-aligned with the graph's lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Emphasis {
    pub nodes: Vec<NodeEmphasis>,
    pub links: Vec<LinkEmphasis>,
}

/// Which node drives the graph's emphasis.
///
/// A clicked node stays locked until it is clicked again or the background
/// is clicked; while locked, hovering other nodes changes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphFocus {
    hovered: Option<NodeId>,
    locked: Option<NodeId>,
}

impl GraphFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover(&mut self, id: &NodeId) {
        self.hovered = Some(id.clone());
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    pub fn click_node(&mut self, id: &NodeId) {
        if self.locked.as_ref() == Some(id) {
            self.locked = None;
        } else {
            self.locked = Some(id.clone());
        }
    }

    pub fn click_background(&mut self) {
        self.locked = None;
    }

    pub fn locked(&self) -> Option<&NodeId> {
        self.locked.as_ref()
    }

    pub fn focus(&self) -> Option<&NodeId> {
        self.locked.as_ref().or(self.hovered.as_ref())
    }

    pub fn emphasis(&self, graph: &SkillGraph) -> Emphasis {
        let focus = self.focus();
        let nodes = graph
            .nodes
            .iter()
            .map(|node| {
                let Some(focus) = focus else {
                    return NodeEmphasis::default();
                };
                if node.id == *focus {
                    NodeEmphasis {
                        scale: 1.3,
                        opacity: 1.0,
                        highlighted: true,
                    }
                } else if node.connections.contains(focus) {
                    NodeEmphasis {
                        scale: 1.1,
                        opacity: 1.0,
                        highlighted: true,
                    }
                } else {
                    NodeEmphasis {
                        scale: 0.8,
                        opacity: 0.2,
                        highlighted: false,
                    }
                }
            })
            .collect();
        let links = graph
            .links
            .iter()
            .map(|link| match focus {
                None => LinkEmphasis {
                    opacity: 0.2,
                    connected: false,
                },
                Some(f) if link.touches(f.as_str()) => LinkEmphasis {
                    opacity: 0.8,
                    connected: true,
                },
                Some(_) => LinkEmphasis {
                    opacity: 0.05,
                    connected: false,
                },
            })
            .collect();
        Emphasis { nodes, links }
    }
}

#[cfg(test)]
mod tests {
    use scrollwork_protocol::SkillCategory;

    use super::*;
    use crate::graph::generate_graph;

    fn graph() -> SkillGraph {
        let input = vec![
            SkillCategory {
                category: "Languages".into(),
                items: vec!["Rust".into(), "Go".into()],
            },
            SkillCategory {
                category: "Tools".into(),
                items: vec!["Cargo".into()],
            },
        ];
        generate_graph(&input, &[])
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn neutral_without_focus() {
        let g = graph();
        let e = GraphFocus::new().emphasis(&g);
        assert!(e.nodes.iter().all(|n| *n == NodeEmphasis::default()));
        assert!(e.links.iter().all(|l| l.opacity == 0.2));
    }

    #[test]
    fn hover_highlights_neighbours_and_dims_the_rest() {
        let g = graph();
        let mut focus = GraphFocus::new();
        focus.hover(&id("skill-Rust"));
        let e = focus.emphasis(&g);
        let at = |name: &str| {
            let i = g.nodes.iter().position(|n| n.id == name).unwrap_or(usize::MAX);
            e.nodes.get(i).copied().unwrap_or_default()
        };
        assert_eq!(at("skill-Rust").scale, 1.3);
        assert_eq!(at("cat-Languages").scale, 1.1);
        assert_eq!(at("skill-Go").scale, 0.8);
        assert_eq!(at("skill-Go").opacity, 0.2);
        assert_eq!(at("cat-Tools").opacity, 0.2);

        let connected = e.links.iter().filter(|l| l.connected).count();
        assert_eq!(connected, 1);
        assert!(e.links.iter().filter(|l| !l.connected).all(|l| l.opacity == 0.05));
    }

    #[test]
    fn click_locks_until_clicked_again_or_background() {
        let mut focus = GraphFocus::new();
        focus.click_node(&id("cat-Tools"));
        focus.hover(&id("skill-Rust"));
        assert_eq!(focus.focus(), Some(&id("cat-Tools")));

        focus.click_node(&id("cat-Tools"));
        assert_eq!(focus.focus(), Some(&id("skill-Rust")));

        focus.click_node(&id("skill-Go"));
        focus.click_background();
        focus.unhover();
        assert_eq!(focus.focus(), None);
    }
}
