//! Integration test: lay out the real skills document and focus a node.

use std::collections::HashSet;

use scrollwork_core::graph::{GraphFocus, default_cross_links, generate_graph, parse_skills};
use scrollwork_protocol::{CrossLink, NodeKind, SkillCategory, SkillGraph};

fn resume_graph() -> SkillGraph {
    let data = include_bytes!("fixtures/skills.json");
    let categories = parse_skills(data).expect("failed to parse skills fixture");
    generate_graph(&categories, &default_cross_links())
}

fn id_of<'a>(graph: &'a SkillGraph, label: &str) -> &'a str {
    graph
        .nodes
        .iter()
        .find(|n| n.label == label)
        .map(|n| n.id.as_str())
        .unwrap_or_else(|| panic!("no node labelled {label}"))
}

#[test]
fn two_small_categories_make_eight_nodes() {
    let input = vec![
        SkillCategory {
            category: "Languages".into(),
            items: vec!["Rust".into(), "Go".into(), "Zig".into()],
        },
        SkillCategory {
            category: "Tools".into(),
            items: vec!["Git".into(), "Nix".into(), "Make".into()],
        },
    ];
    let graph = generate_graph(&input, &[]);

    assert_eq!(graph.nodes.len(), 8);
    let categories = graph.nodes.iter().filter(|n| n.kind == NodeKind::Category).count();
    assert_eq!(categories, 2);
    for node in &graph.nodes {
        assert!((5.0..=95.0).contains(&node.position.x), "{}", node.id);
        assert!((5.0..=95.0).contains(&node.position.y), "{}", node.id);
    }
    for category in &input {
        let category_id = id_of(&graph, &category.category);
        for item in &category.items {
            let skill_id = id_of(&graph, item);
            assert!(
                graph.links.iter().any(|l| l.source == category_id && l.target == skill_id),
                "{item} is not linked to {}",
                category.category
            );
        }
    }
}

#[test]
fn resume_graph_resolves_the_cross_links_it_can() {
    let graph = resume_graph();

    // 5 categories, 37 skills.
    assert_eq!(graph.nodes.len(), 42);
    // 37 membership links, plus 9 of the 11 default cross-links: nothing
    // on the resume is labelled "Spring Boot" or "JNI".
    assert_eq!(graph.links.len(), 46);

    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), graph.nodes.len());
    for link in &graph.links {
        assert!(ids.contains(link.source.as_str()));
        assert!(ids.contains(link.target.as_str()));
        assert_ne!(link.source, link.target);
    }

    let java = id_of(&graph, "Java");
    let android = id_of(&graph, "Android SDK/NDK");
    assert!(graph.links.iter().any(|l| l.source == java && l.target == android));
    let java_node = graph.node(java).expect("java node");
    assert!(java_node.connections.iter().any(|c| c == android));
}

#[test]
fn repeated_cross_links_are_added_once() {
    let data = include_bytes!("fixtures/skills.json");
    let categories = parse_skills(data).expect("failed to parse skills fixture");
    let links = vec![
        CrossLink::new("Docker", "AWS"),
        CrossLink::new("AWS", "Docker"),
        CrossLink::new("Docker", "Docker"),
    ];
    let graph = generate_graph(&categories, &links);
    assert_eq!(graph.links.len(), 37 + 1);
}

#[test]
fn focusing_a_skill_highlights_its_neighbourhood() {
    let graph = resume_graph();
    let sql = graph
        .nodes
        .iter()
        .find(|n| n.label == "SQL")
        .map(|n| n.id.clone())
        .expect("sql node");

    let mut focus = GraphFocus::new();
    focus.hover(&sql);
    let emphasis = focus.emphasis(&graph);

    let highlighted: Vec<&str> = graph
        .nodes
        .iter()
        .zip(&emphasis.nodes)
        .filter(|(_, e)| e.highlighted)
        .map(|(n, _)| n.label.as_str())
        .collect();
    assert_eq!(highlighted.len(), 4, "{highlighted:?}");
    for label in ["Languages", "SQL", "PostgreSQL", "MySQL"] {
        assert!(highlighted.contains(&label), "{label} missing from {highlighted:?}");
    }
    let connected = emphasis.links.iter().filter(|l| l.connected).count();
    assert_eq!(connected, 3);

    // Locking survives hovering elsewhere.
    focus.click_node(&sql);
    focus.hover(&graph.nodes[0].id);
    assert_eq!(focus.focus(), Some(&sql));
    focus.click_background();
    assert_eq!(focus.focus(), Some(&graph.nodes[0].id));
}
