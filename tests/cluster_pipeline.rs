use codex_cluster_graph::layout::{
	ClusterLayout, ClusteringResult, GraphEdge, GraphNode, NodeKind, Position, RelayoutConfig,
	build_cluster_nodes, build_cluster_nodes_from_json, relayout,
};
use serde_json::json;

const PAYLOAD: &str = r#"{
	"id": 17,
	"title": "Quarterly reports",
	"topics": [
		{
			"id": "t1",
			"title": "Foo",
			"documents": [
				{ "id": "d1", "title": "A", "file_name": "a.pdf" },
				{ "id": "d2", "title": "B", "file_name": "b.pdf" },
				{ "id": "d3", "title": "C", "file_name": "c.pdf" }
			]
		},
		{ "id": "t2", "title": "Empty", "documents": [] },
		{ "id": "t3", "title": "Loose", "documents": null }
	]
}"#;

#[test]
fn api_payload_builds_expected_nodes() {
	let nodes = build_cluster_nodes_from_json(PAYLOAD, &ClusterLayout::default());
	assert_eq!(nodes.len(), 9);

	let t1 = &nodes[0];
	assert_eq!((t1.id.as_str(), t1.kind), ("t1", NodeKind::Group));
	assert_eq!(t1.position, Position::new(100.0, 100.0));
	assert_eq!(t1.size.map(|s| (s.width, s.height)), Some((400.0, 550.0)));

	let children: Vec<(&str, f64, f64)> = nodes
		.iter()
		.filter(|n| n.kind == NodeKind::GroupChild)
		.map(|n| (n.id.as_str(), n.position.x, n.position.y))
		.collect();
	assert_eq!(
		children,
		[("d1", 10.0, 50.0), ("d2", 350.0, 200.0), ("d3", 10.0, 350.0)]
	);

	for topic in ["t2", "t3"] {
		let group = nodes.iter().find(|n| n.id == topic).unwrap();
		assert_eq!(group.size.unwrap().height, 100.0);
	}
}

#[test]
fn decoded_result_matches_json_entry_point() {
	let result = ClusteringResult::from_json(PAYLOAD).unwrap();
	assert_eq!(result.id, "17");
	assert_eq!(
		build_cluster_nodes(Some(&result), &ClusterLayout::default()),
		build_cluster_nodes_from_json(PAYLOAD, &ClusterLayout::default())
	);
}

#[test]
fn node_json_uses_renderer_field_names() {
	let nodes = build_cluster_nodes_from_json(PAYLOAD, &ClusterLayout::default());
	let value = serde_json::to_value(&nodes[1]).unwrap();
	assert_eq!(
		value,
		json!({
			"id": "t1-label",
			"kind": "groupLabel",
			"label": "Foo",
			"position": { "x": 0.0, "y": -40.0 },
			"parentId": "t1"
		})
	);
	let back: GraphNode = serde_json::from_value(value).unwrap();
	assert_eq!(back, nodes[1]);
}

#[test]
fn builder_output_survives_relayout() {
	let nodes = build_cluster_nodes_from_json(PAYLOAD, &ClusterLayout::default());
	let edges = vec![
		GraphEdge::new("e1", "t1", "t2"),
		GraphEdge {
			label: Some("related".into()),
			..GraphEdge::new("e2", "t2", "t3")
		},
	];
	let snapshot = edges.clone();

	let out = relayout(&nodes, &edges, &RelayoutConfig::default());

	assert_eq!(edges, snapshot);
	assert_eq!(out.edges, snapshot);
	let ids_in: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let ids_out: Vec<&str> = out.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids_in, ids_out);
	for (before, after) in nodes.iter().zip(&out.nodes) {
		assert_eq!(before.kind, after.kind);
		assert_eq!(before.label, after.label);
		assert_eq!(before.size, after.size);
		assert_eq!(before.parent_id, after.parent_id);
		assert_eq!(before.confined_to_parent, after.confined_to_parent);
		assert!(after.position.x.is_finite() && after.position.y.is_finite());
	}
}

#[test]
fn relayout_is_reproducible() {
	let nodes = build_cluster_nodes_from_json(PAYLOAD, &ClusterLayout::default());
	let edges = [GraphEdge::new("e", "d1", "d3")];
	let config = RelayoutConfig {
		iterations: 120,
		..RelayoutConfig::default()
	};
	assert_eq!(
		relayout(&nodes, &edges, &config),
		relayout(&nodes, &edges, &config)
	);
}

#[test]
fn empty_inputs_degrade_to_empty_output() {
	let layout = ClusterLayout::default();
	assert!(build_cluster_nodes_from_json("null", &layout).is_empty());
	assert!(build_cluster_nodes_from_json(r#"{"topics": 3}"#, &layout).is_empty());
	assert!(build_cluster_nodes_from_json("", &layout).is_empty());

	let edges = [GraphEdge::new("e", "a", "b")];
	let out = relayout::<GraphNode>(&[], &edges, &RelayoutConfig::default());
	assert!(out.nodes.is_empty());
	assert_eq!(out.edges, edges);
}
