//! Turns a clustering result into positioned group/label/child nodes.
//!
//! Topics become side-by-side boxes starting at the layout origin. Each box is
//! preceded by its caption and followed by its documents, which alternate
//! between the left and right edge while stepping down.

use std::collections::HashSet;

use log::{debug, warn};
use serde_json::Value;

use super::config::ClusterLayout;
use super::error::ClusterDataError;
use super::types::{ClusteringResult, GraphNode, Topic};

impl ClusteringResult {
	/// Decodes an API payload. Only the top-level shape is checked; bad fields
	/// inside degrade to defaults.
	pub fn from_value(value: &Value) -> Result<Self, ClusterDataError> {
		if !value.is_object() {
			return Err(ClusterDataError::NotAnObject(json_kind(value)));
		}
		Ok(serde_json::from_value::<Self>(value.clone())?)
	}

	/// Parses and decodes JSON text; see [`ClusteringResult::from_value`].
	pub fn from_json(text: &str) -> Result<Self, ClusterDataError> {
		let value: Value = serde_json::from_str(text)?;
		Self::from_value(&value)
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Builds the node list for `result`; `None` yields an empty list.
///
/// The output is a pure function of the input: same result and layout, same
/// nodes in the same order.
pub fn build_cluster_nodes(result: Option<&ClusteringResult>, layout: &ClusterLayout) -> Vec<GraphNode> {
	let Some(result) = result else {
		return Vec::new();
	};

	let capacity = result.topics.iter().map(|t| t.documents.len() + 2).sum();
	let mut nodes = Vec::with_capacity(capacity);
	for (index, topic) in result.topics.iter().enumerate() {
		push_topic(&mut nodes, index, topic, layout);
	}

	let duplicates = find_duplicate_ids(&nodes);
	if !duplicates.is_empty() {
		warn!(
			"clustering '{}' produced duplicate node ids: {:?}",
			result.id, duplicates
		);
	}
	debug!(
		"built {} nodes for {} topics of clustering '{}'",
		nodes.len(),
		result.topics.len(),
		result.id
	);
	nodes
}

fn push_topic(nodes: &mut Vec<GraphNode>, index: usize, topic: &Topic, layout: &ClusterLayout) {
	nodes.push(GraphNode::group(
		&topic.id,
		&topic.title,
		layout.topic_position(index),
		layout.topic_size(topic.documents.len()),
	));
	nodes.push(GraphNode::group_label(
		format!("{}-label", topic.id),
		&topic.id,
		&topic.title,
		layout.label_offset(),
	));
	for (j, document) in topic.documents.iter().enumerate() {
		nodes.push(GraphNode::group_child(
			&document.id,
			&topic.id,
			document.display_label(),
			layout.document_offset(j),
		));
	}
}

/// Builds from a raw JSON value. `null`, non-objects and objects without a
/// topic array all give an empty list.
pub fn build_cluster_nodes_from_value(value: &Value, layout: &ClusterLayout) -> Vec<GraphNode> {
	if value.is_null() {
		return Vec::new();
	}
	match ClusteringResult::from_value(value) {
		Ok(result) => build_cluster_nodes(Some(&result), layout),
		Err(err) => {
			warn!("ignoring clustering payload: {err}");
			Vec::new()
		}
	}
}

/// Builds from JSON text; undecodable text gives an empty list.
pub fn build_cluster_nodes_from_json(text: &str, layout: &ClusterLayout) -> Vec<GraphNode> {
	match serde_json::from_str::<Value>(text) {
		Ok(value) => build_cluster_nodes_from_value(&value, layout),
		Err(err) => {
			warn!("ignoring clustering payload: {}", ClusterDataError::from(err));
			Vec::new()
		}
	}
}

/// Ids that occur more than once, in order of their second occurrence.
///
/// Topic, caption and document ids share one namespace and the builder does
/// not rename on collision.
pub fn find_duplicate_ids(nodes: &[GraphNode]) -> Vec<String> {
	let mut seen = HashSet::with_capacity(nodes.len());
	let mut reported = HashSet::new();
	let mut duplicates = Vec::new();
	for node in nodes {
		if !seen.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
			duplicates.push(node.id.clone());
		}
	}
	duplicates
}
