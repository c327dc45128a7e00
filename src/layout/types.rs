//! Clustering input records and the flat node/edge lists handed to a renderer.
//!
//! Input records come straight from the clustering API as JSON and are decoded
//! leniently: ids may be strings or numbers, and collections that are missing,
//! `null` or not arrays decode as empty.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One clustering run: an ordered list of topics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
	/// Run id; numeric ids are kept as their decimal text.
	#[serde(default, deserialize_with = "lenient_text")]
	pub id: String,
	/// Human-readable name of the run.
	#[serde(default, deserialize_with = "lenient_text")]
	pub title: String,
	/// Topic order drives left-to-right placement.
	#[serde(default, deserialize_with = "lenient_seq")]
	pub topics: Vec<Topic>,
}

/// A cluster of related documents.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
	/// Becomes the id of the topic's group node.
	#[serde(default, deserialize_with = "lenient_text")]
	pub id: String,
	/// Caption text.
	#[serde(default, deserialize_with = "lenient_text")]
	pub title: String,
	/// Document order drives the zig-zag inside the topic box.
	#[serde(default, deserialize_with = "lenient_seq")]
	pub documents: Vec<DocumentRef>,
}

/// A document assigned to a topic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
	/// Becomes the id of the document's leaf node.
	#[serde(default, deserialize_with = "lenient_text")]
	pub id: String,
	/// Display title, if the document has one.
	#[serde(default, deserialize_with = "lenient_optional_text")]
	pub title: Option<String>,
	/// Stored file name; the label when there is no title.
	#[serde(default, deserialize_with = "lenient_text")]
	pub file_name: String,
}

impl DocumentRef {
	/// The title when it is present and non-empty, otherwise the file name.
	pub fn display_label(&self) -> &str {
		match self.title.as_deref() {
			Some(title) if !title.is_empty() => title,
			_ => &self.file_name,
		}
	}
}

/// A point in graph space, y pointing down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Position {
	/// A position at (`x`, `y`).
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Extent of a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

/// What a [`GraphNode`] stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
	/// Topic container.
	Group,
	/// Topic caption, drawn above the container.
	GroupLabel,
	/// Document leaf inside a container.
	GroupChild,
}

/// A positioned node. Nodes live in one flat list; `parent_id` is resolved by
/// id lookup and makes `position` an offset from the parent's origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Lookup key; children name their parent by it.
	pub id: String,
	/// Node role.
	pub kind: NodeKind,
	/// Text drawn for the node.
	pub label: String,
	/// Top-left corner; relative to the parent when there is one.
	pub position: Position,
	/// Box extent; only groups carry one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<Size>,
	/// Id of the containing group.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
	/// The renderer must keep the node inside its parent while dragging.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub confined_to_parent: bool,
}

impl GraphNode {
	/// A top-level topic container.
	pub fn group(id: impl Into<String>, label: impl Into<String>, position: Position, size: Size) -> Self {
		Self {
			id: id.into(),
			kind: NodeKind::Group,
			label: label.into(),
			position,
			size: Some(size),
			parent_id: None,
			confined_to_parent: false,
		}
	}

	/// A caption positioned relative to `parent_id`.
	pub fn group_label(
		id: impl Into<String>,
		parent_id: impl Into<String>,
		label: impl Into<String>,
		position: Position,
	) -> Self {
		Self {
			id: id.into(),
			kind: NodeKind::GroupLabel,
			label: label.into(),
			position,
			size: None,
			parent_id: Some(parent_id.into()),
			confined_to_parent: false,
		}
	}

	/// A document leaf confined to `parent_id`.
	pub fn group_child(
		id: impl Into<String>,
		parent_id: impl Into<String>,
		label: impl Into<String>,
		position: Position,
	) -> Self {
		Self {
			id: id.into(),
			kind: NodeKind::GroupChild,
			label: label.into(),
			position,
			size: None,
			parent_id: Some(parent_id.into()),
			confined_to_parent: true,
		}
	}
}

/// A directed link between two node ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
	/// Edge id.
	pub id: String,
	/// Id of the node the edge starts at.
	pub source: String,
	/// Id of the node the edge ends at.
	pub target: String,
	/// Optional text drawn along the edge.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl GraphEdge {
	/// An unlabelled edge.
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			label: None,
		}
	}
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Option<String>, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	})
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let Value::Array(items) = Value::deserialize(deserializer)? else {
		return Ok(Vec::new());
	};
	Ok(items
		.into_iter()
		.filter(Value::is_object)
		.filter_map(|item| serde_json::from_value(item).ok())
		.collect())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn numeric_ids_are_stringified() {
		let topic: Topic = serde_json::from_value(json!({
			"id": 7,
			"title": "Seven",
			"documents": [{ "id": 42, "file_name": "a.pdf" }]
		}))
		.unwrap();
		assert_eq!(topic.id, "7");
		assert_eq!(topic.documents[0].id, "42");
	}

	#[test]
	fn non_array_collections_decode_empty() {
		let result: ClusteringResult =
			serde_json::from_value(json!({ "id": "r", "title": "R", "topics": "nope" })).unwrap();
		assert!(result.topics.is_empty());

		let topic: Topic = serde_json::from_value(json!({ "id": "t", "documents": null })).unwrap();
		assert!(topic.documents.is_empty());

		let topic: Topic = serde_json::from_value(json!({ "id": "t" })).unwrap();
		assert!(topic.documents.is_empty());
	}

	#[test]
	fn non_object_items_are_skipped() {
		let result: ClusteringResult = serde_json::from_value(json!({
			"topics": [1, null, { "id": "t1", "title": "Kept" }, "x"]
		}))
		.unwrap();
		assert_eq!(result.topics.len(), 1);
		assert_eq!(result.topics[0].title, "Kept");
	}

	#[test]
	fn display_label_falls_back_to_file_name() {
		let mut doc = DocumentRef {
			id: "d".into(),
			title: Some("Title".into()),
			file_name: "file.txt".into(),
		};
		assert_eq!(doc.display_label(), "Title");
		doc.title = Some(String::new());
		assert_eq!(doc.display_label(), "file.txt");
		doc.title = None;
		assert_eq!(doc.display_label(), "file.txt");
	}

	#[test]
	fn graph_node_serializes_in_camel_case() {
		let child = GraphNode::group_child("d1", "t1", "Doc", Position::new(10.0, 50.0));
		let value = serde_json::to_value(&child).unwrap();
		assert_eq!(value["kind"], "groupChild");
		assert_eq!(value["parentId"], "t1");
		assert_eq!(value["confinedToParent"], true);
		assert!(value.get("size").is_none());

		let group = GraphNode::group(
			"t1",
			"Topic",
			Position::new(100.0, 100.0),
			Size {
				width: 400.0,
				height: 100.0,
			},
		);
		let value = serde_json::to_value(&group).unwrap();
		assert_eq!(value["kind"], "group");
		assert!(value.get("parentId").is_none());
		assert!(value.get("confinedToParent").is_none());
		assert_eq!(value["size"]["height"], 100.0);
	}
}
