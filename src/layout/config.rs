use serde::{Deserialize, Serialize};

use super::types::{Position, Size};

/// Centre used when no viewport is known (middle of an 800x600 canvas).
pub const DEFAULT_CENTER: Position = Position::new(400.0, 300.0);

/// Geometry of the topic/document zig-zag layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterLayout {
	/// Width of every topic box.
	pub topic_width: f64,
	/// Height of a topic box before any documents are stacked in it.
	pub empty_topic_height: f64,
	/// Vertical distance between consecutive documents.
	pub document_spacing: f64,
	/// Horizontal swing of the zig-zag; also the clearance reserved for a document leaf.
	pub zigzag_offset: f64,
	/// Horizontal distance between consecutive topic columns.
	pub topic_spacing: f64,
	/// Top-left corner of the first topic box.
	pub origin: Position,
	/// Inner padding of a topic box.
	pub padding: f64,
}

impl Default for ClusterLayout {
	fn default() -> Self {
		Self {
			topic_width: 400.0,
			empty_topic_height: 40.0,
			document_spacing: 150.0,
			zigzag_offset: 40.0,
			topic_spacing: 400.0,
			origin: Position::new(100.0, 100.0),
			padding: 10.0,
		}
	}
}

impl ClusterLayout {
	/// Height of a topic box holding `documents` documents.
	pub fn topic_height(&self, documents: usize) -> f64 {
		self.empty_topic_height
			+ documents as f64 * self.document_spacing
			+ self.zigzag_offset
			+ 2.0 * self.padding
	}

	/// Extent of a topic box holding `documents` documents.
	pub fn topic_size(&self, documents: usize) -> Size {
		Size {
			width: self.topic_width,
			height: self.topic_height(documents),
		}
	}

	/// Absolute position of the topic at column `index`.
	pub fn topic_position(&self, index: usize) -> Position {
		Position::new(
			self.origin.x + index as f64 * self.topic_spacing,
			self.origin.y,
		)
	}

	/// Caption offset relative to its topic box.
	pub fn label_offset(&self) -> Position {
		Position::new(0.0, -30.0 - self.padding)
	}

	/// Offset of the document at `index` relative to its topic box: even
	/// indices hug the left edge, odd ones the right.
	pub fn document_offset(&self, index: usize) -> Position {
		let x = if index % 2 == 0 {
			self.padding
		} else {
			self.topic_width - self.zigzag_offset - self.padding
		};
		Position::new(
			x,
			self.empty_topic_height + self.padding + index as f64 * self.document_spacing,
		)
	}
}

/// Size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
	/// Surface width.
	pub width: f64,
	/// Surface height.
	pub height: f64,
}

impl Viewport {
	/// Middle of the surface.
	pub fn center(&self) -> Position {
		Position::new(self.width / 2.0, self.height / 2.0)
	}
}

/// Parameters of one force relayout pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayoutConfig {
	/// Many-body coefficient; negative values push nodes apart.
	pub strength: f64,
	/// Minimum clear distance between node centres.
	pub radius: f64,
	/// Rest length of edge springs.
	pub distance: f64,
	/// Number of integration ticks. The pass always runs exactly this many.
	pub iterations: usize,
	/// Size of the surface to centre on, if one is known.
	pub viewport: Option<Viewport>,
}

impl Default for RelayoutConfig {
	fn default() -> Self {
		Self {
			strength: -1000.0,
			radius: 100.0,
			distance: 100.0,
			iterations: 300,
			viewport: None,
		}
	}
}

impl RelayoutConfig {
	/// Centres on a `width` x `height` surface.
	pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
		self.viewport = Some(Viewport { width, height });
		self
	}

	/// Viewport centre, or [`DEFAULT_CENTER`] without a viewport.
	pub fn center(&self) -> Position {
		self.viewport
			.map(|viewport| viewport.center())
			.unwrap_or(DEFAULT_CENTER)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn topic_height_grows_with_documents() {
		let layout = ClusterLayout::default();
		assert_eq!(layout.topic_height(0), 100.0);
		assert_eq!(layout.topic_height(3), 550.0);
		assert!(layout.topic_height(4) > layout.topic_height(3));
	}

	#[test]
	fn document_offsets_zig_zag() {
		let layout = ClusterLayout::default();
		let xs: Vec<f64> = (0..4).map(|j| layout.document_offset(j).x).collect();
		assert_eq!(xs, [10.0, 350.0, 10.0, 350.0]);
		for j in 1..6 {
			let step = layout.document_offset(j).y - layout.document_offset(j - 1).y;
			assert_eq!(step, 150.0);
		}
		assert_eq!(layout.document_offset(0).y, 50.0);
	}

	#[test]
	fn center_falls_back_without_viewport() {
		let config = RelayoutConfig::default();
		assert_eq!(config.center(), DEFAULT_CENTER);
		let config = config.with_viewport(1024.0, 768.0);
		assert_eq!(config.center(), Position::new(512.0, 384.0));
	}

	#[test]
	fn partial_config_keeps_defaults() {
		let config: RelayoutConfig = serde_json::from_str(r#"{ "radius": 60 }"#).unwrap();
		assert_eq!(config.radius, 60.0);
		assert_eq!(config.distance, 100.0);
		assert_eq!(config.iterations, 300);

		let layout: ClusterLayout = serde_json::from_str(r#"{ "padding": 4 }"#).unwrap();
		assert_eq!(layout.padding, 4.0);
		assert_eq!(layout.topic_width, 400.0);
	}
}
