use std::collections::HashSet;

use super::{Controller, ElementKind, LabelHost, LabelPlacer, Tags, label_anchor};
use crate::time_graph::config::Config;
use crate::time_graph::error::LabelError;
use crate::time_graph::surface::Surface;
use crate::time_graph::types::{Node, NodeId};

/// One absolutely positioned block per node. The block starts at the node's
/// pixel anchor and is sized to the scaled node, so it overlays the whole
/// shape.
pub struct HtmlLabels {
	tags: Tags,
}

impl HtmlLabels {
	/// Builds the layer over `host`; elements are created on first placement.
	pub fn new(host: Box<dyn LabelHost>, controller: Controller) -> Self {
		Self {
			tags: Tags::new(ElementKind::HtmlBlock, host, controller),
		}
	}
}

impl LabelPlacer for HtmlLabels {
	fn place(&mut self, node: &Node, surface: &mut Surface, _: &Config) -> Result<(), LabelError> {
		let anchor = label_anchor(node, surface);
		let scale = surface.mapping().scale;
		// truncated toward zero, like the pixel sizes a browser reports
		let width = (node.width() * scale.x) as i64;
		let height = (node.height() * scale.y) as i64;
		self.tags.place_with(node, |tag| {
			tag.set_style("left", &format!("{}px", anchor.x as i64))?;
			tag.set_style("top", &format!("{}px", anchor.y as i64))?;
			tag.set_style("width", &format!("{width}px"))?;
			tag.set_style("height", &format!("{height}px"))
		})
	}

	fn release(&mut self, id: &NodeId) {
		self.tags.release(id);
	}

	fn retain_visible(&mut self, visible: &HashSet<NodeId>) {
		self.tags.retain_visible(visible);
	}

	fn clear(&mut self) {
		self.tags.clear();
	}

	fn len(&self) -> usize {
		self.tags.len()
	}
}

#[cfg(test)]
mod tests {
	use kurbo::{Size, Vec2};

	use super::*;
	use crate::time_graph::label::SvgLabels;
	use crate::time_graph::label::testing::MemoryHost;
	use crate::time_graph::surface::{Mapping, Recorder};

	fn surface(scale: f64) -> Surface {
		let mut surface = Surface::new(Recorder::new(), Size::new(100.0, 50.0));
		surface.set_mapping(Mapping {
			translate: Vec2::new(10.0, 20.0),
			scale: Vec2::new(scale, scale),
		});
		surface
	}

	#[test]
	fn box_covers_the_scaled_shape() {
		let host = MemoryHost::default();
		let mut labels = HtmlLabels::new(Box::new(host.clone()), Controller::new());
		let node = Node::new("n", "Review").with_pos(5.0, 5.0).with_size(10.0, 10.0);

		labels.place(&node, &mut surface(2.0), &Config::default()).unwrap();

		let tag = host.live("n").unwrap();
		let tag = tag.borrow();
		assert_eq!(tag.kind, ElementKind::HtmlBlock);
		assert_eq!(tag.styles["left"], "70px");
		assert_eq!(tag.styles["top"], "55px");
		assert_eq!(tag.styles["width"], "20px");
		assert_eq!(tag.styles["height"], "20px");
		assert_eq!(tag.text, "Review");
	}

	#[test]
	fn box_size_is_truncated() {
		let host = MemoryHost::default();
		let mut labels = HtmlLabels::new(Box::new(host.clone()), Controller::new());
		let node = Node::new("n", "n").with_size(10.0, 3.0);

		labels.place(&node, &mut surface(1.55), &Config::default()).unwrap();

		let tag = host.live("n").unwrap();
		assert_eq!(tag.borrow().styles["width"], "15px");
		assert_eq!(tag.borrow().styles["height"], "4px");
	}

	#[test]
	fn markup_placement_leaves_the_surface_alone() {
		let recorder = Recorder::new();
		let mut surface = Surface::new(recorder.clone(), Size::new(100.0, 50.0));
		surface.set_mapping(Mapping {
			translate: Vec2::new(3.0, 4.0),
			scale: Vec2::new(1.5, 1.5),
		});
		let before = surface.mapping();
		let node = Node::new("n", "n").with_size(10.0, 10.0);
		let config = Config::default();

		let mut layers: [Box<dyn LabelPlacer>; 2] = [
			Box::new(HtmlLabels::new(Box::new(MemoryHost::default()), Controller::new())),
			Box::new(SvgLabels::new(Box::new(MemoryHost::default()), Controller::new())),
		];
		for layer in layers.iter_mut() {
			layer.place(&node, &mut surface, &config).unwrap();
		}
		assert_eq!(surface.mapping(), before);
		assert!(recorder.is_empty());
	}

	#[test]
	fn clear_releases_everything() {
		let host = MemoryHost::default();
		let mut labels = HtmlLabels::new(Box::new(host.clone()), Controller::new());
		let mut surface = surface(1.0);
		for id in ["a", "b"] {
			labels.place(&Node::new(id, id), &mut surface, &Config::default()).unwrap();
		}
		labels.clear();
		assert!(labels.is_empty());
		assert_eq!(host.live_count(), 0);
		assert_eq!(host.created_count(), 2);
	}
}
